//! Text embedding capability.

use std::collections::HashSet;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};

/// Produces fixed-length vectors for texts.
///
/// Implementations must return vectors of the same length for every input.
pub trait Embedder: Send + Sync {
    /// Identifier used in logs.
    fn name(&self) -> &str;

    /// Embed one text.
    fn encode(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed many texts, one vector per input in order.
    fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        texts.iter().map(|text| self.encode(text)).collect()
    }
}

impl<T: Embedder + ?Sized> Embedder for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn encode(&self, text: &str) -> Result<Vec<f32>> {
        (**self).encode(text)
    }

    fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        (**self).encode_batch(texts)
    }
}

impl<T: Embedder + ?Sized> Embedder for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn encode(&self, text: &str) -> Result<Vec<f32>> {
        (**self).encode(text)
    }

    fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        (**self).encode_batch(texts)
    }
}

/// Cosine of the angle between two vectors.
///
/// Zero when either vector has no magnitude. Vectors are assumed to have
/// the same length.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let (mut dot, mut norm_a, mut norm_b) = (0.0f32, 0.0f32, 0.0f32);
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0)
}

/// Default vector length of [`HashingEmbedder`].
pub const DEFAULT_DIMENSIONS: usize = 384;

const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "are", "but", "not", "you", "all", "can", "had", "her", "was", "one",
    "our", "out", "day", "get", "has", "him", "his", "how", "man", "new", "now", "old", "see",
    "two", "way", "who", "boy", "did", "its", "let", "put", "say", "she", "too", "use", "with",
    "have", "this", "will", "your", "from", "they", "know", "want", "been", "good", "much",
    "some", "time", "very", "when", "come", "here", "just", "like", "long", "make", "many",
    "over", "such", "take", "than", "them", "well", "were",
];

/// Deterministic bag-of-words embedder.
///
/// Words of three or more letters (stop words removed) are hashed into a
/// fixed number of buckets; the count vector is L2 normalized. Texts that
/// share vocabulary score high, unrelated texts score near zero.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimensions: usize,
    word: Regex,
    stop_words: HashSet<&'static str>,
}

impl HashingEmbedder {
    pub fn new() -> Self {
        Self::with_dimensions(DEFAULT_DIMENSIONS)
    }

    /// Use a different vector length (at least 1).
    pub fn with_dimensions(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
            word: Regex::new(r"\b\p{L}{3,}\b").expect("valid regex"),
            stop_words: STOP_WORDS.iter().copied().collect(),
        }
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Content words of a text, in order.
    pub fn tokens(&self, text: &str) -> Vec<String> {
        let normalized: String = text.nfkc().collect::<String>().to_lowercase();
        self.word
            .find_iter(&normalized)
            .map(|m| m.as_str())
            .filter(|w| !self.stop_words.contains(w))
            .map(str::to_string)
            .collect()
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

impl Embedder for HashingEmbedder {
    fn name(&self) -> &str {
        "hashing-bow"
    }

    fn encode(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0f32; self.dimensions];
        for token in self.tokens(text) {
            let bucket = fnv1a(token.as_bytes()) as usize % self.dimensions;
            vector[bucket] += 1.0;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|v| *v /= norm);
        }
        if vector.iter().any(|v| !v.is_finite()) {
            return Err(Error::EmbeddingService(format!(
                "non-finite embedding for text of {} bytes",
                text.len()
            )));
        }
        Ok(vector)
    }
}

fn fnv1a(bytes: &[u8]) -> u32 {
    bytes.iter().fold(0x811c_9dc5u32, |hash, &b| {
        (hash ^ b as u32).wrapping_mul(0x0100_0193)
    })
}
