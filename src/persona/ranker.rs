//! Cross-document relevance ranking.

use std::collections::HashSet;

use log::debug;

use crate::config::{DEFAULT_RELEVANCE_THRESHOLD, DEFAULT_TOP_K};
use crate::error::{Error, Result};
use crate::model::{DocumentSection, RankedSection};

use super::embed::{cosine_similarity, Embedder};

/// Drop sections whose `(document_name, section_title)` was already seen.
pub fn dedup_sections(sections: Vec<DocumentSection>) -> Vec<DocumentSection> {
    let mut seen = HashSet::new();
    sections
        .into_iter()
        .filter(|s| seen.insert((s.document_name.clone(), s.section_title.clone())))
        .collect()
}

/// Scores sections against a query with an [`Embedder`].
#[derive(Debug, Clone)]
pub struct RelevanceRanker<E> {
    embedder: E,
    top_k: usize,
    threshold: f32,
}

impl<E: Embedder> RelevanceRanker<E> {
    pub fn new(embedder: E) -> Self {
        Self {
            embedder,
            top_k: DEFAULT_TOP_K,
            threshold: DEFAULT_RELEVANCE_THRESHOLD,
        }
    }

    /// Maximum number of results.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Minimum similarity; results must score strictly above it.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    /// Rank `sections` by similarity to `query`.
    ///
    /// The query and all unique sections are embedded in one batch. The
    /// result is sorted by score descending (ties keep input order), holds
    /// at most `top_k` entries and carries 1-based ranks.
    pub fn rank(&self, query: &str, sections: Vec<DocumentSection>) -> Result<Vec<RankedSection>> {
        let pool = dedup_sections(sections);
        if pool.is_empty() {
            debug!("No candidate sections; skipping embedding");
            return Ok(Vec::new());
        }

        let mut texts = Vec::with_capacity(pool.len() + 1);
        texts.push(query.to_string());
        texts.extend(pool.iter().map(DocumentSection::embedding_text));

        let vectors = self.embedder.encode_batch(&texts)?;
        if vectors.len() != texts.len() {
            return Err(Error::EmbeddingService(format!(
                "{} returned {} vectors for {} texts",
                self.embedder.name(),
                vectors.len(),
                texts.len()
            )));
        }

        let (query_vector, section_vectors) = vectors.split_first().ok_or_else(|| {
            Error::EmbeddingService(format!("{} returned no vectors", self.embedder.name()))
        })?;
        if let Some(bad) = section_vectors.iter().find(|v| v.len() != query_vector.len()) {
            return Err(Error::EmbeddingService(format!(
                "{} returned vectors of length {} and {}",
                self.embedder.name(),
                query_vector.len(),
                bad.len()
            )));
        }

        let mut scored: Vec<(DocumentSection, f32)> = pool
            .into_iter()
            .zip(section_vectors)
            .map(|(section, vector)| {
                let score = cosine_similarity(query_vector, vector);
                debug!("{:.3} {:?} ({})", score, section.section_title, section.document_name);
                (section, score)
            })
            .filter(|(_, score)| *score > self.threshold)
            .collect();

        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(self.top_k);

        Ok(scored
            .into_iter()
            .enumerate()
            .map(|(i, (section, similarity_score))| RankedSection {
                section,
                similarity_score,
                importance_rank: i + 1,
            })
            .collect())
    }
}
