//! Persona-driven section ranking.
//!
//! Sections are assembled from each document's headings and page text,
//! then ranked together against a `"{persona}. {job}"` query using an
//! injected [`Embedder`].

mod analyzer;
mod content;
mod embed;
mod ranker;

pub use analyzer::PersonaAnalyzer;
pub use content::SectionAssembler;
pub use embed::{cosine_similarity, Embedder, HashingEmbedder, DEFAULT_DIMENSIONS};
pub use ranker::{dedup_sections, RelevanceRanker};
