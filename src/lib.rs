//! # pdfscope
//!
//! PDF outline extraction and persona-driven section ranking.
//!
//! The library turns the formatted text spans of a PDF into a title and an
//! H1/H2/H3 heading hierarchy, and ranks the sections of several documents
//! by how relevant they are to a persona and the job they want done.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfscope::{extract_structure, render};
//!
//! fn main() -> pdfscope::Result<()> {
//!     let outline = extract_structure("report.pdf");
//!     println!("{}", render::to_json(&outline, render::JsonFormat::Pretty)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Persona analysis
//!
//! ```no_run
//! use pdfscope::{analyze_documents, AnalysisConfig};
//!
//! let config = AnalysisConfig::new("Travel Planner", "Plan a 5-day trip");
//! let result = analyze_documents(&["nice.pdf", "lyon.pdf"], &config)?;
//! for section in &result.extracted_sections {
//!     println!("{} {} (p. {})", section.importance_rank, section.section_title, section.page_number);
//! }
//! # Ok::<(), pdfscope::Error>(())
//! ```
//!
//! ## Features
//!
//! - **Heading detection**: numbering patterns first, then per-document
//!   font-size tiers
//! - **Title resolution**: metadata, layout scoring, keyword fallback
//! - **Pluggable embeddings**: any [`Embedder`]; [`HashingEmbedder`] built in
//! - **Batch resilience**: unreadable files yield error outlines instead of
//!   aborting the batch
//! - **Parallel processing**: uses Rayon across documents

pub mod config;
pub mod error;
pub mod model;
pub mod parser;
pub mod persona;
pub mod render;
pub mod structure;

pub use config::{AnalysisConfig, LevelPolicy, StructureOptions};
pub use error::{Error, Result};
pub use model::{
    AnalysisResult, BoundingBox, DocumentInfo, DocumentSection, HeadingCandidate, HeadingLevel,
    Outline, RankedSection, TextSpan,
};
pub use parser::{is_pdf_path, DocumentSource, MemoryDocument, PdfDocument};
pub use persona::{Embedder, HashingEmbedder, PersonaAnalyzer, RelevanceRanker};
pub use render::JsonFormat;
pub use structure::{BatchEntry, StructureExtractor};

use std::path::Path;

/// Open a PDF file for span and text access.
///
/// # Example
///
/// ```no_run
/// use pdfscope::DocumentSource;
///
/// let doc = pdfscope::open("report.pdf")?;
/// println!("Pages: {}", doc.page_count());
/// # Ok::<(), pdfscope::Error>(())
/// ```
pub fn open<P: AsRef<Path>>(path: P) -> Result<PdfDocument> {
    PdfDocument::open(path)
}

/// Extract the title and heading outline of a PDF file.
///
/// Never fails: an unreadable file yields an outline titled `"Error"` with
/// the reason in [`Outline::error`].
pub fn extract_structure<P: AsRef<Path>>(path: P) -> Outline {
    StructureExtractor::default().extract_path(path)
}

/// Extract an outline with custom options.
///
/// # Example
///
/// ```no_run
/// use pdfscope::{extract_structure_with_options, LevelPolicy, StructureOptions};
///
/// let options = StructureOptions::new()
///     .with_level_policy(LevelPolicy::Absolute)
///     .with_strip_numbering(true);
/// let outline = extract_structure_with_options("report.pdf", &options);
/// ```
pub fn extract_structure_with_options<P: AsRef<Path>>(path: P, options: &StructureOptions) -> Outline {
    StructureExtractor::new(options.clone()).extract_path(path)
}

/// Extract outlines of many files, one entry per input in order.
pub fn extract_structure_batch<P: AsRef<Path> + Sync>(
    paths: &[P],
    options: &StructureOptions,
) -> Vec<BatchEntry> {
    StructureExtractor::new(options.clone()).extract_batch(paths)
}

/// Rank the sections of several PDFs for a persona with the built-in
/// [`HashingEmbedder`].
///
/// Fails with [`Error::Configuration`] before any work when the persona,
/// the job or the documents are missing.
pub fn analyze_documents<P: AsRef<Path> + Sync>(
    paths: &[P],
    config: &AnalysisConfig,
) -> Result<AnalysisResult> {
    PersonaAnalyzer::new(HashingEmbedder::new()).analyze_paths(paths, config)
}
