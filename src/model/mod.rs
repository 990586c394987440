//! Data model shared by extraction and ranking.
//!
//! Spans come out of the renderer, headings and outlines out of the
//! structure extractor, sections and analysis results out of the persona
//! analyzer. Everything that ends up in a persisted JSON file derives
//! `Serialize` with field order matching the on-disk shape.

mod analysis;
mod document;
mod outline;
mod section;
mod span;

pub use analysis::{
    display_name, refined_text, AnalysisMetadata, AnalysisResult, ExtractedSection,
    SkippedDocument, SubsectionAnalysis, TIMESTAMP_FORMAT,
};
pub use document::DocumentInfo;
pub use outline::{HeadingCandidate, HeadingLevel, Outline, ERROR_TITLE, UNTITLED};
pub use section::{DocumentSection, RankedSection};
pub use span::{flags_from_font_name, BoundingBox, TextSpan, SPAN_FLAG_BOLD, SPAN_FLAG_ITALIC};
