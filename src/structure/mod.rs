//! Outline extraction: title resolution and heading classification.

mod extractor;
mod heading;
pub mod rules;
mod title;

pub use extractor::{BatchEntry, StructureExtractor};
pub use heading::{
    absolute_level, sort_by_importance, FontTiers, HeadingClassifier, ImportanceRules,
    HEADING_SIZE_THRESHOLD,
};
pub use title::{title_score, TitleResolver, TitleStrategy, TITLE_SCAN_PAGES};
