//! Outline types: heading candidates and the per-document outline.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Title used when no title strategy succeeds.
pub const UNTITLED: &str = "Untitled Document";

/// Title used for outlines of documents that failed to process.
pub const ERROR_TITLE: &str = "Error";

/// Heading hierarchy level. `H1 < H2 < H3` in rank order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    /// Level for a zero-based tier index; tiers past the third collapse to H3.
    pub fn from_tier(tier: usize) -> Self {
        match tier {
            0 => HeadingLevel::H1,
            1 => HeadingLevel::H2,
            _ => HeadingLevel::H3,
        }
    }

    /// Numeric depth (1-3).
    pub fn depth(self) -> u8 {
        match self {
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
        }
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "H{}", self.depth())
    }
}

/// A span that was classified as a heading.
///
/// Only `level`, `text` and `page` are part of the persisted outline shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadingCandidate {
    /// Assigned hierarchy level
    pub level: HeadingLevel,

    /// Cleaned heading text
    pub text: String,

    /// Page number (1-indexed)
    #[serde(rename = "page")]
    pub page_number: usize,

    /// Font size of the source span
    #[serde(skip)]
    pub font_size: f32,

    /// Importance score, when computed
    #[serde(skip)]
    pub importance: Option<i32>,
}

impl HeadingCandidate {
    /// Create a new heading candidate.
    pub fn new(level: HeadingLevel, text: impl Into<String>, page_number: usize, font_size: f32) -> Self {
        Self {
            level,
            text: text.into(),
            page_number,
            font_size,
            importance: None,
        }
    }
}

/// Title and heading hierarchy of one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    /// Resolved document title (never empty)
    pub title: String,

    /// Headings in reading order (or importance order, when requested)
    #[serde(rename = "outline")]
    pub sections: Vec<HeadingCandidate>,

    /// Failure reason, present only for documents that could not be processed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Outline {
    /// Create a successful outline.
    pub fn new(title: impl Into<String>, sections: Vec<HeadingCandidate>) -> Self {
        Self {
            title: title.into(),
            sections,
            error: None,
        }
    }

    /// Create an error outline with the same shape as a successful one.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            title: ERROR_TITLE.to_string(),
            sections: Vec::new(),
            error: Some(reason.into()),
        }
    }

    /// Whether this outline carries an error.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Number of headings at the given level.
    pub fn count_level(&self, level: HeadingLevel) -> usize {
        self.sections.iter().filter(|s| s.level == level).count()
    }
}
