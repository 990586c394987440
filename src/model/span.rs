//! Positioned text spans.

use serde::{Deserialize, Serialize};

/// Style flag bit for bold text.
pub const SPAN_FLAG_BOLD: u32 = 1 << 4;

/// Style flag bit for italic text.
pub const SPAN_FLAG_ITALIC: u32 = 1 << 1;

/// Axis-aligned box in top-down page coordinates (y grows downward).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BoundingBox {
    /// Create a new bounding box.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Box width.
    pub fn width(&self) -> f32 {
        (self.x1 - self.x0).max(0.0)
    }

    /// Box height.
    pub fn height(&self) -> f32 {
        (self.y1 - self.y0).max(0.0)
    }
}

/// A run of text with uniform font, as produced by the renderer for one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSpan {
    /// The text content (untrimmed)
    pub text: String,
    /// Base font name (e.g., "Helvetica-Bold")
    pub font_name: String,
    /// Effective font size in points
    pub font_size: f32,
    /// Style bitmask, see [`SPAN_FLAG_BOLD`] and [`SPAN_FLAG_ITALIC`]
    pub flags: u32,
    /// Bounding box in top-down page coordinates
    pub bbox: BoundingBox,
    /// Zero-based page index
    pub page_index: usize,
}

impl TextSpan {
    /// Create a span, deriving style flags from the font name.
    pub fn new(
        text: impl Into<String>,
        font_name: impl Into<String>,
        font_size: f32,
        bbox: BoundingBox,
        page_index: usize,
    ) -> Self {
        let font_name = font_name.into();
        let flags = flags_from_font_name(&font_name);
        Self {
            text: text.into(),
            font_name,
            font_size,
            flags,
            bbox,
            page_index,
        }
    }

    /// Replace the style flags.
    pub fn with_flags(mut self, flags: u32) -> Self {
        self.flags = flags;
        self
    }

    /// Whether the bold flag is set.
    pub fn is_bold(&self) -> bool {
        self.flags & SPAN_FLAG_BOLD != 0
    }

    /// Whether the italic flag is set.
    pub fn is_italic(&self) -> bool {
        self.flags & SPAN_FLAG_ITALIC != 0
    }

    /// Vertical position of the top edge.
    pub fn top(&self) -> f32 {
        self.bbox.y0
    }
}

/// Derive style flags from a font name ("Helvetica-BoldOblique" etc.).
pub fn flags_from_font_name(font_name: &str) -> u32 {
    let lower = font_name.to_lowercase();
    let mut flags = 0;
    if lower.contains("bold") || lower.contains("black") || lower.contains("heavy") {
        flags |= SPAN_FLAG_BOLD;
    }
    if lower.contains("italic") || lower.contains("oblique") {
        flags |= SPAN_FLAG_ITALIC;
    }
    flags
}
