//! Section body assembly from plain page text.

use crate::model::{DocumentSection, HeadingCandidate};
use crate::structure::rules::{self, PatternSet};

/// Pairs headings with the text that follows them on their page.
///
/// Operates on plain text only, so heading boundaries are detected with the
/// text patterns alone.
#[derive(Debug, Clone)]
pub struct SectionAssembler {
    patterns: PatternSet,
}

impl SectionAssembler {
    pub fn new() -> Self {
        Self {
            patterns: rules::line_heading_patterns(),
        }
    }

    /// Whether a line of plain text looks like a heading.
    pub fn looks_like_heading(&self, line: &str) -> bool {
        let line = line.trim();
        rules::has_heading_length(line) && self.patterns.is_match(line)
    }

    /// Body text under `heading` in `page_text`.
    ///
    /// Starts after the first line containing the heading
    /// (case-insensitive) and stops before the next heading-like line.
    /// Empty when the heading is not on the page.
    pub fn body_text(&self, page_text: &str, heading: &str) -> String {
        let needle = heading.to_lowercase();
        let lines: Vec<&str> = page_text.split('\n').collect();

        let Some(start) = lines
            .iter()
            .position(|line| line.to_lowercase().contains(&needle))
        else {
            return String::new();
        };

        let end = lines[start + 1..]
            .iter()
            .position(|line| self.looks_like_heading(line))
            .map_or(lines.len(), |offset| start + 1 + offset);

        lines[start + 1..end].join("\n").trim().to_string()
    }

    /// Build a section for a heading, reading its page text from `page_text`.
    pub fn section(&self, document_name: &str, heading: &HeadingCandidate, page_text: &str) -> DocumentSection {
        DocumentSection::new(
            document_name,
            heading.text.clone(),
            heading.page_number,
            self.body_text(page_text, &heading.text),
        )
    }
}

impl Default for SectionAssembler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HeadingLevel;

    const PAGE: &str = "Travel Guide\n\
        Hotels\n\
        Stay near the old town for easy access.\n\
        Prices peak in July.\n\
        NIGHTLIFE\n\
        Bars close late.";

    #[test]
    fn test_body_until_next_heading() {
        let assembler = SectionAssembler::new();
        assert_eq!(
            assembler.body_text(PAGE, "hotels"),
            "Stay near the old town for easy access.\nPrices peak in July."
        );
        assert_eq!(assembler.body_text(PAGE, "Nightlife"), "Bars close late.");
    }

    #[test]
    fn test_heading_not_found() {
        assert_eq!(SectionAssembler::new().body_text(PAGE, "Restaurants"), "");
    }

    #[test]
    fn test_body_runs_to_end_of_page() {
        let text = "1 Scope\nall remaining lines\nbelong here.";
        assert_eq!(
            SectionAssembler::new().body_text(text, "1 Scope"),
            "all remaining lines\nbelong here."
        );
    }

    #[test]
    fn test_looks_like_heading() {
        let assembler = SectionAssembler::new();
        assert!(assembler.looks_like_heading("  2. Methods "));
        assert!(assembler.looks_like_heading("Related Work"));
        assert!(!assembler.looks_like_heading("Go"));
        assert!(!assembler.looks_like_heading("3.2 results"));
        assert!(!assembler.looks_like_heading("a normal sentence."));
    }

    #[test]
    fn test_section() {
        let heading = HeadingCandidate::new(HeadingLevel::H2, "Hotels", 3, 14.0);
        let section = SectionAssembler::new().section("guide.pdf", &heading, PAGE);
        assert_eq!(section.document_name, "guide.pdf");
        assert_eq!(section.page_number, 3);
        assert!(section.body_text.starts_with("Stay near"));
    }
}
