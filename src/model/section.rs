//! Sections assembled from headings, and their ranked form.

use serde::{Deserialize, Serialize};

/// A heading paired with the body text that follows it on its page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSection {
    /// Source document file name
    pub document_name: String,
    /// Heading text
    pub section_title: String,
    /// Page number (1-indexed)
    pub page_number: usize,
    /// Text between the heading and the next heading-like line
    pub body_text: String,
}

impl DocumentSection {
    /// Create a new section.
    pub fn new(
        document_name: impl Into<String>,
        section_title: impl Into<String>,
        page_number: usize,
        body_text: impl Into<String>,
    ) -> Self {
        Self {
            document_name: document_name.into(),
            section_title: section_title.into(),
            page_number,
            body_text: body_text.into(),
        }
    }

    /// Text submitted to the embedder: title and body.
    pub fn embedding_text(&self) -> String {
        format!("{} {}", self.section_title, self.body_text)
            .trim()
            .to_string()
    }

    /// Identity used for deduplication.
    pub fn key(&self) -> (&str, &str) {
        (&self.document_name, &self.section_title)
    }
}

/// A section that survived relevance filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedSection {
    #[serde(flatten)]
    pub section: DocumentSection,
    /// Cosine similarity to the persona query, in [-1, 1]
    pub similarity_score: f32,
    /// 1-based position in the ranked list
    pub importance_rank: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_text() {
        let section = DocumentSection::new("a.pdf", "Hotels", 2, "Stay near the old town.");
        assert_eq!(section.embedding_text(), "Hotels Stay near the old town.");

        let empty_body = DocumentSection::new("a.pdf", "Hotels", 2, "");
        assert_eq!(empty_body.embedding_text(), "Hotels");
    }

    #[test]
    fn test_key() {
        let section = DocumentSection::new("a.pdf", "Hotels", 2, "");
        assert_eq!(section.key(), ("a.pdf", "Hotels"));
    }
}
