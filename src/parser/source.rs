//! Document renderer abstraction.
//!
//! The structure extractor and persona analyzer only see documents through
//! [`DocumentSource`], which keeps them independent of the concrete PDF
//! library and lets tests drive them with hand-built spans.

use crate::model::{DocumentInfo, TextSpan};

use super::lines;

/// Read-only access to a rendered document.
pub trait DocumentSource {
    /// Number of pages.
    fn page_count(&self) -> usize;

    /// Formatted spans of a page, in rendering order.
    ///
    /// Returns an empty sequence if the index is out of range or the page
    /// cannot be read.
    fn page_spans(&self, page_index: usize) -> Vec<TextSpan>;

    /// Plain text of a page, one line per baseline.
    fn page_text(&self, page_index: usize) -> String {
        lines::page_text(&self.page_spans(page_index))
    }

    /// Document information (title, author, ...).
    fn info(&self) -> &DocumentInfo;
}

impl<T: DocumentSource + ?Sized> DocumentSource for &T {
    fn page_count(&self) -> usize {
        (**self).page_count()
    }

    fn page_spans(&self, page_index: usize) -> Vec<TextSpan> {
        (**self).page_spans(page_index)
    }

    fn page_text(&self, page_index: usize) -> String {
        (**self).page_text(page_index)
    }

    fn info(&self) -> &DocumentInfo {
        (**self).info()
    }
}

/// An in-memory document built from spans.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    info: DocumentInfo,
    pages: Vec<MemoryPage>,
}

#[derive(Debug, Clone, Default)]
struct MemoryPage {
    spans: Vec<TextSpan>,
    text: Option<String>,
}

impl MemoryDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set document information.
    pub fn with_info(mut self, info: DocumentInfo) -> Self {
        self.info = info;
        self
    }

    /// Set the metadata title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.info.title = Some(title.into());
        self
    }

    /// Append a page whose text is derived from its spans.
    ///
    /// Span page indices are rewritten to the new page's index.
    pub fn add_page(&mut self, spans: Vec<TextSpan>) -> &mut Self {
        self.push_page(spans, None)
    }

    /// Append a page with explicit plain text.
    pub fn add_page_with_text(&mut self, spans: Vec<TextSpan>, text: impl Into<String>) -> &mut Self {
        self.push_page(spans, Some(text.into()))
    }

    fn push_page(&mut self, mut spans: Vec<TextSpan>, text: Option<String>) -> &mut Self {
        let index = self.pages.len();
        for span in &mut spans {
            span.page_index = index;
        }
        self.pages.push(MemoryPage { spans, text });
        self.info.page_count = self.pages.len();
        self
    }
}

impl DocumentSource for MemoryDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_spans(&self, page_index: usize) -> Vec<TextSpan> {
        self.pages
            .get(page_index)
            .map(|p| p.spans.clone())
            .unwrap_or_default()
    }

    fn page_text(&self, page_index: usize) -> String {
        match self.pages.get(page_index) {
            Some(MemoryPage { text: Some(text), .. }) => text.clone(),
            Some(page) => lines::page_text(&page.spans),
            None => String::new(),
        }
    }

    fn info(&self) -> &DocumentInfo {
        &self.info
    }
}
