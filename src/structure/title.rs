//! Document title resolution.
//!
//! Strategies are tried in order and the first one producing a title wins:
//!
//! 1. [`TitleStrategy::Metadata`]: the document info title, if longer than
//!    three characters
//! 2. [`TitleStrategy::Layout`]: the best-scoring span on the first pages
//! 3. [`TitleStrategy::Keyword`]: the first page-1 line containing a keyword
//!
//! When none applies the title is [`UNTITLED`].

use log::debug;

use crate::config::StructureOptions;
use crate::model::{TextSpan, UNTITLED};
use crate::parser::DocumentSource;

/// Pages scanned by the layout strategy.
pub const TITLE_SCAN_PAGES: usize = 3;

/// Spans whose top edge is above this offset are "top of page".
const TOP_OF_PAGE: f32 = 200.0;

/// One title strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleStrategy {
    Metadata,
    Layout,
    Keyword,
}

impl TitleStrategy {
    /// Evaluation order.
    pub const ORDER: [TitleStrategy; 3] = [
        TitleStrategy::Metadata,
        TitleStrategy::Layout,
        TitleStrategy::Keyword,
    ];
}

/// Layout score of a potential title span.
///
/// Font size (+2.0 above 16pt, +1.5 above 14pt, +1.0 above 12pt), bold
/// (+1.0), top of page (+1.0), first page (+0.5), long text (-0.5 above 100
/// characters).
pub fn title_score(span: &TextSpan, page_index: usize) -> f32 {
    let mut score = 0.0;

    if span.font_size > 16.0 {
        score += 2.0;
    } else if span.font_size > 14.0 {
        score += 1.5;
    } else if span.font_size > 12.0 {
        score += 1.0;
    }
    if span.is_bold() {
        score += 1.0;
    }
    if span.top() < TOP_OF_PAGE {
        score += 1.0;
    }
    if page_index == 0 {
        score += 0.5;
    }
    if span.text.chars().count() > 100 {
        score -= 0.5;
    }

    score
}

/// Picks a single title for a document.
#[derive(Debug, Clone)]
pub struct TitleResolver {
    keywords: Vec<String>,
}

impl TitleResolver {
    pub fn new(options: &StructureOptions) -> Self {
        Self {
            keywords: options
                .title_keywords
                .iter()
                .map(|k| k.to_lowercase())
                .collect(),
        }
    }

    /// Resolve the title; never empty.
    pub fn resolve<D: DocumentSource + ?Sized>(&self, doc: &D) -> String {
        TitleStrategy::ORDER
            .iter()
            .find_map(|&strategy| {
                let title = self.apply(strategy, doc)?;
                debug!("Title from {:?} strategy: {:?}", strategy, title);
                Some(title)
            })
            .unwrap_or_else(|| UNTITLED.to_string())
    }

    /// Run a single strategy.
    pub fn apply<D: DocumentSource + ?Sized>(&self, strategy: TitleStrategy, doc: &D) -> Option<String> {
        match strategy {
            TitleStrategy::Metadata => metadata_title(doc),
            TitleStrategy::Layout => layout_title(doc),
            TitleStrategy::Keyword => self.keyword_title(doc),
        }
    }

    fn keyword_title<D: DocumentSource + ?Sized>(&self, doc: &D) -> Option<String> {
        if self.keywords.is_empty() || doc.page_count() == 0 {
            return None;
        }
        doc.page_text(0)
            .lines()
            .find(|line| {
                let lower = line.to_lowercase();
                self.keywords.iter().any(|k| lower.contains(k.as_str()))
            })
            .map(|line| line.trim().to_string())
    }
}

impl Default for TitleResolver {
    fn default() -> Self {
        Self::new(&StructureOptions::default())
    }
}

fn metadata_title<D: DocumentSource + ?Sized>(doc: &D) -> Option<String> {
    doc.info()
        .title()
        .filter(|t| t.trim().chars().count() > 3)
        .map(str::to_string)
}

fn layout_title<D: DocumentSource + ?Sized>(doc: &D) -> Option<String> {
    let mut best: Option<(f32, String)> = None;

    for page_index in 0..doc.page_count().min(TITLE_SCAN_PAGES) {
        for span in doc.page_spans(page_index) {
            let text = span.text.trim();
            let len = text.chars().count();
            if len <= 5 || len >= 200 {
                continue;
            }
            let score = title_score(&span, page_index);
            if score <= 0.0 {
                continue;
            }
            // Strictly greater keeps the earliest of equal scores.
            if best.as_ref().map_or(true, |(top, _)| score > *top) {
                best = Some((score, text.to_string()));
            }
        }
    }

    best.map(|(_, text)| text)
}
