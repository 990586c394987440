//! Per-document outline extraction.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rayon::prelude::*;

use crate::config::StructureOptions;
use crate::model::{HeadingCandidate, Outline};
use crate::parser::{DocumentSource, PdfDocument};

use super::heading::{sort_by_importance, HeadingClassifier};
use super::title::TitleResolver;

/// Composes title resolution and heading classification.
#[derive(Debug, Clone)]
pub struct StructureExtractor {
    options: StructureOptions,
    classifier: HeadingClassifier,
    titles: TitleResolver,
}

impl StructureExtractor {
    pub fn new(options: StructureOptions) -> Self {
        Self {
            classifier: HeadingClassifier::new(&options),
            titles: TitleResolver::new(&options),
            options,
        }
    }

    pub fn options(&self) -> &StructureOptions {
        &self.options
    }

    /// Headings of a document in reading order.
    pub fn headings<D: DocumentSource + ?Sized>(&self, doc: &D) -> Vec<HeadingCandidate> {
        let spans: Vec<_> = (0..doc.page_count())
            .flat_map(|index| doc.page_spans(index))
            .collect();
        self.classifier.classify(&spans)
    }

    /// Title and outline of an opened document.
    pub fn extract<D: DocumentSource + ?Sized>(&self, doc: &D) -> Outline {
        let title = self.titles.resolve(doc);
        let mut sections = self.headings(doc);
        if self.options.sort_by_importance {
            sort_by_importance(&mut sections);
        }
        Outline::new(title, sections)
    }

    /// Open and extract a PDF file.
    ///
    /// Never fails: a document that cannot be opened yields an error
    /// outline so that batches continue past it.
    pub fn extract_path<P: AsRef<Path>>(&self, path: P) -> Outline {
        let path = path.as_ref();
        match PdfDocument::open(path) {
            Ok(doc) => {
                let outline = self.extract(&doc);
                log::info!(
                    "{}: {:?}, {} headings",
                    path.display(),
                    outline.title,
                    outline.sections.len()
                );
                outline
            }
            Err(e) => {
                log::warn!("Skipping {}: {}", path.display(), e);
                Outline::failed(e.to_string())
            }
        }
    }

    /// Extract many files, in parallel unless disabled.
    ///
    /// Entries are returned in input order.
    pub fn extract_batch<P: AsRef<Path> + Sync>(&self, paths: &[P]) -> Vec<BatchEntry> {
        let run = |path: &P| {
            let path = path.as_ref();
            let start = Instant::now();
            let outline = self.extract_path(path);
            BatchEntry::new(path, outline, start.elapsed())
        };

        if self.options.parallel {
            paths.par_iter().map(run).collect()
        } else {
            paths.iter().map(run).collect()
        }
    }
}

impl Default for StructureExtractor {
    fn default() -> Self {
        Self::new(StructureOptions::default())
    }
}

/// Outcome of one file in a batch.
#[derive(Debug, Clone)]
pub struct BatchEntry {
    /// Input path
    pub path: PathBuf,
    /// File name shown in reports
    pub file_name: String,
    /// Extracted (or error) outline
    pub outline: Outline,
    /// Wall-clock processing time
    pub elapsed: Duration,
}

impl BatchEntry {
    fn new(path: &Path, outline: Outline, elapsed: Duration) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            path: path.to_path_buf(),
            file_name,
            outline,
            elapsed,
        }
    }

    /// Whether the file produced a real outline.
    pub fn is_success(&self) -> bool {
        !self.outline.is_error()
    }

    /// Failure reason, if any.
    pub fn error(&self) -> Option<&str> {
        self.outline.error.as_deref()
    }
}
