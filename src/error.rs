//! Error types for pdfscope.

use std::io;
use thiserror::Error;

/// Result type alias for pdfscope operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while extracting outlines or ranking sections.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The document could not be opened (missing, not a PDF, or corrupt).
    ///
    /// Recoverable at the batch level: the document is skipped and the
    /// remaining documents are still processed.
    #[error("Failed to load document {path}: {reason}")]
    DocumentLoad {
        /// Path of the document as given by the caller
        path: String,
        /// Human readable cause
        reason: String,
    },

    /// The file format is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// Page index is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(usize, usize),

    /// The embedding capability failed; ranking cannot proceed.
    #[error("Embedding service error: {0}")]
    EmbeddingService(String),

    /// Invalid or incomplete request configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error during JSON rendering or persistence.
    #[error("Rendering error: {0}")]
    Render(String),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Build a [`Error::DocumentLoad`] for the given path.
    pub fn document_load(path: impl AsRef<std::path::Path>, reason: impl ToString) -> Self {
        Error::DocumentLoad {
            path: path.as_ref().display().to_string(),
            reason: reason.to_string(),
        }
    }

    /// Whether a batch caller may skip the offending document and continue.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::DocumentLoad { .. } | Error::UnknownFormat | Error::PdfParse(_)
        )
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            _ => Error::PdfParse(err.to_string()),
        }
    }
}
