//! Text-span extraction: the document renderer behind the core.

mod detect;
pub mod lines;
mod pdf;
mod source;

pub use detect::{check_pdf_header, is_pdf_path, pdf_version_from_bytes};
pub use pdf::PdfDocument;
pub use source::{DocumentSource, MemoryDocument};
