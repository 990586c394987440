//! PDF file validation.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::{Error, Result};

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// Read the file header and return the declared PDF version.
pub fn check_pdf_header<P: AsRef<Path>>(path: P) -> Result<String> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut header = [0u8; 16];
    let read = reader.read(&mut header)?;
    pdf_version_from_bytes(&header[..read])
}

/// Return the PDF version declared by a header, e.g. "1.7" for `%PDF-1.7`.
pub fn pdf_version_from_bytes(data: &[u8]) -> Result<String> {
    if data.len() < PDF_MAGIC.len() + VERSION_LEN || !data.starts_with(PDF_MAGIC) {
        return Err(Error::UnknownFormat);
    }

    let version = &data[PDF_MAGIC.len()..PDF_MAGIC.len() + VERSION_LEN];
    let valid = version[0].is_ascii_digit() && version[1] == b'.' && version[2].is_ascii_digit();
    if !valid {
        return Err(Error::UnknownFormat);
    }

    Ok(String::from_utf8_lossy(version).to_string())
}

/// Whether a path names an existing file with a `.pdf` extension
/// (case-insensitive). The content is not inspected.
pub fn is_pdf_path<P: AsRef<Path>>(path: P) -> bool {
    let path = path.as_ref();
    path.is_file()
        && path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}
