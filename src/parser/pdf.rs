//! PDF renderer backed by lopdf.
//!
//! Walks page content streams to recover positioned, formatted text spans.

use std::collections::BTreeMap;
use std::path::Path;

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};
use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};
use crate::model::{BoundingBox, DocumentInfo, TextSpan};

use super::detect::{check_pdf_header, pdf_version_from_bytes};
use super::source::DocumentSource;

/// Letter height, used when a page has no readable MediaBox.
const DEFAULT_PAGE_HEIGHT: f32 = 792.0;

/// Approximate glyph advance as a fraction of the font size.
const AVG_CHAR_WIDTH: f32 = 0.5;

/// A PDF document opened for span extraction.
pub struct PdfDocument {
    doc: LopdfDocument,
    pages: Vec<ObjectId>,
    info: DocumentInfo,
}

impl PdfDocument {
    /// Open a PDF file.
    ///
    /// Fails with [`Error::DocumentLoad`] if the file is missing, is not a
    /// PDF, or cannot be parsed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        check_pdf_header(path).map_err(|e| Error::document_load(path, e))?;
        let doc = LopdfDocument::load(path).map_err(|e| Error::document_load(path, e))?;

        log::debug!("Opened {}", path.display());
        Ok(Self::from_lopdf(doc))
    }

    /// Open a PDF held in memory.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        pdf_version_from_bytes(data).map_err(|e| Error::document_load("<memory>", e))?;
        let doc = LopdfDocument::load_mem(data).map_err(|e| Error::document_load("<memory>", e))?;
        Ok(Self::from_lopdf(doc))
    }

    fn from_lopdf(doc: LopdfDocument) -> Self {
        if doc.is_encrypted() {
            log::warn!("Document is encrypted; text extraction may be incomplete");
        }

        let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
        let mut info = extract_info(&doc);
        info.page_count = pages.len();

        Self { doc, pages, info }
    }

    /// Spans of one page, or an error describing why the page is unreadable.
    pub fn try_page_spans(&self, page_index: usize) -> Result<Vec<TextSpan>> {
        let page_id = *self
            .pages
            .get(page_index)
            .ok_or(Error::PageOutOfRange(page_index, self.pages.len()))?;

        let fonts = self.doc.get_page_fonts(page_id)?;
        // Concatenated content streams, filtered or not
        let content = self.doc.get_page_content(page_id)?;
        let page_height = self.page_height(page_id);

        let mut walker = SpanWalker {
            doc: &self.doc,
            fonts: &fonts,
            page_height,
            page_index,
            spans: Vec::new(),
        };
        walker.walk(&content)?;

        log::debug!("Page {}: {} spans", page_index + 1, walker.spans.len());
        Ok(walker.spans)
    }

    /// Page height from the MediaBox, following inherited attributes.
    fn page_height(&self, page_id: ObjectId) -> f32 {
        let mut current = Some(page_id);

        // Bounded walk up the page tree
        for _ in 0..16 {
            let Some(id) = current else { break };
            let Ok(dict) = self.doc.get_dictionary(id) else { break };

            if let Some(height) = media_box_height(&self.doc, dict) {
                return height;
            }
            current = dict.get(b"Parent").and_then(Object::as_reference).ok();
        }

        DEFAULT_PAGE_HEIGHT
    }
}

impl DocumentSource for PdfDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_spans(&self, page_index: usize) -> Vec<TextSpan> {
        match self.try_page_spans(page_index) {
            Ok(spans) => spans,
            Err(e) => {
                log::warn!("Failed to extract spans from page {}: {}", page_index + 1, e);
                Vec::new()
            }
        }
    }

    fn info(&self) -> &DocumentInfo {
        &self.info
    }
}

fn media_box_height(doc: &LopdfDocument, dict: &Dictionary) -> Option<f32> {
    let media_box = match dict.get(b"MediaBox").ok()? {
        Object::Reference(r) => doc.get_object(*r).ok()?,
        other => other,
    };
    let array = media_box.as_array().ok()?;
    if array.len() < 4 {
        return None;
    }
    let y0 = array[1].as_float().ok()?;
    let y1 = array[3].as_float().ok()?;
    let height = (y1 - y0).abs();
    (height > 0.0).then_some(height)
}

/// Content stream walker that turns text-showing operators into spans.
struct SpanWalker<'a> {
    doc: &'a LopdfDocument,
    fonts: &'a BTreeMap<Vec<u8>, &'a Dictionary>,
    page_height: f32,
    page_index: usize,
    spans: Vec<TextSpan>,
}

impl SpanWalker<'_> {
    fn walk(&mut self, content: &[u8]) -> Result<()> {
        let content = lopdf::content::Content::decode(content)?;

        let mut font_key: Vec<u8> = Vec::new();
        let mut font_name = String::new();
        let mut font_size: f32 = 12.0;
        let mut matrix = TextMatrix::default();
        let mut ctm = Matrix::IDENTITY;
        let mut saved: Vec<Matrix> = Vec::new();
        let mut in_text_block = false;

        for op in &content.operations {
            match op.operator.as_str() {
                "q" => saved.push(ctm),
                "Q" => ctm = saved.pop().unwrap_or(Matrix::IDENTITY),
                "cm" if op.operands.len() >= 6 => {
                    let n: Vec<f32> = op.operands.iter().map(|o| get_number(o).unwrap_or(0.0)).collect();
                    ctm = Matrix::new(n[0], n[1], n[2], n[3], n[4], n[5]).then(&ctm);
                }
                "BT" => {
                    in_text_block = true;
                    matrix = TextMatrix::default();
                }
                "ET" => in_text_block = false,
                "Tf" if op.operands.len() >= 2 => {
                    if let Object::Name(key) = &op.operands[0] {
                        font_key = key.clone();
                        font_name = self.base_font(key);
                    }
                    font_size = get_number(&op.operands[1]).unwrap_or(12.0);
                }
                "TL" => {
                    if let Some(leading) = op.operands.first().and_then(get_number) {
                        matrix.leading = leading;
                    }
                }
                "Td" | "TD" if op.operands.len() >= 2 => {
                    let tx = get_number(&op.operands[0]).unwrap_or(0.0);
                    let ty = get_number(&op.operands[1]).unwrap_or(0.0);
                    if op.operator == "TD" {
                        matrix.leading = -ty;
                    }
                    matrix.translate(tx, ty);
                }
                "Tm" if op.operands.len() >= 6 => {
                    let n: Vec<f32> = op.operands.iter().map(|o| get_number(o).unwrap_or(0.0)).collect();
                    matrix.set(n[0], n[1], n[2], n[3], n[4], n[5]);
                }
                "T*" => matrix.next_line(),
                "Tj" | "TJ" | "'" | "\"" if in_text_block => {
                    if op.operator == "'" || op.operator == "\"" {
                        matrix.next_line();
                    }
                    let text = self.shown_text(&op.operator, &op.operands, &font_key);
                    self.push_span(text, &font_name, font_size, &mut matrix, &ctm);
                }
                _ => {}
            }
        }

        Ok(())
    }

    fn base_font(&self, key: &[u8]) -> String {
        self.fonts
            .get(key)
            .and_then(|font| font.get(b"BaseFont").ok())
            .and_then(|o| o.as_name().ok())
            .map(|n| String::from_utf8_lossy(n).to_string())
            .unwrap_or_else(|| String::from_utf8_lossy(key).to_string())
    }

    /// Decode the string operands of a text-showing operator.
    fn shown_text(&self, operator: &str, operands: &[Object], font_key: &[u8]) -> String {
        let encoding = self
            .fonts
            .get(font_key)
            .and_then(|f| f.get_font_encoding(self.doc).ok());
        let decode = |bytes: &[u8]| match encoding {
            Some(ref enc) => LopdfDocument::decode_text(enc, bytes).unwrap_or_default(),
            None => decode_text_simple(bytes),
        };

        let string_index = if operator == "\"" { 2 } else { 0 };

        match operands.get(string_index) {
            Some(Object::String(bytes, _)) => decode(bytes),
            Some(Object::Array(items)) if operator == "TJ" => {
                // Large negative adjustments (in 1/1000 em) are word gaps
                let space_threshold = 200.0;
                let mut combined = String::new();
                for item in items {
                    match item {
                        Object::String(bytes, _) => combined.push_str(&decode(bytes)),
                        other => {
                            let Some(adjustment) = get_number(other) else { continue };
                            let needs_space = -adjustment > space_threshold
                                && !combined.is_empty()
                                && !combined.ends_with([' ', '\u{00A0}'])
                                && !combined
                                    .chars()
                                    .last()
                                    .is_some_and(super::lines::is_spaceless_script_char);
                            if needs_space {
                                combined.push(' ');
                            }
                        }
                    }
                }
                combined
            }
            _ => String::new(),
        }
    }

    fn push_span(&mut self, text: String, font_name: &str, font_size: f32, matrix: &mut TextMatrix, ctm: &Matrix) {
        if text.trim().is_empty() {
            return;
        }

        let text: String = text.nfkc().collect();
        let chars = text.chars().count() as f32;

        // Device space: text matrix followed by the current transformation
        let device = matrix.as_matrix().then(ctm);
        let size = font_size * device.vertical_scale();
        let width = chars * size * AVG_CHAR_WIDTH;
        let (x, baseline) = device.apply(0.0, 0.0);

        // Flip to top-down coordinates
        let top = self.page_height - (baseline + size * 0.8);
        let bottom = self.page_height - (baseline - size * 0.2);

        self.spans.push(TextSpan::new(
            text,
            font_name,
            size,
            BoundingBox::new(x, top, x + width, bottom),
            self.page_index,
        ));
        matrix.advance(chars * font_size * matrix.vertical_scale() * AVG_CHAR_WIDTH);
    }
}

/// Affine transform `[a b c d e f]`, row-vector convention as in PDF.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Matrix {
    const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// `self` applied first, then `other`.
    fn then(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (x * self.a + y * self.c + self.e, x * self.b + y * self.d + self.f)
    }

    fn vertical_scale(&self) -> f32 {
        let scale = (self.b * self.b + self.d * self.d).sqrt();
        if scale > 0.0 {
            scale
        } else {
            1.0
        }
    }
}

/// Text matrix for tracking position in content stream.
#[derive(Debug, Clone)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
    /// Start of the current line (Td is relative to it)
    line_e: f32,
    line_f: f32,
    leading: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
            line_e: 0.0,
            line_f: 0.0,
            leading: 12.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.e = e;
        self.f = f;
        self.line_e = e;
        self.line_f = f;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.line_e += tx * self.a + ty * self.c;
        self.line_f += tx * self.b + ty * self.d;
        self.e = self.line_e;
        self.f = self.line_f;
    }

    fn next_line(&mut self) {
        self.translate(0.0, -self.leading);
    }

    fn advance(&mut self, dx: f32) {
        self.e += dx;
    }

    fn as_matrix(&self) -> Matrix {
        Matrix::new(self.a, self.b, self.c, self.d, self.e, self.f)
    }

    fn vertical_scale(&self) -> f32 {
        self.as_matrix().vertical_scale()
    }
}

/// Read the document information dictionary.
fn extract_info(doc: &LopdfDocument) -> DocumentInfo {
    let mut info = DocumentInfo::with_version(doc.version.to_string());

    let dict = match doc.trailer.get(b"Info") {
        Ok(Object::Reference(r)) => doc.get_dictionary(*r).ok(),
        Ok(Object::Dictionary(d)) => Some(d),
        _ => None,
    };

    if let Some(dict) = dict {
        info.title = get_string_from_dict(dict, b"Title");
        info.author = get_string_from_dict(dict, b"Author");
        info.subject = get_string_from_dict(dict, b"Subject");
        info.keywords = get_string_from_dict(dict, b"Keywords");
        info.creator = get_string_from_dict(dict, b"Creator");
        info.producer = get_string_from_dict(dict, b"Producer");
        info.created = get_string_from_dict(dict, b"CreationDate").and_then(|s| parse_pdf_date(&s));
        info.modified = get_string_from_dict(dict, b"ModDate").and_then(|s| parse_pdf_date(&s));
    }

    info
}

/// Helper to get a string from a PDF dictionary.
fn get_string_from_dict(dict: &Dictionary, key: &[u8]) -> Option<String> {
    match dict.get(key).ok()? {
        Object::String(bytes, _) => Some(decode_text_simple(bytes)),
        Object::Name(bytes) => String::from_utf8(bytes.clone()).ok(),
        _ => None,
    }
}

/// Parse a PDF date string (D:YYYYMMDDHHmmSSOHH'mm').
fn parse_pdf_date(s: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    let s = s.strip_prefix("D:").unwrap_or(s);

    let year: i32 = s.get(0..4)?.parse().ok()?;
    let field = |range: std::ops::Range<usize>, default: u32| {
        s.get(range).and_then(|v| v.parse().ok()).unwrap_or(default)
    };

    chrono::NaiveDate::from_ymd_opt(year, field(4..6, 1), field(6..8, 1))
        .and_then(|date| date.and_hms_opt(field(8..10, 0), field(10..12, 0), field(12..14, 0)))
        .map(|dt| chrono::DateTime::from_naive_utc_and_offset(dt, chrono::Utc))
}

/// Helper to extract number from PDF object.
fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Simple text decoding fallback when no encoding is available.
fn decode_text_simple(bytes: &[u8]) -> String {
    // UTF-16BE with BOM
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    // Latin-1
    bytes.iter().map(|&b| b as char).collect()
}
