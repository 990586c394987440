//! Integration tests for outline extraction from real PDF files.

mod common;

use common::{body, bold, heading, write_pdf};
use pdfscope::model::{ERROR_TITLE, UNTITLED};
use pdfscope::render::{self, JsonFormat};
use pdfscope::{
    extract_structure, extract_structure_batch, extract_structure_with_options, DocumentSource,
    HeadingLevel, StructureOptions,
};

fn annual_report(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("annual_report.pdf");
    write_pdf(
        &path,
        Some("Annual Report 2023"),
        &[
            vec![
                bold("Company Highlights Overview", 26),
                heading("1 Introduction", 18),
                body("this report summarizes the year."),
                heading("1.1 Background", 14),
                body("the company expanded into new markets."),
            ],
            vec![
                heading("2 Financial Results", 18),
                body("revenue grew by twelve percent."),
                heading("2.1.1 Regional Detail", 14),
            ],
        ],
    );
    path
}

#[test]
fn test_metadata_title_is_used_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let outline = extract_structure(annual_report(dir.path()));

    assert!(!outline.is_error());
    assert_eq!(outline.title, "Annual Report 2023");
}

#[test]
fn test_numbered_headings() {
    let dir = tempfile::tempdir().unwrap();
    let outline = extract_structure(annual_report(dir.path()));

    let entries: Vec<_> = outline
        .sections
        .iter()
        .map(|h| (h.level, h.text.as_str(), h.page_number))
        .collect();
    assert_eq!(
        entries,
        vec![
            (HeadingLevel::H1, "Company Highlights Overview", 1),
            (HeadingLevel::H1, "1 Introduction", 1),
            (HeadingLevel::H2, "1.1 Background", 1),
            (HeadingLevel::H1, "2 Financial Results", 2),
            (HeadingLevel::H3, "2.1.1 Regional Detail", 2),
        ]
    );
}

#[test]
fn test_strip_numbering_option() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("intro.pdf");
    write_pdf(
        &path,
        None,
        &[vec![heading("1 Introduction", 18), heading("1.1 Background", 14)]],
    );

    let options = StructureOptions::new().with_strip_numbering(true);
    let outline = extract_structure_with_options(&path, &options);

    let json = render::to_json(&outline.sections, JsonFormat::Compact).unwrap();
    assert_eq!(
        json,
        r#"[{"level":"H1","text":"Introduction","page":1},{"level":"H2","text":"Background","page":1}]"#
    );
}

#[test]
fn test_layout_title_without_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("guide.pdf");
    write_pdf(
        &path,
        None,
        &[vec![
            bold("Mediterranean Travel Guide", 24),
            heading("Coastal Towns", 16),
            body("small harbours and quiet beaches."),
        ]],
    );

    let outline = extract_structure(&path);
    assert_eq!(outline.title, "Mediterranean Travel Guide");
    assert_eq!(outline.sections[0].level, HeadingLevel::H1);
    assert_eq!(outline.sections[1].level, HeadingLevel::H2);
}

#[test]
fn test_untitled_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plain.pdf");
    write_pdf(&path, None, &[vec![body("tiny"), body("text")]]);

    let outline = extract_structure(&path);
    assert_eq!(outline.title, UNTITLED);
    assert!(outline.sections.is_empty());
}

#[test]
fn test_corrupt_file_yields_error_outline() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("corrupt.pdf");
    std::fs::write(&path, b"%PDF-1.4\nthis is not really a pdf").unwrap();

    let outline = extract_structure(&path);
    assert_eq!(outline.title, ERROR_TITLE);
    assert!(outline.sections.is_empty());
    assert!(outline.error.is_some());

    let json = render::to_json(&outline, JsonFormat::Compact).unwrap();
    assert!(json.starts_with(r#"{"title":"Error","outline":[],"error":"#));
}

#[test]
fn test_extraction_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = annual_report(dir.path());

    assert_eq!(extract_structure(&path), extract_structure(&path));
}

#[test]
fn test_batch_reports_per_file() {
    let dir = tempfile::tempdir().unwrap();
    let good = annual_report(dir.path());
    let bad = dir.path().join("broken.pdf");
    std::fs::write(&bad, b"garbage").unwrap();

    let entries = extract_structure_batch(&[good, bad], &StructureOptions::new());
    assert_eq!(entries.len(), 2);
    assert!(entries[0].is_success());
    assert_eq!(entries[0].file_name, "annual_report.pdf");
    assert!(!entries[1].is_success());
    assert_eq!(entries[1].file_name, "broken.pdf");
}

#[test]
fn test_structure_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = annual_report(dir.path());
    let outline = extract_structure(&path);

    let target = render::structure_output_path(dir.path().join("output"), &path);
    render::write_json(&outline, &target, JsonFormat::Pretty).unwrap();

    assert!(target.ends_with("annual_report_structure.json"));
    let written = std::fs::read_to_string(&target).unwrap();
    assert!(written.starts_with("{\n  \"title\": \"Annual Report 2023\",\n  \"outline\": ["));
}

#[test]
fn test_document_info_and_text() {
    let dir = tempfile::tempdir().unwrap();
    let doc = pdfscope::open(annual_report(dir.path())).unwrap();

    assert_eq!(doc.page_count(), 2);
    let info = doc.info();
    assert_eq!(info.title(), Some("Annual Report 2023"));
    assert_eq!(info.producer.as_deref(), Some("pdfscope tests"));
    assert_eq!(info.pdf_version, "1.5");
    assert!(info.created.is_some());

    let text = doc.page_text(0);
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines[1], "1 Introduction");
    assert_eq!(lines[2], "this report summarizes the year.");
    assert!(doc.page_spans(7).is_empty());
}
