//! Integration tests for persona analysis across documents.

mod common;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use common::{body, bold, write_pdf};
use pdfscope::error::Result;
use pdfscope::render::{self, JsonFormat, ANALYSIS_OUTPUT_NAME};
use pdfscope::{
    analyze_documents, AnalysisConfig, AnalysisResult, Embedder, Error, MemoryDocument,
    PersonaAnalyzer,
};

/// Places the query on the x axis, "coastal" sections near it and
/// everything else almost orthogonal.
struct TopicEmbedder {
    calls: AtomicUsize,
}

impl TopicEmbedder {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Embedder for TopicEmbedder {
    fn name(&self) -> &str {
        "topic"
    }

    fn encode(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(if text.starts_with("Travel Planner") {
            vec![1.0, 0.0]
        } else if text.contains("Coastal") {
            vec![0.6, 0.8]
        } else {
            vec![0.1, 0.995]
        })
    }
}

struct UnavailableEmbedder;

impl Embedder for UnavailableEmbedder {
    fn name(&self) -> &str {
        "unavailable"
    }

    fn encode(&self, _text: &str) -> Result<Vec<f32>> {
        Err(Error::EmbeddingService("model weights not found".to_string()))
    }
}

fn travel_documents(dir: &Path) -> Vec<PathBuf> {
    let cities = dir.join("south_of_france_cities.pdf");
    write_pdf(
        &cities,
        None,
        &[
            vec![
                bold("Coastal Adventures", 16),
                body("hiking along the cliffs and swimming in quiet coves."),
                bold("Museum Hours", 16),
                body("most museums close on mondays."),
            ],
            vec![
                bold("Tax Information", 16),
                body("visitors may reclaim sales tax on large purchases."),
            ],
        ],
    );

    let cuisine = dir.join("south_of_france_cuisine.pdf");
    write_pdf(
        &cuisine,
        None,
        &[vec![
            bold("Wine Regions", 16),
            body("the rhone valley produces robust reds."),
            bold("Cooking Classes", 16),
            body("classes run in the mornings."),
            bold("Market Days", 16),
            body("markets open early on saturdays."),
        ]],
    );

    vec![cities, cuisine]
}

fn travel_config() -> AnalysisConfig {
    AnalysisConfig::new("Travel Planner", "Plan a 5-day trip")
}

#[test]
fn test_single_relevant_section() {
    let dir = tempfile::tempdir().unwrap();
    let paths = travel_documents(dir.path());

    let analyzer = PersonaAnalyzer::new(TopicEmbedder::new());
    let result = analyzer.analyze_paths(&paths, &travel_config()).unwrap();

    assert_eq!(result.extracted_sections.len(), 1);
    let section = &result.extracted_sections[0];
    assert_eq!(section.section_title, "Coastal Adventures");
    assert_eq!(section.document, "south of france cities.pdf");
    assert_eq!(section.importance_rank, 1);
    assert_eq!(section.page_number, 1);

    assert_eq!(
        result.subsection_analysis[0].refined_text,
        "Key insights from 'Coastal Adventures' relevant to Travel Planner for Plan a 5-day trip."
    );
    assert_eq!(
        result.metadata.input_documents,
        vec!["south of france cities.pdf", "south of france cuisine.pdf"]
    );
    // One query plus six unique sections.
    assert_eq!(analyzer.embedder().calls(), 7);
}

#[test]
fn test_sequential_matches_parallel() {
    let dir = tempfile::tempdir().unwrap();
    let paths = travel_documents(dir.path());
    let analyzer = PersonaAnalyzer::new(TopicEmbedder::new());

    let parallel = analyzer.analyze_paths(&paths, &travel_config()).unwrap();
    let sequential = analyzer
        .analyze_paths(&paths, &travel_config().sequential())
        .unwrap();

    assert_eq!(parallel.extracted_sections, sequential.extracted_sections);
    assert_eq!(parallel.subsection_analysis, sequential.subsection_analysis);
}

#[test]
fn test_embedding_failure_aborts_analysis() {
    let dir = tempfile::tempdir().unwrap();
    let paths = travel_documents(dir.path());

    let analyzer = PersonaAnalyzer::new(UnavailableEmbedder);
    let err = analyzer.analyze_paths(&paths, &travel_config()).unwrap_err();
    assert!(matches!(err, Error::EmbeddingService(_)));
}

#[test]
fn test_empty_document_list_is_rejected_before_embedding() {
    let analyzer = PersonaAnalyzer::new(TopicEmbedder::new());
    let paths: Vec<PathBuf> = Vec::new();

    let err = analyzer.analyze_paths(&paths, &travel_config()).unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));
    assert_eq!(analyzer.embedder().calls(), 0);

    let err = analyze_documents(&paths, &travel_config()).unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));
}

#[test]
fn test_missing_persona_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let paths = travel_documents(dir.path());
    let analyzer = PersonaAnalyzer::new(TopicEmbedder::new());

    let config = AnalysisConfig::new("Travel Planner", "");
    assert!(matches!(
        analyzer.analyze_paths(&paths, &config),
        Err(Error::Configuration(_))
    ));
    assert_eq!(analyzer.embedder().calls(), 0);
}

#[test]
fn test_duplicate_sections_enter_pool_once() {
    let dir = tempfile::tempdir().unwrap();
    let paths = travel_documents(dir.path());
    let same_twice = vec![paths[0].clone(), paths[0].clone()];

    let analyzer = PersonaAnalyzer::new(TopicEmbedder::new());
    let result = analyzer.analyze_paths(&same_twice, &travel_config()).unwrap();

    assert_eq!(result.extracted_sections.len(), 1);
    // One query plus the three sections of the repeated document.
    assert_eq!(analyzer.embedder().calls(), 4);
}

#[test]
fn test_unreadable_document_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let mut paths = travel_documents(dir.path());
    let broken = dir.path().join("broken.pdf");
    std::fs::write(&broken, b"not a pdf").unwrap();
    paths.push(broken);

    let analyzer = PersonaAnalyzer::new(TopicEmbedder::new());
    let result = analyzer.analyze_paths(&paths, &travel_config()).unwrap();

    assert_eq!(result.extracted_sections.len(), 1);
    assert_eq!(result.skipped_documents.len(), 1);
    assert_eq!(result.skipped_documents[0].document, "broken.pdf");
    assert_eq!(result.metadata.input_documents.len(), 3);
}

#[test]
fn test_builtin_embedder_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let paths = travel_documents(dir.path());
    let config = AnalysisConfig::new("Travel Planner", "Find coastal hiking and swimming spots");

    let result = analyze_documents(&paths, &config).unwrap();
    assert!(!result.extracted_sections.is_empty());
    assert!(result.extracted_sections.len() <= 5);
    assert_eq!(result.extracted_sections[0].section_title, "Coastal Adventures");
}

#[test]
fn test_analysis_output_shape() {
    let dir = tempfile::tempdir().unwrap();
    let mut doc = MemoryDocument::new();
    doc.add_page_with_text(Vec::new(), "");

    let analyzer = PersonaAnalyzer::new(TopicEmbedder::new());
    let result = analyzer
        .analyze_sources(&[("empty_notes.pdf", doc)], &travel_config())
        .unwrap();

    let target = dir.path().join(ANALYSIS_OUTPUT_NAME);
    render::write_json(&result, &target, JsonFormat::Pretty).unwrap();
    let written = std::fs::read_to_string(&target).unwrap();

    let position = |key: &str| written.find(&format!("\"{}\"", key)).unwrap();
    let order = [
        "metadata",
        "input_documents",
        "persona",
        "job_to_be_done",
        "processing_timestamp",
        "extracted_sections",
        "subsection_analysis",
    ];
    for pair in order.windows(2) {
        assert!(position(pair[0]) < position(pair[1]), "{} before {}", pair[0], pair[1]);
    }
    assert!(!written.contains("\"error\""));

    let value: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(value["metadata"]["input_documents"][0], "empty notes.pdf");
}

#[test]
fn test_failed_result_has_success_shape() {
    let failed = AnalysisResult::failed(
        &["a_b.pdf".to_string()],
        "Travel Planner",
        "Plan a 5-day trip",
        "Embedding service error: model weights not found",
    );

    let json = render::to_json(&failed, JsonFormat::Compact).unwrap();
    assert!(json.contains(r#""input_documents":["a b.pdf"]"#));
    assert!(json.contains(r#""extracted_sections":[]"#));
    assert!(json.contains(r#""error":"Embedding service error: model weights not found""#));
}
