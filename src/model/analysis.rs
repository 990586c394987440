//! Persona analysis result types.

use serde::{Deserialize, Serialize};

use super::RankedSection;

/// Format of `processing_timestamp`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Result of a cross-document persona analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub metadata: AnalysisMetadata,
    pub extracted_sections: Vec<ExtractedSection>,
    pub subsection_analysis: Vec<SubsectionAnalysis>,

    /// Documents that could not be loaded; not part of the persisted shape
    #[serde(skip)]
    pub skipped_documents: Vec<SkippedDocument>,
}

/// Request metadata echoed in the result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    pub input_documents: Vec<String>,
    pub persona: String,
    pub job_to_be_done: String,
    pub processing_timestamp: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One ranked section in the persisted result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedSection {
    pub document: String,
    pub section_title: String,
    pub importance_rank: usize,
    pub page_number: usize,
}

/// Templated description of one ranked section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubsectionAnalysis {
    pub document: String,
    pub page_number: usize,
    pub refined_text: String,
}

/// A document dropped from an analysis because it failed to load.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedDocument {
    pub document: String,
    pub reason: String,
}

impl AnalysisResult {
    /// Build a result from ranked sections.
    pub fn from_ranked(
        input_documents: &[String],
        persona: &str,
        job_to_be_done: &str,
        ranked: &[RankedSection],
    ) -> Self {
        let extracted_sections = ranked
            .iter()
            .map(|r| ExtractedSection {
                document: display_name(&r.section.document_name),
                section_title: r.section.section_title.clone(),
                importance_rank: r.importance_rank,
                page_number: r.section.page_number,
            })
            .collect();

        let subsection_analysis = ranked
            .iter()
            .map(|r| SubsectionAnalysis {
                document: display_name(&r.section.document_name),
                page_number: r.section.page_number,
                refined_text: refined_text(&r.section.section_title, persona, job_to_be_done),
            })
            .collect();

        Self {
            metadata: AnalysisMetadata::new(input_documents, persona, job_to_be_done),
            extracted_sections,
            subsection_analysis,
            skipped_documents: Vec::new(),
        }
    }

    /// Error-carrying result with the same shape as a successful one.
    pub fn failed(
        input_documents: &[String],
        persona: &str,
        job_to_be_done: &str,
        reason: impl Into<String>,
    ) -> Self {
        let mut metadata = AnalysisMetadata::new(input_documents, persona, job_to_be_done);
        metadata.error = Some(reason.into());
        Self {
            metadata,
            ..Default::default()
        }
    }

    /// Whether this result carries an error.
    pub fn is_error(&self) -> bool {
        self.metadata.error.is_some()
    }
}

impl AnalysisMetadata {
    fn new(input_documents: &[String], persona: &str, job_to_be_done: &str) -> Self {
        Self {
            input_documents: input_documents.iter().map(|d| display_name(d)).collect(),
            persona: persona.to_string(),
            job_to_be_done: job_to_be_done.to_string(),
            processing_timestamp: chrono::Local::now().format(TIMESTAMP_FORMAT).to_string(),
            error: None,
        }
    }
}

/// Document name as shown in results: underscores become spaces.
pub fn display_name(document_name: &str) -> String {
    document_name.replace('_', " ")
}

/// Fixed-format description of a ranked section.
pub fn refined_text(section_title: &str, persona: &str, job_to_be_done: &str) -> String {
    format!(
        "Key insights from '{}' relevant to {} for {}.",
        section_title, persona, job_to_be_done
    )
}
