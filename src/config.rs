//! Options for structure extraction and persona analysis.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Default number of ranked sections returned.
pub const DEFAULT_TOP_K: usize = 5;

/// Default minimum cosine similarity for a section to be kept.
pub const DEFAULT_RELEVANCE_THRESHOLD: f32 = 0.2;

/// Default keywords for the first-page text title fallback.
pub const DEFAULT_TITLE_KEYWORDS: &[&str] = &["challenge", "overview", "module"];

/// How font size maps to heading level when numbering does not decide it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LevelPolicy {
    /// Top three distinct candidate sizes of the document become H1/H2/H3
    #[default]
    Tiered,
    /// Fixed thresholds: >= 16pt H1, >= 14pt H2, else H3
    Absolute,
}

/// Options for outline extraction.
#[derive(Debug, Clone)]
pub struct StructureOptions {
    /// Font-size level policy
    pub level_policy: LevelPolicy,

    /// Keywords for the first-page text title fallback
    pub title_keywords: Vec<String>,

    /// Remove leading numbering ("1.2 ") from heading display text
    pub strip_numbering: bool,

    /// Drop page labels, captions, URLs and similar noise
    pub skip_noise: bool,

    /// Order the outline by importance instead of reading order
    pub sort_by_importance: bool,

    /// Process documents of a batch in parallel
    pub parallel: bool,
}

impl StructureOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the level policy.
    pub fn with_level_policy(mut self, policy: LevelPolicy) -> Self {
        self.level_policy = policy;
        self
    }

    /// Set the title keywords.
    pub fn with_title_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.title_keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Enable or disable numbering removal in display text.
    pub fn with_strip_numbering(mut self, strip: bool) -> Self {
        self.strip_numbering = strip;
        self
    }

    /// Enable or disable the noise filter.
    pub fn with_skip_noise(mut self, skip: bool) -> Self {
        self.skip_noise = skip;
        self
    }

    /// Enable or disable importance ordering.
    pub fn with_sort_by_importance(mut self, sort: bool) -> Self {
        self.sort_by_importance = sort;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl Default for StructureOptions {
    fn default() -> Self {
        Self {
            level_policy: LevelPolicy::Tiered,
            title_keywords: DEFAULT_TITLE_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            strip_numbering: false,
            skip_noise: false,
            sort_by_importance: false,
            parallel: true,
        }
    }
}

/// Persona analysis request.
///
/// Deserializes from the `persona_config.json` shape
/// (`{"persona": ..., "job_to_be_done": ...}`); the remaining fields are
/// optional.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Who the ranking is for
    pub persona: String,

    /// What they are trying to do
    pub job_to_be_done: String,

    /// Maximum number of ranked sections
    pub top_k: usize,

    /// Minimum similarity (exclusive)
    pub relevance_threshold: f32,

    /// Extract documents in parallel
    pub parallel: bool,

    /// Options used for heading detection
    #[serde(skip)]
    pub structure: StructureOptions,
}

impl AnalysisConfig {
    /// Create a config for a persona and job.
    pub fn new(persona: impl Into<String>, job_to_be_done: impl Into<String>) -> Self {
        Self {
            persona: persona.into(),
            job_to_be_done: job_to_be_done.into(),
            ..Default::default()
        }
    }

    /// Load a config from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)?;
        serde_json::from_str(&data)
            .map_err(|e| Error::Configuration(format!("{}: {}", path.display(), e)))
    }

    /// Set the number of ranked sections.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Set the relevance threshold.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.relevance_threshold = threshold;
        self
    }

    /// Set the structure options used for heading detection.
    pub fn with_structure_options(mut self, options: StructureOptions) -> Self {
        self.structure = options;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Reject incomplete requests before any work is done.
    pub fn validate(&self) -> Result<()> {
        if self.persona.trim().is_empty() {
            return Err(Error::Configuration("persona is required".to_string()));
        }
        if self.job_to_be_done.trim().is_empty() {
            return Err(Error::Configuration("job_to_be_done is required".to_string()));
        }
        if self.top_k == 0 {
            return Err(Error::Configuration("top_k must be at least 1".to_string()));
        }
        if !(-1.0..=1.0).contains(&self.relevance_threshold) {
            return Err(Error::Configuration(format!(
                "relevance_threshold {} is outside [-1, 1]",
                self.relevance_threshold
            )));
        }
        Ok(())
    }

    /// Ranking query: `"{persona}. {job}"`.
    pub fn query(&self) -> String {
        format!("{}. {}", self.persona, self.job_to_be_done)
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            persona: String::new(),
            job_to_be_done: String::new(),
            top_k: DEFAULT_TOP_K,
            relevance_threshold: DEFAULT_RELEVANCE_THRESHOLD,
            parallel: true,
            structure: StructureOptions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structure_options_builder() {
        let options = StructureOptions::new()
            .with_level_policy(LevelPolicy::Absolute)
            .with_title_keywords(["guide"])
            .with_strip_numbering(true)
            .with_sort_by_importance(true)
            .sequential();

        assert_eq!(options.level_policy, LevelPolicy::Absolute);
        assert_eq!(options.title_keywords, vec!["guide".to_string()]);
        assert!(options.strip_numbering);
        assert!(options.sort_by_importance);
        assert!(!options.skip_noise);
        assert!(!options.parallel);
    }

    #[test]
    fn test_default_structure_options() {
        let options = StructureOptions::default();
        assert_eq!(options.level_policy, LevelPolicy::Tiered);
        assert_eq!(options.title_keywords.len(), 3);
        assert!(options.parallel);
    }

    #[test]
    fn test_config_from_json() {
        let config: AnalysisConfig = serde_json::from_str(
            r#"{"persona": "Travel Planner", "job_to_be_done": "Plan a 5-day trip"}"#,
        )
        .unwrap();

        assert_eq!(config.persona, "Travel Planner");
        assert_eq!(config.top_k, DEFAULT_TOP_K);
        assert_eq!(config.relevance_threshold, DEFAULT_RELEVANCE_THRESHOLD);
        assert_eq!(config.query(), "Travel Planner. Plan a 5-day trip");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("persona_config.json");
        std::fs::write(&path, r#"{"persona": "Analyst", "job_to_be_done": "Review", "top_k": 3}"#)
            .unwrap();

        let config = AnalysisConfig::from_file(&path).unwrap();
        assert_eq!(config.top_k, 3);

        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            AnalysisConfig::from_file(&path),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_validate_rejects_missing_fields() {
        assert!(matches!(
            AnalysisConfig::new("", "job").validate(),
            Err(Error::Configuration(_))
        ));
        assert!(matches!(
            AnalysisConfig::new("persona", "  ").validate(),
            Err(Error::Configuration(_))
        ));
        assert!(matches!(
            AnalysisConfig::new("persona", "job").with_top_k(0).validate(),
            Err(Error::Configuration(_))
        ));
        assert!(matches!(
            AnalysisConfig::new("persona", "job").with_threshold(1.5).validate(),
            Err(Error::Configuration(_))
        ));
    }
}
