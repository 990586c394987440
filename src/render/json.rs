//! JSON rendering and persistence of outlines and analysis results.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Error, Result};

/// File name of the cross-document analysis output.
pub const ANALYSIS_OUTPUT_NAME: &str = "persona_analysis.json";

/// Suffix appended to a document stem for its outline output.
pub const STRUCTURE_OUTPUT_SUFFIX: &str = "_structure.json";

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with two-space indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialize a value; keys keep struct declaration order.
pub fn to_json<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
        JsonFormat::Compact => serde_json::to_string(value),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Serialize a value into a file, creating parent directories as needed.
pub fn write_json<T: Serialize + ?Sized, P: AsRef<Path>>(
    value: &T,
    path: P,
    format: JsonFormat,
) -> Result<()> {
    let path = path.as_ref();
    let json = to_json(value, format)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, json)?;
    log::debug!("Wrote {}", path.display());
    Ok(())
}

/// Output file name for a document's outline: `<stem>_structure.json`.
pub fn structure_output_name<P: AsRef<Path>>(document: P) -> String {
    let stem = document
        .as_ref()
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    format!("{}{}", stem, STRUCTURE_OUTPUT_SUFFIX)
}

/// Output path for a document's outline inside `output_dir`.
pub fn structure_output_path<P: AsRef<Path>, Q: AsRef<Path>>(output_dir: P, document: Q) -> PathBuf {
    output_dir.as_ref().join(structure_output_name(document))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HeadingCandidate, HeadingLevel, Outline};

    fn outline() -> Outline {
        Outline::new(
            "Café Guide",
            vec![HeadingCandidate::new(HeadingLevel::H1, "Introduction", 1, 18.0)],
        )
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&outline(), JsonFormat::Pretty).unwrap();
        assert_eq!(
            json,
            "{\n  \"title\": \"Café Guide\",\n  \"outline\": [\n    {\n      \"level\": \"H1\",\n      \"text\": \"Introduction\",\n      \"page\": 1\n    }\n  ]\n}"
        );
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&outline(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
        assert!(json.starts_with(r#"{"title":"Café Guide""#));
    }

    #[test]
    fn test_write_json_creates_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join(structure_output_name("docs/report.pdf"));

        write_json(&outline(), &path, JsonFormat::Pretty).unwrap();
        let read: Outline = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(read, outline_without_size());
    }

    fn outline_without_size() -> Outline {
        let mut expected = outline();
        expected.sections[0].font_size = 0.0;
        expected
    }

    #[test]
    fn test_output_names() {
        assert_eq!(structure_output_name("docs/report.pdf"), "report_structure.json");
        assert_eq!(
            structure_output_path("out", "a.b.pdf"),
            PathBuf::from("out").join("a.b_structure.json")
        );
        assert_eq!(ANALYSIS_OUTPUT_NAME, "persona_analysis.json");
    }
}
