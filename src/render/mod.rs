//! Output rendering: JSON for outlines and analysis results.

mod json;

pub use json::{
    structure_output_name, structure_output_path, to_json, write_json, JsonFormat,
    ANALYSIS_OUTPUT_NAME, STRUCTURE_OUTPUT_SUFFIX,
};
