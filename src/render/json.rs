//! JSON renderer — structured output for tooling integration.
//!
//! Direct serde serialization of the report model; field names and
//! kebab-case variant names are part of the output contract.

use crate::model::FileReport;
use crate::render::Renderer;

#[derive(Debug)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, report: &FileReport) -> String {
        // The model is plain strings and integers; serialization cannot fail.
        let mut out = serde_json::to_string_pretty(report)
            .expect("FileReport serializes to JSON");
        out.push('\n');
        out
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}
