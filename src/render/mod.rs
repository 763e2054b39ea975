//! Renderer module — trait-based format dispatch.

pub mod json;
pub mod markdown;
pub mod text;

use crate::model::FileReport;
use anyhow::{anyhow, Result};

/// Trait for rendering a FileReport into a specific output format.
pub trait Renderer: std::fmt::Debug {
    fn render(&self, report: &FileReport) -> String;
    fn file_extension(&self) -> &str;
}

/// Create a renderer for the given format name.
pub fn create_renderer(format: &str) -> Result<Box<dyn Renderer>> {
    match format {
        "markdown" | "md" => Ok(Box::new(markdown::MarkdownRenderer)),
        "json" => Ok(Box::new(json::JsonRenderer)),
        "text" | "txt" => Ok(Box::new(text::TextRenderer)),
        _ => Err(anyhow!(
            "unknown format: {}. Use markdown, json, or text",
            format
        )),
    }
}
