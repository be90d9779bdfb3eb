//! Renderers turning assembled markup into output files

mod command;
mod html;

pub use command::{CommandRenderer, DEFAULT_PROGRAM};
pub use html::HtmlRenderer;

use crate::error::RenderError;
use std::path::Path;

/// Trait for producing a document file from assembled markup
pub trait DocumentRenderer {
    /// Render `markup` to `output`
    ///
    /// Relative references left in the markup resolve against `base_dir`.
    fn render(&self, markup: &str, base_dir: &Path, output: &Path) -> Result<(), RenderError>;

    /// Format name (e.g., "PDF", "HTML")
    fn format_name(&self) -> &str;

    /// File extension for this format
    fn file_extension(&self) -> &str;
}

/// Get a renderer by format name
pub fn renderer_for_format(format: &str) -> Option<Box<dyn DocumentRenderer>> {
    match format.to_lowercase().as_str() {
        "pdf" => Some(Box::new(CommandRenderer::new())),
        "html" | "htm" => Some(Box::new(HtmlRenderer::new())),
        _ => None,
    }
}
