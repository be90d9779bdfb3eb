//! Pass-through renderer writing the assembled markup as an HTML file

use super::DocumentRenderer;
use crate::error::RenderError;
use std::path::Path;

/// Writes the markup unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl HtmlRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentRenderer for HtmlRenderer {
    fn render(&self, markup: &str, _base_dir: &Path, output: &Path) -> Result<(), RenderError> {
        std::fs::write(output, markup).map_err(|source| RenderError::Io {
            path: output.to_path_buf(),
            source,
        })
    }

    fn format_name(&self) -> &str {
        "HTML"
    }

    fn file_extension(&self) -> &str {
        "html"
    }
}
