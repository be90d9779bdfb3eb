//! PDF renderer delegating to an external HTML-to-PDF program
//!
//! The program is invoked as `<program> --base-url <dir> <input.html> <output>`,
//! the calling convention of `weasyprint`.

use super::DocumentRenderer;
use crate::error::RenderError;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

/// Default HTML-to-PDF program
pub const DEFAULT_PROGRAM: &str = "weasyprint";

/// Renders PDF through an external command
#[derive(Debug, Clone)]
pub struct CommandRenderer {
    program: String,
    extra_args: Vec<String>,
}

impl CommandRenderer {
    pub fn new() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            extra_args: Vec::new(),
        }
    }

    /// Use a different program
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Arguments placed before the standard ones
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for CommandRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentRenderer for CommandRenderer {
    fn render(&self, markup: &str, base_dir: &Path, output: &Path) -> Result<(), RenderError> {
        let scratch_dir = output
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let io_err = |source: std::io::Error| RenderError::Io {
            path: scratch_dir.to_path_buf(),
            source,
        };

        let mut input = tempfile::Builder::new()
            .prefix(".bookpress-")
            .suffix(".html")
            .tempfile_in(scratch_dir)
            .map_err(io_err)?;
        input.write_all(markup.as_bytes()).map_err(io_err)?;
        input.flush().map_err(io_err)?;

        tracing::debug!("Running {} for {:?}", self.program, output);

        let result = Command::new(&self.program)
            .args(&self.extra_args)
            .arg("--base-url")
            .arg(base_dir)
            .arg(input.path())
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| RenderError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let stderr = String::from_utf8_lossy(&result.stderr);
        if !result.status.success() {
            return Err(RenderError::CommandFailed {
                program: self.program.clone(),
                status: result.status,
                stderr: stderr.trim().to_string(),
            });
        }
        if !stderr.trim().is_empty() {
            tracing::debug!("{}: {}", self.program, stderr.trim());
        }

        Ok(())
    }

    fn format_name(&self) -> &str {
        "PDF"
    }

    fn file_extension(&self) -> &str {
        "pdf"
    }
}
