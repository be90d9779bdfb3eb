//! Convert command implementation

use crate::RenderArgs;
use anyhow::{Context, Result};
use bookpress_core::Converter;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

/// Convert one EPUB file to an explicit output path
pub fn convert(input: &Path, output: &Path, render: &RenderArgs) -> Result<()> {
    let renderer = super::build_renderer(render)?;

    let source_root = input.parent().unwrap_or_else(|| Path::new("."));
    let output_root = output.parent().unwrap_or_else(|| Path::new("."));
    let converter =
        Converter::new(source_root, output_root, renderer).with_options(render.options());

    // Set up progress bar with animation
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!(
        "Converting {} to {}...",
        input.display(),
        converter.renderer().format_name()
    ));

    let book = match converter.convert_to(input, output) {
        Ok(book) => book,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e).with_context(|| format!("Failed to convert {}", input.display()));
        }
    };

    tracing::info!(
        "Assembled '{}' with {} chapters ({} omitted) and {} images",
        book.title,
        book.chapters,
        book.omitted,
        book.images
    );

    pb.finish_with_message(format!(
        "Converted '{}' to {} -> {}",
        book.title,
        converter.renderer().format_name(),
        output.display()
    ));

    Ok(())
}
