//! Batch conversion command implementation

use crate::BatchArgs;
use anyhow::{bail, Result};
use bookpress_core::{ConversionOutcome, Converter};
use indicatif::{ProgressBar, ProgressStyle};

/// Convert every EPUB under the source directory
pub fn batch(args: &BatchArgs) -> Result<()> {
    let renderer = super::build_renderer(&args.render)?;
    let converter = Converter::new(&args.source, &args.output, renderer)
        .with_options(args.render.options().with_force(args.force));

    let files = converter.find_inputs();
    if files.is_empty() {
        println!("No EPUB files found in {}", args.source.display());
        return Ok(());
    }

    println!(
        "Found {} files to convert to {}",
        files.len(),
        converter.renderer().format_name()
    );

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")?
            .progress_chars("##-"),
    );

    let summary = converter.convert_inputs_with(&files, |path, outcome| {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match outcome {
            ConversionOutcome::Failed => pb.set_message(format!("failed: {}", name)),
            _ => pb.set_message(name),
        }
        pb.inc(1);
    });

    pb.finish_and_clear();

    println!("\nBatch conversion complete:");
    println!("  Total:   {}", summary.total);
    println!("  Success: {}", summary.success);
    println!("  Skipped: {}", summary.skipped);
    println!("  Failed:  {}", summary.failed);

    if summary.failed > 0 {
        bail!("Batch conversion completed with {} failures", summary.failed);
    }

    Ok(())
}
