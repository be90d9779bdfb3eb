//! Info command implementation

use anyhow::{Context, Result};
use bookpress_core::{EpubPackage, PackageInfo};
use std::path::Path;

/// Display information about an EPUB file
pub fn info(input: &Path, json: bool) -> Result<()> {
    let package = EpubPackage::open(input)
        .with_context(|| format!("Failed to open {}", input.display()))?;

    let fallback_title = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let info = PackageInfo::from_package(&package, &fallback_title);

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("Title:       {}", info.title);
        println!("Author:      {}", info.author);
        println!("Spine:       {}", info.spine_length);
        println!("Images:      {}", info.images);
        println!("Documents:   {}", info.documents.len());
        for (i, href) in info.documents.iter().enumerate() {
            println!("  {:>3}. {}", i + 1, href);
        }
    }

    Ok(())
}
