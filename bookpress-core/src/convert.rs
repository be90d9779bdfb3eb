//! Per-file and batch conversion driver

use crate::assemble::ContentAssembler;
use crate::config::ConvertOptions;
use crate::error::Result;
use crate::package::EpubPackage;
use crate::render::DocumentRenderer;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Extension of the input packages
pub const INPUT_EXTENSION: &str = "epub";

/// How one file fared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionOutcome {
    Success,
    Failed,
    Skipped,
}

/// Counts over a batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConversionSummary {
    pub total: usize,
    pub success: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl ConversionSummary {
    pub fn record(&mut self, outcome: ConversionOutcome) {
        self.total += 1;
        match outcome {
            ConversionOutcome::Success => self.success += 1,
            ConversionOutcome::Failed => self.failed += 1,
            ConversionOutcome::Skipped => self.skipped += 1,
        }
    }
}

/// What a successful conversion produced
#[derive(Debug, Clone)]
pub struct ConvertedBook {
    pub title: String,
    pub author: String,
    pub chapters: usize,
    pub omitted: usize,
    pub images: usize,
}

/// Converts every package under a source root into an output root
pub struct Converter {
    source_root: PathBuf,
    output_root: PathBuf,
    renderer: Box<dyn DocumentRenderer>,
    options: ConvertOptions,
}

impl Converter {
    pub fn new(
        source_root: impl Into<PathBuf>,
        output_root: impl Into<PathBuf>,
        renderer: Box<dyn DocumentRenderer>,
    ) -> Self {
        Self {
            source_root: source_root.into(),
            output_root: output_root.into(),
            renderer,
            options: ConvertOptions::default(),
        }
    }

    /// Set conversion options
    pub fn with_options(mut self, options: ConvertOptions) -> Self {
        self.options = options;
        self
    }

    pub fn renderer(&self) -> &dyn DocumentRenderer {
        &*self.renderer
    }

    /// All input packages under the source root, sorted by path
    pub fn find_inputs(&self) -> Vec<PathBuf> {
        if !self.source_root.is_dir() {
            tracing::error!("Source directory does not exist: {:?}", self.source_root);
            return Vec::new();
        }

        let mut inputs: Vec<PathBuf> = walkdir::WalkDir::new(&self.source_root)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| has_input_extension(path))
            .collect();
        inputs.sort();

        tracing::info!("Found {} EPUB files", inputs.len());
        inputs
    }

    /// Output location for an input, mirroring its place under the source root
    pub fn output_path(&self, input: &Path) -> PathBuf {
        let relative = match input.strip_prefix(&self.source_root) {
            Ok(relative) => relative.to_path_buf(),
            Err(_) => input.file_name().map(PathBuf::from).unwrap_or_default(),
        };
        self.output_root
            .join(relative)
            .with_extension(self.renderer.file_extension())
    }

    /// Convert one file of the batch, containing every failure
    pub fn convert_file(&self, input: &Path) -> ConversionOutcome {
        let name = display_name(input);
        let output = self.output_path(input);

        if !self.options.force && is_up_to_date(input, &output) {
            tracing::info!("Skipping already converted file: {}", name);
            return ConversionOutcome::Skipped;
        }

        tracing::info!("Converting {}", name);
        match self.convert_to(input, &output) {
            Ok(book) => {
                tracing::info!(
                    "Converted {} -> {:?} ({} chapters, {} images)",
                    name,
                    output,
                    book.chapters,
                    book.images
                );
                ConversionOutcome::Success
            }
            Err(e) => {
                tracing::error!("Failed to convert {}: {}", name, e);
                ConversionOutcome::Failed
            }
        }
    }

    /// Convert one package to an explicit output path
    ///
    /// The renderer writes into a scratch file next to `output`, which only
    /// replaces `output` once rendering succeeded.
    pub fn convert_to(&self, input: &Path, output: &Path) -> Result<ConvertedBook> {
        let output_dir = match output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(output_dir)?;

        let package = EpubPackage::open(input)?;
        let fallback_title = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let document = ContentAssembler::new()
            .with_limits(self.options.limits)
            .with_page_config(self.options.page.clone())
            .assemble(&package, &fallback_title);

        let base_dir = match input.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let suffix = format!(".{}", self.renderer.file_extension());
        let mut builder = tempfile::Builder::new();
        builder.prefix(".bookpress-").suffix(&suffix);
        // Scratch files default to 0600; outputs get the usual umask-governed mode
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            builder.permissions(fs::Permissions::from_mode(0o666));
        }
        let staged = builder.tempfile_in(output_dir)?;
        self.renderer
            .render(document.as_str(), base_dir, staged.path())?;
        staged.persist(output).map_err(|e| e.error)?;

        Ok(ConvertedBook {
            title: document.title,
            author: document.author,
            chapters: document.chapters,
            omitted: document.omitted,
            images: document.images,
        })
    }

    /// Convert every input under the source root
    pub fn convert_all(&self) -> ConversionSummary {
        self.convert_all_with(|_, _| {})
    }

    /// Convert every input, reporting each outcome as it lands
    pub fn convert_all_with<F>(&self, on_file: F) -> ConversionSummary
    where
        F: FnMut(&Path, ConversionOutcome),
    {
        let inputs = self.find_inputs();
        if inputs.is_empty() {
            tracing::warn!("No EPUB files found in {:?}", self.source_root);
            return ConversionSummary::default();
        }
        self.convert_inputs_with(&inputs, on_file)
    }

    /// Convert a given list of inputs, one after the other
    pub fn convert_inputs_with<F>(
        &self,
        inputs: &[PathBuf],
        mut on_file: F,
    ) -> ConversionSummary
    where
        F: FnMut(&Path, ConversionOutcome),
    {
        let mut summary = ConversionSummary::default();

        for input in inputs {
            let outcome = self.convert_file(input);
            summary.record(outcome);
            on_file(input, outcome);
        }

        tracing::info!(
            "Conversion finished: total {}, success {}, failed {}, skipped {}",
            summary.total,
            summary.success,
            summary.failed,
            summary.skipped
        );

        summary
    }
}

/// Whether `output` exists and is at least as new as `input`
pub fn is_up_to_date(input: &Path, output: &Path) -> bool {
    let modified = |path: &Path| fs::metadata(path).and_then(|m| m.modified()).ok();
    match (modified(input), modified(output)) {
        (Some(input_time), Some(output_time)) => output_time >= input_time,
        _ => false,
    }
}

fn has_input_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(INPUT_EXTENSION))
        .unwrap_or(false)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
