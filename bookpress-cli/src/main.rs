//! Bookpress CLI - Command-line interface for EPUB reflow conversion

mod commands;

use anyhow::Result;
use bookpress_core::config::{DEFAULT_OUTPUT_DIR, DEFAULT_SOURCE_DIR};
use bookpress_core::render::DEFAULT_PROGRAM;
use bookpress_core::{ConvertOptions, Limits};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Parse a count that must be at least 1
fn parse_positive(s: &str) -> Result<usize, String> {
    let n: usize = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
    if n < 1 {
        Err("value must be at least 1".to_string())
    } else {
        Ok(n)
    }
}

#[derive(Parser)]
#[command(name = "bookpress")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    batch: BatchArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Batch convert every EPUB under a directory (the default)
    Batch(BatchArgs),

    /// Convert a single EPUB file
    Convert {
        /// Input file path
        input: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        render: RenderArgs,
    },

    /// Display information about an EPUB file
    Info {
        /// Input file path
        input: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Directory searched recursively for EPUB files
    #[arg(short, long, default_value = DEFAULT_SOURCE_DIR)]
    pub source: PathBuf,

    /// Directory receiving the converted files
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output: PathBuf,

    /// Convert even when the output is newer than the input
    #[arg(long)]
    pub force: bool,

    #[command(flatten)]
    pub render: RenderArgs,
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Output format (pdf, html)
    #[arg(short, long, default_value = "pdf")]
    pub format: String,

    /// HTML-to-PDF program used for pdf output
    #[arg(long, default_value = DEFAULT_PROGRAM)]
    pub renderer: String,

    /// Maximum number of images embedded per book
    #[arg(long, default_value_t = Limits::default().max_images, value_parser = parse_positive)]
    pub max_images: usize,

    /// Maximum size of a single embedded image, in bytes
    #[arg(long, default_value_t = Limits::default().max_image_bytes, value_parser = parse_positive)]
    pub max_image_size: usize,
}

impl RenderArgs {
    /// Conversion options carrying the limits given on the command line
    pub fn options(&self) -> ConvertOptions {
        ConvertOptions::new().with_limits(Limits {
            max_images: self.max_images,
            max_image_bytes: self.max_image_size,
            ..Limits::default()
        })
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "bookpress_cli=debug,bookpress_core=debug"
    } else {
        "bookpress_cli=info,bookpress_core=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command.unwrap_or(Commands::Batch(cli.batch)) {
        Commands::Batch(args) => commands::batch(&args),

        Commands::Convert {
            input,
            output,
            render,
        } => commands::convert(&input, &output, &render),

        Commands::Info { input, json } => commands::info(&input, json),
    }
}
