//! Error types for Bookpress Core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using BookpressError
pub type Result<T> = std::result::Result<T, BookpressError>;

/// Top-level error type for all Bookpress operations
#[derive(Debug, Error)]
pub enum BookpressError {
    #[error("Package error: {0}")]
    Package(#[from] PackageError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while opening or reading an ebook package
#[derive(Debug, Error)]
pub enum PackageError {
    #[error("Invalid EPUB: {0}")]
    InvalidEpub(String),

    #[error("Resource not found: {0}")]
    MissingResource(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while producing the output document
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to start renderer '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Renderer '{program}' exited with {status}: {stderr}")]
    CommandFailed {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("Could not write {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while rewriting image references inside one fragment
#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("Fragment has {found} image tags, limit is {limit}")]
    TagBudgetExceeded { found: usize, limit: usize },
}
