//! Bookpress Core Library
//!
//! This crate turns EPUB packages into a single self-contained HTML document
//! (chapters in spine order, images inlined as `data:` URLs, print style sheet)
//! and hands it to a renderer that produces the paginated output file.

pub mod assemble;
pub mod config;
pub mod convert;
pub mod error;
pub mod images;
pub mod mime;
pub mod package;
pub mod render;
pub mod rewrite;
pub mod sanitize;

pub use assemble::{AssembledDocument, ContentAssembler};
pub use config::{ConvertOptions, Limits, PageConfig};
pub use convert::{ConversionOutcome, ConversionSummary, ConvertedBook, Converter};
pub use error::{BookpressError, PackageError, RenderError, Result, RewriteError};
pub use images::{collect_images, ImageMap};
pub use package::{EpubPackage, ItemKind, MemoryPackage, Package, PackageInfo, ResourceItem};
pub use render::{renderer_for_format, CommandRenderer, DocumentRenderer, HtmlRenderer};
