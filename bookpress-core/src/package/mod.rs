//! Ebook packages: the parsed archive the conversion pipeline reads from

mod epub;
mod memory;

pub use self::epub::EpubPackage;
pub use memory::MemoryPackage;

use crate::assemble::{reading_order, resolve_author, resolve_title};
use crate::error::PackageError;
use serde::Serialize;

/// What a manifest item holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// A chapter or other markup document
    Document,
    /// A raster or vector image
    Image,
    /// Style sheets, fonts, navigation files and everything else
    Other,
}

impl ItemKind {
    /// Classify an item from its declared media type
    pub fn from_media_type(media_type: &str) -> Self {
        let media_type = media_type.trim().to_ascii_lowercase();
        match media_type.as_str() {
            "application/xhtml+xml" | "text/html" => ItemKind::Document,
            m if m.starts_with("image/") => ItemKind::Image,
            _ => ItemKind::Other,
        }
    }
}

/// One named piece of package content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceItem {
    /// Manifest identifier, referenced by the reading order
    pub id: String,
    /// Path as declared in the manifest
    pub href: String,
    /// Declared media type
    pub media_type: String,
    pub kind: ItemKind,
}

impl ResourceItem {
    pub fn new(
        id: impl Into<String>,
        href: impl Into<String>,
        media_type: impl Into<String>,
    ) -> Self {
        let media_type = media_type.into();
        Self {
            id: id.into(),
            href: href.into(),
            kind: ItemKind::from_media_type(&media_type),
            media_type,
        }
    }

    /// Final path segment of the href
    pub fn basename(&self) -> &str {
        basename(&self.href)
    }
}

/// Final segment of a `/`-separated path
pub fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Read access to a parsed ebook package
///
/// Content is fetched per item so that a damaged entry only costs that item.
pub trait Package {
    /// Metadata value by Dublin Core field name ("title", "creator", ...)
    fn metadata(&self, field: &str) -> Option<String>;

    /// All manifest items in encounter order
    fn items(&self) -> &[ResourceItem];

    /// Declared linear reading order as item identifiers, if any
    fn linear_order(&self) -> Option<&[String]>;

    /// Raw bytes of one item
    fn read(&self, item: &ResourceItem) -> Result<Vec<u8>, PackageError>;
}

/// Summary of a package, as printed by `bookpress info`
#[derive(Debug, Clone, Serialize)]
pub struct PackageInfo {
    pub title: String,
    pub author: String,
    pub spine_length: usize,
    pub images: usize,
    /// Document hrefs in the order they will be assembled
    pub documents: Vec<String>,
}

impl PackageInfo {
    pub fn from_package(package: &dyn Package, fallback_title: &str) -> Self {
        let documents: Vec<&ResourceItem> = package
            .items()
            .iter()
            .filter(|item| item.kind == ItemKind::Document)
            .collect();

        Self {
            title: resolve_title(package, fallback_title),
            author: resolve_author(package),
            spine_length: package.linear_order().map_or(0, <[String]>::len),
            images: package
                .items()
                .iter()
                .filter(|item| item.kind == ItemKind::Image)
                .count(),
            documents: reading_order(documents, package.linear_order())
                .into_iter()
                .map(|item| item.href.clone())
                .collect(),
        }
    }
}
