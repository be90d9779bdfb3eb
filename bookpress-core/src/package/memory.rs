//! In-memory package, for callers that already hold the parts of a book

use super::{Package, ResourceItem};
use crate::error::PackageError;
use std::collections::HashMap;

/// A package assembled from owned parts
#[derive(Debug, Clone, Default)]
pub struct MemoryPackage {
    metadata: HashMap<String, String>,
    items: Vec<ResourceItem>,
    contents: HashMap<String, Vec<u8>>,
    linear_order: Option<Vec<String>>,
}

impl MemoryPackage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a metadata field
    pub fn with_metadata(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(field.into(), value.into());
        self
    }

    /// Add an item with its content
    pub fn with_item(mut self, item: ResourceItem, content: impl Into<Vec<u8>>) -> Self {
        self.contents.insert(item.id.clone(), content.into());
        self.items.push(item);
        self
    }

    /// Add an item whose content cannot be read
    pub fn with_unreadable_item(mut self, item: ResourceItem) -> Self {
        self.items.push(item);
        self
    }

    /// Add an XHTML document
    pub fn with_document(
        self,
        id: impl Into<String>,
        href: impl Into<String>,
        markup: impl Into<String>,
    ) -> Self {
        let item = ResourceItem::new(id, href, "application/xhtml+xml");
        self.with_item(item, markup.into().into_bytes())
    }

    /// Add an image, its media type guessed from the href
    pub fn with_image(
        self,
        id: impl Into<String>,
        href: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) -> Self {
        let href = href.into();
        let mime = crate::mime::mime_for_filename(&href);
        let item = ResourceItem::new(id, href, mime);
        self.with_item(item, data)
    }

    /// Declare the linear reading order
    pub fn with_linear_order<I, S>(mut self, order: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.linear_order = Some(order.into_iter().map(Into::into).collect());
        self
    }
}

impl Package for MemoryPackage {
    fn metadata(&self, field: &str) -> Option<String> {
        self.metadata.get(field).cloned()
    }

    fn items(&self) -> &[ResourceItem] {
        &self.items
    }

    fn linear_order(&self) -> Option<&[String]> {
        self.linear_order.as_deref()
    }

    fn read(&self, item: &ResourceItem) -> Result<Vec<u8>, PackageError> {
        self.contents
            .get(&item.id)
            .cloned()
            .ok_or_else(|| PackageError::MissingResource(item.href.clone()))
    }
}
