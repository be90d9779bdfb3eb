//! Image collection: package images to inline `data:` references

use crate::config::Limits;
use crate::mime::mime_for_filename;
use crate::package::{basename, ItemKind, Package};
use base64::{engine::general_purpose::STANDARD, Engine};
use std::collections::HashMap;
use std::rc::Rc;

/// Lookup from path variants to inline data references
///
/// An image is registered under its manifest href and its basename; both keys
/// share one allocation.
#[derive(Debug, Clone, Default)]
pub struct ImageMap {
    entries: HashMap<String, Rc<str>>,
    images: usize,
}

impl ImageMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one image under its href and basename
    pub fn insert(&mut self, href: &str, data_ref: impl Into<Rc<str>>) {
        let data_ref = data_ref.into();
        let base = basename(href);
        if base != href && !base.is_empty() {
            self.entries.insert(base.to_string(), Rc::clone(&data_ref));
        }
        self.entries.insert(href.to_string(), data_ref);
        self.images += 1;
    }

    /// Exact-match lookup
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|v| &**v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of images accepted
    pub fn len(&self) -> usize {
        self.images
    }

    pub fn is_empty(&self) -> bool {
        self.images == 0
    }

    /// Number of lookup keys, counting href and basename separately
    pub fn key_count(&self) -> usize {
        self.entries.len()
    }
}

/// Build a `data:` URL for raw bytes
pub fn data_reference(filename: &str, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        mime_for_filename(filename),
        STANDARD.encode(bytes)
    )
}

/// Collect every embeddable image of a package
pub fn collect_images(package: &dyn Package, limits: &Limits) -> ImageMap {
    let mut images = ImageMap::new();

    for item in package.items().iter().filter(|i| i.kind == ItemKind::Image) {
        if images.len() >= limits.max_images {
            tracing::warn!(
                "Image limit ({}) reached, skipping remaining images",
                limits.max_images
            );
            break;
        }

        let bytes = match package.read(item) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("Failed to read image {}: {}", item.href, e);
                continue;
            }
        };

        if bytes.len() > limits.max_image_bytes {
            tracing::warn!(
                "Image {} is too large ({} bytes), skipping",
                item.href,
                bytes.len()
            );
            continue;
        }

        images.insert(&item.href, data_reference(&item.href, &bytes));
    }

    tracing::info!(
        "Embedded {} images ({} lookup keys)",
        images.len(),
        images.key_count()
    );

    images
}
