//! EPUB package reader backed by the `epub` crate

use super::{ItemKind, Package, ResourceItem};
use crate::error::PackageError;
use std::cell::RefCell;
use std::fs::File;
use std::io::BufReader;
use std::path::{Component, Path};

type EpubDoc = epub::doc::EpubDoc<BufReader<File>>;

/// An EPUB 2/3 file opened from disk
///
/// Item content is read lazily from the archive.
pub struct EpubPackage {
    doc: RefCell<EpubDoc>,
    items: Vec<ResourceItem>,
    spine: Option<Vec<String>>,
}

impl EpubPackage {
    /// Open and parse an EPUB file
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PackageError> {
        let path = path.as_ref();
        let doc = EpubDoc::new(path)
            .map_err(|e| PackageError::InvalidEpub(format!("{}: {}", path.display(), e)))?;

        let mut items: Vec<ResourceItem> = doc
            .resources
            .iter()
            .map(|(id, resource)| {
                let href = manifest_href(&resource.path, &doc.root_base);
                let mut item = ResourceItem::new(id.clone(), href, resource.mime.clone());
                // EPUB 3 navigation documents are XHTML but not part of the text
                if is_nav(resource.properties.as_deref()) {
                    item.kind = ItemKind::Other;
                }
                item
            })
            .collect();
        // The manifest is keyed by id and carries no order of its own
        items.sort_by(|a, b| a.href.cmp(&b.href));

        let spine: Vec<String> = doc.spine.iter().map(|s| s.idref.clone()).collect();

        tracing::debug!(
            "Opened {:?}: {} manifest items, {} spine entries",
            path,
            items.len(),
            spine.len()
        );

        Ok(Self {
            doc: RefCell::new(doc),
            items,
            spine: (!spine.is_empty()).then_some(spine),
        })
    }
}

impl Package for EpubPackage {
    fn metadata(&self, field: &str) -> Option<String> {
        self.doc
            .borrow()
            .mdata(field)
            .map(|item| item.value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn items(&self) -> &[ResourceItem] {
        &self.items
    }

    fn linear_order(&self) -> Option<&[String]> {
        self.spine.as_deref()
    }

    fn read(&self, item: &ResourceItem) -> Result<Vec<u8>, PackageError> {
        self.doc
            .borrow_mut()
            .get_resource(&item.id)
            .map(|(data, _mime)| data)
            .ok_or_else(|| PackageError::MissingResource(item.href.clone()))
    }
}

fn is_nav(properties: Option<&str>) -> bool {
    properties
        .map(|p| p.split_whitespace().any(|prop| prop == "nav"))
        .unwrap_or(false)
}

/// Archive path made relative to the package document, `/`-separated
fn manifest_href(path: &Path, root_base: &Path) -> String {
    let relative = path.strip_prefix(root_base).unwrap_or(path);
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            Component::ParentDir => Some("..".into()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
