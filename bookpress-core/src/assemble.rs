//! Content assembly: one reflowable HTML document per book
//!
//! Chapters are concatenated in spine order behind a title page and a style
//! sheet tuned for paged output. Images travel inline as `data:` URLs, so the
//! result renders without access to the archive.

use crate::config::{Limits, PageConfig};
use crate::error::PackageError;
use crate::images::{collect_images, ImageMap};
use crate::package::{ItemKind, Package, ResourceItem};
use crate::rewrite::{blank_all_references, rewrite_references};
use crate::sanitize::{decode_fragment, sanitize_fragment};
use std::collections::HashMap;

/// Author shown when the package names none
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

/// The finished markup plus what went into it
#[derive(Debug, Clone)]
pub struct AssembledDocument {
    html: String,
    pub title: String,
    pub author: String,
    /// Chapters included
    pub chapters: usize,
    /// Chapters left out because they could not be read
    pub omitted: usize,
    /// Images embedded
    pub images: usize,
}

impl AssembledDocument {
    pub fn as_str(&self) -> &str {
        &self.html
    }

    pub fn into_string(self) -> String {
        self.html
    }
}

/// Builds an [`AssembledDocument`] from a package
#[derive(Debug, Clone, Default)]
pub struct ContentAssembler {
    limits: Limits,
    page: PageConfig,
}

impl ContentAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set resource limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Set page configuration
    pub fn with_page_config(mut self, page: PageConfig) -> Self {
        self.page = page;
        self
    }

    /// Assemble a book
    ///
    /// `fallback_title` is used when the package has no title, usually the
    /// file stem. Unreadable chapters are skipped, never fatal.
    pub fn assemble(&self, package: &dyn Package, fallback_title: &str) -> AssembledDocument {
        let title = resolve_title(package, fallback_title);
        let author = resolve_author(package);
        tracing::info!("Assembling '{}' by {}", title, author);

        let images = collect_images(package, &self.limits);

        let documents: Vec<&ResourceItem> = package
            .items()
            .iter()
            .filter(|item| item.kind == ItemKind::Document)
            .collect();
        let documents = reading_order(documents, package.linear_order());

        let mut html = self.preamble(&title, &author);
        let mut chapters = 0;
        let mut omitted = 0;

        for item in documents {
            match self.chapter_body(package, item, &images) {
                Ok(body) => {
                    html.push_str(&body);
                    html.push('\n');
                    chapters += 1;
                }
                Err(e) => {
                    tracing::warn!("Skipping chapter {}: {}", item.id, e);
                    omitted += 1;
                }
            }
        }

        html.push_str("</body>\n</html>\n");

        tracing::debug!(
            "Assembled {} chapters ({} omitted), {} bytes",
            chapters,
            omitted,
            html.len()
        );

        AssembledDocument {
            html,
            title,
            author,
            chapters,
            omitted,
            images: images.len(),
        }
    }

    /// Read, clean and rewrite one chapter
    fn chapter_body(
        &self,
        package: &dyn Package,
        item: &ResourceItem,
        images: &ImageMap,
    ) -> Result<String, PackageError> {
        let bytes = package.read(item)?;
        let body = sanitize_fragment(&decode_fragment(&bytes));

        Ok(match rewrite_references(&body, images, &self.limits) {
            Ok(rewritten) => rewritten,
            Err(e) => {
                tracing::error!(
                    "Image rewrite failed for {}: {}; blanking all image references",
                    item.id,
                    e
                );
                blank_all_references(&body)
            }
        })
    }

    /// Document head, style sheet and title page
    fn preamble(&self, title: &str, author: &str) -> String {
        let title = escape_html(title);
        let author = escape_html(author);
        format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
{style}</style>
</head>
<body>
<div class="title-page">
<div class="title">{title}</div>
<div class="author">{author}</div>
</div>
"#,
            style = style_sheet(&self.page),
        )
    }
}

/// Style sheet for paged output
pub fn style_sheet(page: &PageConfig) -> String {
    let page_numbers = if page.page_numbers {
        "  @bottom-center { content: counter(page); }\n"
    } else {
        ""
    };
    format!(
        r#"@page {{
  size: {size};
  margin: {margin};
{page_numbers}}}
body {{
  font-family: {font_family};
  font-size: {font_size};
  line-height: {line_height};
  text-align: justify;
}}
h1, h2, h3, h4, h5, h6 {{
  font-weight: bold;
  margin-top: 1em;
  margin-bottom: 0.5em;
  text-align: left;
}}
h1 {{ font-size: 18pt; }}
h2 {{ font-size: 16pt; }}
h3 {{ font-size: 14pt; }}
p {{ margin: 0.5em 0; }}
img, svg {{
  max-width: 100%;
  height: auto;
  display: block;
  margin: 1em auto;
}}
.title-page {{
  text-align: center;
  margin-bottom: 2em;
  page-break-after: always;
}}
.title {{ font-size: 24pt; font-weight: bold; }}
.author {{ font-size: 16pt; margin-top: 1em; }}
"#,
        size = page.size,
        margin = page.margin,
        font_family = page.font_family,
        font_size = page.font_size,
        line_height = page.line_height,
    )
}

/// Order documents by the declared reading order
///
/// Items missing from the order keep their relative order after every
/// declared item.
pub fn reading_order<'a>(
    mut documents: Vec<&'a ResourceItem>,
    order: Option<&[String]>,
) -> Vec<&'a ResourceItem> {
    let Some(order) = order else {
        return documents;
    };

    let rank: HashMap<&str, usize> = order
        .iter()
        .enumerate()
        .map(|(index, id)| (id.as_str(), index))
        .collect();

    documents.sort_by_key(|item| rank.get(item.id.as_str()).copied().unwrap_or(usize::MAX));
    documents
}

/// Book title, falling back to the given name
pub fn resolve_title(package: &dyn Package, fallback: &str) -> String {
    package
        .metadata("title")
        .unwrap_or_else(|| fallback.to_string())
}

/// First creator, or [`UNKNOWN_AUTHOR`]
pub fn resolve_author(package: &dyn Package) -> String {
    package
        .metadata("creator")
        .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string())
}

/// Escape HTML special characters
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
