//! Image reference rewriting
//!
//! Image tags inside a chapter point at archive paths relative to the chapter.
//! The assembled document has no archive behind it, so every reference is
//! swapped for the matching inline `data:` URL from the [`ImageMap`], found by
//! trying a short, fixed list of path variants.

use crate::config::Limits;
use crate::error::RewriteError;
use crate::images::ImageMap;
use crate::package::basename;
use once_cell::sync::Lazy;
use percent_encoding::percent_decode_str;
use regex::{Captures, Regex};

/// Placeholder written over references that resolve to nothing
pub const PLACEHOLDER: &str = "#";

/// `<img src=…>` and SVG `<image xlink:href=…>` tags.
/// Groups: 1 = whole attribute, 2 = attribute name, 3 = reference.
static IMAGE_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?is)<(?:img|image)\b[^>]*?\s((src|xlink:href|href)\s*=\s*["']([^"']+)["'])[^>]*>"#,
    )
    .expect("Invalid image tag regex")
});

static IMAGE_ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)(<(?:img|image)\b[^>]*?\s(?:src|xlink:href|href)\s*=\s*)["'][^"']+["']"#)
        .expect("Invalid image attribute regex")
});

/// Path variants tried for one reference, in lookup order
///
/// Raw reference, basename, `../` removed, `./` removed, one leading `/`
/// removed, `images/` removed in lower, capitalized and upper case, basename.
/// Duplicates are dropped and at most `max` entries are returned.
pub fn path_candidates(reference: &str, max: usize) -> Vec<String> {
    let base = basename(reference);
    let variants = [
        reference.to_string(),
        base.to_string(),
        reference.replace("../", ""),
        reference.replace("./", ""),
        reference.strip_prefix('/').unwrap_or(reference).to_string(),
        reference.replace("images/", ""),
        reference.replace("Images/", ""),
        reference.replace("IMAGES/", ""),
        base.to_string(),
    ];

    let mut candidates: Vec<String> = Vec::with_capacity(variants.len());
    for variant in variants {
        if candidates.len() == max {
            break;
        }
        if !candidates.contains(&variant) {
            candidates.push(variant);
        }
    }
    candidates
}

/// Rewrite every image reference of a fragment against `images`
///
/// Returns [`RewriteError::TagBudgetExceeded`] without touching the fragment
/// when it carries more image tags than allowed; callers then fall back to
/// [`blank_all_references`].
pub fn rewrite_references(
    fragment: &str,
    images: &ImageMap,
    limits: &Limits,
) -> Result<String, RewriteError> {
    if images.is_empty() {
        return Ok(fragment.to_string());
    }

    let found = IMAGE_TAG.find_iter(fragment).count();
    if found > limits.max_image_tags {
        return Err(RewriteError::TagBudgetExceeded {
            found,
            limit: limits.max_image_tags,
        });
    }

    let rewritten = IMAGE_TAG.replace_all(fragment, |caps: &Captures| {
        rewrite_tag(caps, images, limits.max_candidates)
    });

    Ok(rewritten.into_owned())
}

/// Point every image reference of a fragment at the placeholder
pub fn blank_all_references(fragment: &str) -> String {
    IMAGE_ATTR
        .replace_all(fragment, format!("${{1}}\"{PLACEHOLDER}\"").as_str())
        .into_owned()
}

fn rewrite_tag(caps: &Captures, images: &ImageMap, max_candidates: usize) -> String {
    let (Some(tag), Some(attr), Some(name), Some(reference)) =
        (caps.get(0), caps.get(1), caps.get(2), caps.get(3))
    else {
        return caps[0].to_string();
    };
    let (name, reference) = (name.as_str(), reference.as_str());

    if reference.starts_with("data:") {
        return tag.as_str().to_string();
    }

    let value = match resolve(reference, images, max_candidates) {
        Some(data_ref) => data_ref.replace('"', "&quot;"),
        None => {
            tracing::debug!("No image found for reference {}", reference);
            PLACEHOLDER.to_string()
        }
    };

    let text = tag.as_str();
    let start = attr.start() - tag.start();
    let end = attr.end() - tag.start();
    format!("{}{}=\"{}\"{}", &text[..start], name, value, &text[end..])
}

fn resolve<'a>(reference: &str, images: &'a ImageMap, max_candidates: usize) -> Option<&'a str> {
    if let Some(found) = lookup(reference, images, max_candidates) {
        return Some(found);
    }
    if !reference.contains('%') {
        return None;
    }

    match percent_decode_str(reference).decode_utf8() {
        Ok(decoded) if decoded != reference => lookup(&decoded, images, max_candidates),
        Ok(_) => None,
        Err(_) => {
            tracing::debug!("Reference {} does not decode to UTF-8", reference);
            None
        }
    }
}

fn lookup<'a>(reference: &str, images: &'a ImageMap, max_candidates: usize) -> Option<&'a str> {
    path_candidates(reference, max_candidates)
        .iter()
        .filter(|candidate| !candidate.is_empty())
        .find_map(|candidate| images.get(candidate))
}
