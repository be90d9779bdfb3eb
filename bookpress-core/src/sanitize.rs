//! Chapter cleanup: raw bytes to body-only markup
//!
//! This is textual cleanup, not parsing. Malformed markup passes through.

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};
use once_cell::sync::Lazy;
use regex::Regex;

static XML_PROLOG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<\?xml[^>]*\?>").expect("Invalid prolog regex"));

static DOCTYPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<!DOCTYPE[^>]*>").expect("Invalid doctype regex"));

static BODY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<body\b[^>]*>(.*?)</body\s*>").expect("Invalid body regex")
});

static HTML_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</?html\b[^>]*>").expect("Invalid html regex"));

static HEAD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<head\b[^>]*>.*?</head\s*>").expect("Invalid head regex")
});

static ENCODING_DECL: Lazy<regex::bytes::Regex> = Lazy::new(|| {
    regex::bytes::Regex::new(r#"(?i)\A\s*<\?xml[^>]*?\bencoding\s*=\s*["']([A-Za-z0-9._:\-]+)["']"#)
        .expect("Invalid encoding declaration regex")
});

/// Reduce a chapter document to the content of its body
pub fn sanitize_fragment(raw: &str) -> String {
    let content = XML_PROLOG.replace_all(raw, "");
    let content = DOCTYPE.replace_all(&content, "");

    if let Some(inner) = BODY.captures(&content).and_then(|caps| caps.get(1)) {
        return inner.as_str().to_string();
    }

    let content = HTML_TAG.replace_all(&content, "");
    HEAD.replace_all(&content, "").into_owned()
}

/// Decode chapter bytes to text
///
/// A byte order mark wins, then an XML encoding declaration naming a
/// non-UTF-8 charset. Everything else is read as UTF-8 with invalid
/// sequences dropped.
pub fn decode_fragment(bytes: &[u8]) -> String {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        return decode_with(encoding, &bytes[bom_len..]);
    }

    match declared_encoding(bytes) {
        Some(encoding) => decode_with(encoding, bytes),
        None => decode_utf8_dropping_invalid(bytes),
    }
}

fn decode_with(encoding: &'static Encoding, bytes: &[u8]) -> String {
    if encoding == UTF_8 {
        return decode_utf8_dropping_invalid(bytes);
    }
    let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
    if had_errors {
        tracing::debug!("Replaced malformed {} sequences", encoding.name());
    }
    text.into_owned()
}

/// UTF-8 text with invalid sequences dropped rather than replaced
fn decode_utf8_dropping_invalid(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text
}

/// Charset named in the XML prolog, if it is one we can decode
fn declared_encoding(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = &bytes[..bytes.len().min(512)];
    let label = ENCODING_DECL.captures(head)?.get(1)?.as_bytes();
    let encoding = Encoding::for_label(label)?;
    // A declaration readable as ASCII means the bytes are not UTF-16
    if encoding == UTF_16LE || encoding == UTF_16BE {
        return None;
    }
    Some(encoding)
}
