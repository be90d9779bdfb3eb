//! Pipeline tests for bookpress-core
//!
//! These exercise image collection, reference rewriting and assembly on
//! in-memory packages, so no archive handling is involved.

use base64::{engine::general_purpose::STANDARD, Engine};
use bookpress_core::rewrite::{path_candidates, rewrite_references, PLACEHOLDER};
use bookpress_core::{collect_images, ContentAssembler, ImageMap, Limits, MemoryPackage};
use proptest::prelude::*;

// =============================================================================
// Helpers
// =============================================================================

fn chapter_markup(marker: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<html><head><title>x</title></head>\
         <body><p id=\"{marker}\">text</p></body></html>"
    )
}

/// Position of each marker in the assembled document
fn marker_positions(html: &str, markers: &[String]) -> Vec<usize> {
    markers
        .iter()
        .map(|m| {
            html.find(&format!("id=\"{m}\""))
                .unwrap_or_else(|| panic!("marker {m} missing"))
        })
        .collect()
}

fn package_with_images(count: usize) -> MemoryPackage {
    (0..count).fold(MemoryPackage::new(), |package, i| {
        package.with_image(format!("img{i}"), format!("Images/{i}.png"), vec![(i % 251) as u8])
    })
}

// =============================================================================
// Ordering
// =============================================================================

proptest! {
    #[test]
    fn prop_declared_order_is_respected(
        (count, shuffled, declared) in (1usize..12).prop_flat_map(|n| {
            (Just(n), Just((0..n).collect::<Vec<_>>()).prop_shuffle(), 0..=n)
        })
    ) {
        let mut package = MemoryPackage::new();
        for i in 0..count {
            package = package.with_document(
                format!("doc{i}"),
                format!("Text/doc{i}.xhtml"),
                chapter_markup(&format!("d{i}")),
            );
        }
        let order: Vec<String> = shuffled[..declared].iter().map(|i| format!("doc{i}")).collect();
        package = package.with_linear_order(order);

        // declared items first, then the rest in encounter order
        let mut expected: Vec<usize> = shuffled[..declared].to_vec();
        expected.extend((0..count).filter(|i| !shuffled[..declared].contains(i)));
        let markers: Vec<String> = expected.iter().map(|i| format!("d{i}")).collect();

        let doc = ContentAssembler::new().assemble(&package, "book");
        let positions = marker_positions(doc.as_str(), &markers);
        prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
        prop_assert_eq!(doc.chapters, count);
    }

    #[test]
    fn prop_candidates_bounded_and_unique(reference in "[a-zA-Z./]{0,40}", max in 0usize..12) {
        let candidates = path_candidates(&reference, max);
        prop_assert!(candidates.len() <= max);
        prop_assert!(candidates.len() <= 9);
        for (i, c) in candidates.iter().enumerate() {
            prop_assert!(!candidates[..i].contains(c));
        }
        if max > 0 {
            prop_assert_eq!(&candidates[0], &reference);
        }
    }

    #[test]
    fn prop_rewrite_never_leaves_dangling_reference(name in "[a-z]{1,12}") {
        let mut images = ImageMap::new();
        images.insert("Images/known.png", "data:image/png;base64,AA==");
        let html = format!(r#"<p><img src="../Misc/{name}.gif"/></p>"#);

        let out = rewrite_references(&html, &images, &Limits::default()).unwrap();
        prop_assert_eq!(out, format!(r#"<p><img src="{PLACEHOLDER}"/></p>"#));
    }
}

#[test]
fn test_no_spine_keeps_encounter_order() {
    let package = MemoryPackage::new()
        .with_document("b", "b.xhtml", chapter_markup("second-declared"))
        .with_document("a", "a.xhtml", chapter_markup("first-declared"));

    let doc = ContentAssembler::new().assemble(&package, "book");
    let positions = marker_positions(
        doc.as_str(),
        &["second-declared".to_string(), "first-declared".to_string()],
    );
    assert!(positions[0] < positions[1]);
}

#[test]
fn test_spine_entries_without_documents_are_ignored() {
    let package = MemoryPackage::new()
        .with_document("a", "a.xhtml", chapter_markup("alpha"))
        .with_linear_order(["ghost", "a"]);

    let doc = ContentAssembler::new().assemble(&package, "book");
    assert_eq!(doc.chapters, 1);
    assert!(doc.as_str().contains("id=\"alpha\""));
}

// =============================================================================
// Images
// =============================================================================

#[test]
fn test_image_cap_of_500() {
    let package = package_with_images(501);
    let images = collect_images(&package, &Limits::default());

    assert_eq!(images.len(), 500);
    assert!(images.contains_key("Images/499.png"));
    assert!(!images.contains_key("Images/500.png"));
    assert!(!images.contains_key("500.png"));
}

#[test]
fn test_oversized_image_never_embedded() {
    let limits = Limits::default();
    let package = MemoryPackage::new()
        .with_image("huge", "Images/huge.png", vec![0u8; limits.max_image_bytes + 1])
        .with_document(
            "ch",
            "Text/ch.xhtml",
            chapter_markup("x").replace("</p>", r#"<img src="../Images/huge.png"/></p>"#),
        );

    let images = collect_images(&package, &limits);
    assert!(images.is_empty());

    let doc = ContentAssembler::new().assemble(&package, "book");
    assert_eq!(doc.images, 0);
    assert!(!doc.as_str().contains("base64"));
}

#[test]
fn test_exact_reference_matches_independent_encoding() {
    let bytes: Vec<u8> = (0u8..=255).cycle().take(3000).collect();
    let package = MemoryPackage::new()
        .with_image("fig", "Images/figure.png", bytes.clone())
        .with_document(
            "ch",
            "Text/ch.xhtml",
            r#"<body><img src="Images/figure.png"/></body>"#,
        );

    let expected = format!("data:image/png;base64,{}", STANDARD.encode(&bytes));
    let doc = ContentAssembler::new().assemble(&package, "book");
    assert!(doc.as_str().contains(&format!(r#"<img src="{expected}"/>"#)));
}

#[test]
fn test_case_variant_directory_is_stripped() {
    let package = MemoryPackage::new()
        .with_image("cover", "cover.JPG", b"jpeg-bytes".to_vec())
        .with_document(
            "ch",
            "Text/ch.xhtml",
            r#"<body><img src="Images/cover.JPG"/></body>"#,
        );

    let doc = ContentAssembler::new().assemble(&package, "book");
    let expected = format!("data:image/jpeg;base64,{}", STANDARD.encode(b"jpeg-bytes"));
    assert!(doc.as_str().contains(&expected));
    assert!(!doc.as_str().contains(r##"src="#""##));
}

#[test]
fn test_unmatched_reference_gets_placeholder() {
    let package = MemoryPackage::new()
        .with_image("real", "Images/real.png", vec![1])
        .with_document(
            "ch",
            "Text/ch.xhtml",
            r#"<body><img src="../Images/imaginary.png" alt="gone"/></body>"#,
        );

    let doc = ContentAssembler::new().assemble(&package, "book");
    assert!(doc.as_str().contains(r##"<img src="#" alt="gone"/>"##));
}
