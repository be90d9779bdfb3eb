//! Shared helpers: build small EPUB archives on disk

#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::CompressionMethod;

/// A minimal EPUB under construction
#[derive(Default)]
pub struct EpubFixture {
    title: Option<String>,
    creator: Option<String>,
    /// (id, href, media type, properties, content)
    items: Vec<(String, String, String, Option<String>, Vec<u8>)>,
    spine: Vec<String>,
}

impl EpubFixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn creator(mut self, creator: &str) -> Self {
        self.creator = Some(creator.to_string());
        self
    }

    /// Add an XHTML chapter wrapping `body`
    pub fn chapter(mut self, id: &str, href: &str, body: &str) -> Self {
        self.items.push((
            id.to_string(),
            href.to_string(),
            "application/xhtml+xml".to_string(),
            None,
            xhtml(id, body).into_bytes(),
        ));
        self
    }

    /// Add an EPUB 3 navigation document
    pub fn nav(mut self, id: &str, href: &str) -> Self {
        self.items.push((
            id.to_string(),
            href.to_string(),
            "application/xhtml+xml".to_string(),
            Some("nav".to_string()),
            xhtml(id, r#"<nav epub:type="toc"><ol><li>NAVIGATION</li></ol></nav>"#).into_bytes(),
        ));
        self
    }

    pub fn image(mut self, id: &str, href: &str, media_type: &str, data: &[u8]) -> Self {
        self.items.push((
            id.to_string(),
            href.to_string(),
            media_type.to_string(),
            None,
            data.to_vec(),
        ));
        self
    }

    pub fn spine(mut self, ids: &[&str]) -> Self {
        self.spine = ids.iter().map(|s| s.to_string()).collect();
        self
    }

    fn opf(&self) -> String {
        let mut metadata = String::new();
        if let Some(title) = &self.title {
            metadata.push_str(&format!("    <dc:title>{}</dc:title>\n", title));
        }
        if let Some(creator) = &self.creator {
            metadata.push_str(&format!("    <dc:creator>{}</dc:creator>\n", creator));
        }

        let manifest: String = self
            .items
            .iter()
            .map(|(id, href, media_type, properties, _)| {
                let properties = properties
                    .as_ref()
                    .map(|p| format!(r#" properties="{}""#, p))
                    .unwrap_or_default();
                format!(
                    "    <item id=\"{}\" href=\"{}\" media-type=\"{}\"{}/>\n",
                    id, href, media_type, properties
                )
            })
            .collect();

        let spine: String = self
            .spine
            .iter()
            .map(|id| format!("    <itemref idref=\"{}\"/>\n", id))
            .collect();

        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="3.0" unique-identifier="bookid">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
{metadata}    <dc:identifier id="bookid">urn:uuid:0b4e2a7c-1f0e-4c5d-9a43-5f8c2d6e7a10</dc:identifier>
    <dc:language>en</dc:language>
  </metadata>
  <manifest>
{manifest}  </manifest>
  <spine>
{spine}  </spine>
</package>
"#
        )
    }

    /// Write the archive to `path`
    pub fn write(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create fixture directory");
        }
        let file = File::create(path).expect("Failed to create fixture");
        let mut zip = zip::ZipWriter::new(file);
        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        let deflated = SimpleFileOptions::default();

        zip.start_file("mimetype", stored).unwrap();
        zip.write_all(b"application/epub+zip").unwrap();

        zip.start_file("META-INF/container.xml", deflated).unwrap();
        zip.write_all(CONTAINER_XML.as_bytes()).unwrap();

        zip.start_file("OEBPS/content.opf", deflated).unwrap();
        zip.write_all(self.opf().as_bytes()).unwrap();

        for (_, href, _, _, content) in &self.items {
            zip.start_file(format!("OEBPS/{}", href), deflated).unwrap();
            zip.write_all(content).unwrap();
        }

        zip.finish().expect("Failed to finish fixture archive");
    }
}

const CONTAINER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>
"#;

fn xhtml(title: &str, body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops">
<head><title>{}</title></head>
<body>{}</body>
</html>
"#,
        title, body
    )
}

/// The two-chapter book used across tests: spine [ch2, ch1], one cover image
pub fn two_chapter_book(cover: &[u8]) -> EpubFixture {
    EpubFixture::new()
        .title("Two Chapters")
        .creator("A. Writer")
        .chapter("ch1", "Text/ch1.xhtml", "<h1>Chapter One</h1><p>ONE-BODY</p>")
        .chapter(
            "ch2",
            "Text/ch2.xhtml",
            r#"<h1>Chapter Two</h1><p>TWO-BODY</p><img src="Images/cover.JPG" alt="cover"/>"#,
        )
        .image("cover", "cover.JPG", "image/jpeg", cover)
        .spine(&["ch2", "ch1"])
}
