/*!
 * Common test utilities for the readalong test suite
 */

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

/// Canonical XML declaration emitted by the serializer
pub const XML_DECL: &str = "<?xml version=\"1.0\" encoding=\"utf-8\" standalone=\"yes\"?>";

/// Wrap body markup in a minimal XHTML page
pub fn page_xhtml(title: &str, body_inner: &str) -> String {
    format!(
        "{XML_DECL}\n<!DOCTYPE html>\n<html xmlns=\"http://www.w3.org/1999/xhtml\"><head><title>{title}</title></head><body>{body_inner}</body></html>"
    )
}

/// A package document referencing the given content document stems
pub fn package_opf(stems: &[&str]) -> String {
    let mut items = String::new();
    for stem in stems {
        items.push_str(&format!(
            "<item id=\"{stem}\" href=\"text/{stem}.xhtml\" media-type=\"application/xhtml+xml\"/>"
        ));
    }
    format!(
        "{XML_DECL}\n<package xmlns=\"http://www.idpf.org/2007/opf\" version=\"3.0\" unique-identifier=\"uid\">\
<metadata xmlns:dc=\"http://purl.org/dc/elements/1.1/\"><dc:title>Fixture Book</dc:title></metadata>\
<manifest>{items}<item id=\"css\" href=\"styles/style.css\" media-type=\"text/css\"/></manifest>\
<spine/></package>"
    )
}

/// Lay out an extracted EPUB package under `root` and return the package
/// directory. `pages` maps stems to body markup.
pub fn write_package_fixture(root: &Path, pages: &[(&str, &str)]) -> PathBuf {
    let package_dir = root.join("epub");
    let oebps = package_dir.join("OEBPS");
    fs::create_dir_all(oebps.join("text")).unwrap();
    fs::create_dir_all(oebps.join("styles")).unwrap();
    fs::write(package_dir.join("mimetype"), "application/epub+zip").unwrap();

    for (stem, body) in pages {
        fs::write(
            oebps.join("text").join(format!("{stem}.xhtml")),
            page_xhtml(stem, body),
        )
        .unwrap();
    }

    let stems: Vec<&str> = pages.iter().map(|(stem, _)| *stem).collect();
    fs::write(oebps.join("content.opf"), package_opf(&stems)).unwrap();
    fs::write(oebps.join("styles").join("style.css"), "body { margin: 0; }\n").unwrap();

    package_dir
}

/// A timing file body with `count` sequential one-second clips
pub fn timing_lines(count: usize) -> String {
    let mut lines = String::new();
    for i in 0..count {
        lines.push_str(&format!("{}.0 {}.5\n", i, i));
    }
    lines
}
