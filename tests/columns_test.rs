//! Integration tests for the document package path.

use std::io::{Cursor, Write};

use quick_xml::events::Event;
use quick_xml::Reader;
use twocol::docx::{locate_sections, DocumentArchive, BODY_PART};
use twocol::{apply_columns, ColumnDirective, ColumnLayout, ContainerRewriter, Error};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/></Types>"#;
const DOCUMENT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"></Relationships>"#;
const STYLES: &str = r#"<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"/>"#;

fn document(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
        body
    )
}

fn build_docx(parts: &[(&str, &str)]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, content) in parts {
        zip.start_file(*name, options).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

fn docx_with_body(body: &str) -> Vec<u8> {
    let doc = document(body);
    build_docx(&[
        ("[Content_Types].xml", CONTENT_TYPES),
        ("word/_rels/document.xml.rels", DOCUMENT_RELS),
        ("word/document.xml", &doc),
        ("word/styles.xml", STYLES),
    ])
}

fn body_of(package: &[u8]) -> String {
    DocumentArchive::from_bytes(package).unwrap().body().unwrap()
}

/// Attributes of the first `w:cols` element and widths of its `w:col` children.
fn parse_columns(raw: &str) -> (u32, bool, Vec<u32>) {
    let mut reader = Reader::from_str(raw);
    let mut num = 0;
    let mut equal = false;
    let mut widths = Vec::new();
    loop {
        match reader.read_event().unwrap() {
            Event::Start(e) | Event::Empty(e) => {
                for attr in e.attributes().flatten() {
                    let value = String::from_utf8(attr.value.to_vec()).unwrap();
                    match (e.name().as_ref(), attr.key.as_ref()) {
                        (b"w:cols", b"w:num") => num = value.parse().unwrap(),
                        (b"w:cols", b"w:equalWidth") => equal = value == "1",
                        (b"w:col", b"w:w") => widths.push(value.parse().unwrap()),
                        _ => {}
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    (num, equal, widths)
}

const THREE_SECTIONS: &str = concat!(
    "<w:p><w:r><w:t>Chapter one</w:t></w:r></w:p>",
    "<w:p><w:pPr><w:sectPr w:rsidR=\"00A1\"><w:pgSz w:w=\"12240\" w:h=\"15840\"/></w:sectPr></w:pPr></w:p>",
    "<w:p><w:r><w:t>Chapter two</w:t></w:r></w:p>",
    "<w:p><w:pPr><w:sectPr><w:type w:val=\"nextPage\"/><w:pgMar w:top=\"1440\"/></w:sectPr></w:pPr></w:p>",
    "<w:p><w:r><w:t>Chapter three</w:t></w:r></w:p>",
    "<w:sectPr w:rsidSect=\"00B2\"><w:pgSz w:w=\"11906\" w:h=\"16838\"/><w:docGrid w:linePitch=\"360\"/></w:sectPr>",
);

#[test]
fn test_round_trip_single_section() {
    let package = docx_with_body("<w:p/><w:sectPr><w:pgSz w:w=\"12240\"/></w:sectPr>");
    let (output, report) = apply_columns(&package, &ColumnLayout::default()).unwrap();

    assert_eq!(report.sections, 1);
    assert_eq!(report.inserted, 1);

    let body = body_of(&output);
    let blocks = locate_sections(&body).unwrap();
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].columns.len(), 1);

    let (num, equal, widths) = parse_columns(&blocks[0].raw[blocks[0].columns[0].clone()]);
    assert_eq!(num, 2);
    assert!(equal);
    assert_eq!(widths, vec![4680, 4680]);
}

#[test]
fn test_directive_correctness_for_every_section() {
    let layout = ColumnLayout::default();
    let (output, _) = apply_columns(&docx_with_body(THREE_SECTIONS), &layout).unwrap();
    let body = body_of(&output);

    let blocks = locate_sections(&body).unwrap();
    assert_eq!(blocks.len(), 3);
    for block in &blocks {
        assert_eq!(block.columns.len(), 1);
        let (num, equal, widths) = parse_columns(&block.raw[block.columns[0].clone()]);
        assert_eq!(num, 2);
        assert!(equal);
        assert_eq!(widths.len(), 2);
        assert_eq!(widths[0], widths[1]);
        assert_eq!(widths.iter().sum::<u32>(), layout.usable_width_twips);
    }
}

#[test]
fn test_idempotence() {
    let package = docx_with_body(THREE_SECTIONS);
    let (once, first) = apply_columns(&package, &ColumnLayout::default()).unwrap();
    let (twice, second) = apply_columns(&once, &ColumnLayout::default()).unwrap();

    assert_eq!(body_of(&once), body_of(&twice));
    assert_eq!(first.inserted, 3);
    assert_eq!(second.replaced, 3);
    assert_eq!(second.inserted, 0);
}

#[test]
fn test_only_directive_is_added() {
    let directive = ColumnDirective::default();
    let (output, _) = apply_columns(&docx_with_body(THREE_SECTIONS), &ColumnLayout::default()).unwrap();

    let body = body_of(&output);
    assert_eq!(body.replace(directive.markup(), ""), document(THREE_SECTIONS));
}

#[test]
fn test_sections_are_isolated() {
    let altered = THREE_SECTIONS.replace(
        "<w:type w:val=\"nextPage\"/>",
        "<w:type w:val=\"continuous\"/><w:cols w:num=\"3\"/>",
    );
    let layout = ColumnLayout::default();
    let (a, _) = apply_columns(&docx_with_body(THREE_SECTIONS), &layout).unwrap();
    let (b, _) = apply_columns(&docx_with_body(&altered), &layout).unwrap();
    let (body_a, body_b) = (body_of(&a), body_of(&b));

    let blocks_a = locate_sections(&body_a).unwrap();
    let blocks_b = locate_sections(&body_b).unwrap();
    assert_eq!(blocks_a[0].raw, blocks_b[0].raw);
    assert_ne!(blocks_a[1].raw, blocks_b[1].raw);
    assert_eq!(blocks_a[2].raw, blocks_b[2].raw);
    assert!(blocks_b[1].raw.contains("continuous"));
    assert!(!blocks_b[1].raw.contains("w:num=\"3\""));
}

#[test]
fn test_zero_section_fallback() {
    let package = docx_with_body("<w:p><w:r><w:t>No sections here</w:t></w:r></w:p>");
    let (output, report) = apply_columns(&package, &ColumnLayout::default()).unwrap();

    assert!(report.implicit_section);
    let body = body_of(&output);
    assert_eq!(body.matches("<w:cols ").count(), 1);
    assert_eq!(locate_sections(&body).unwrap().len(), 1);
}

#[test]
fn test_other_entries_untouched() {
    let package = docx_with_body(THREE_SECTIONS);
    let (output, _) = apply_columns(&package, &ColumnLayout::default()).unwrap();

    let before = DocumentArchive::from_bytes(&package).unwrap();
    let after = DocumentArchive::from_bytes(&output).unwrap();
    assert_eq!(before.len(), after.len());
    for name in before.names().filter(|n| *n != BODY_PART) {
        assert_eq!(before.get(name), after.get(name), "{} changed", name);
    }
}

#[test]
fn test_missing_manifest_is_structural() {
    let doc = document("<w:sectPr/>");
    let package = build_docx(&[("word/document.xml", &doc)]);
    let result = ContainerRewriter::default().rewrite_bytes(&package);

    match result {
        Err(Error::Structural(msg)) => {
            assert!(msg.contains("[Content_Types].xml"));
            assert!(msg.contains("word/_rels/document.xml.rels"));
        }
        other => panic!("expected structural error, got {:?}", other.map(|(_, r)| r)),
    }
}

#[test]
fn test_unbalanced_markers_are_structural() {
    let doc = "<w:document><w:body><w:p><w:pPr><w:sectPr></w:pPr></w:p></w:body></w:document>";
    let package = build_docx(&[
        ("[Content_Types].xml", CONTENT_TYPES),
        ("word/_rels/document.xml.rels", DOCUMENT_RELS),
        ("word/document.xml", doc),
    ]);
    let result = apply_columns(&package, &ColumnLayout::default());
    assert!(matches!(result, Err(Error::Structural(_))));
}

#[test]
fn test_custom_layout() {
    let layout = ColumnLayout::new().with_count(3).with_gap(360).with_usable_width(9000);
    let (output, _) = apply_columns(&docx_with_body(THREE_SECTIONS), &layout).unwrap();
    let body = body_of(&output);

    for block in locate_sections(&body).unwrap() {
        let (num, _, widths) = parse_columns(&block.raw[block.columns[0].clone()]);
        assert_eq!(num, 3);
        assert_eq!(widths, vec![3000, 3000, 3000]);
    }
}
