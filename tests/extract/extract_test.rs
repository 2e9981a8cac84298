//! Document text extraction tests.

use std::io::{Cursor, Write};

use langbot::extract::{extract_text, try_extract, DocumentKind, ExtractError};

fn docx_with(document_xml: &str) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    {
        let mut writer = zip::ZipWriter::new(&mut buffer);
        writer
            .start_file("word/document.xml", zip::write::FileOptions::default())
            .expect("should start archive member");
        writer
            .write_all(document_xml.as_bytes())
            .expect("should write archive member");
        writer.finish().expect("should finish archive");
    }
    buffer.into_inner()
}

#[test]
fn docx_paragraphs_become_lines() {
    let xml = concat!(
        r#"<?xml version="1.0" encoding="UTF-8"?>"#,
        r#"<w:document><w:body>"#,
        r#"<w:p><w:pPr><w:jc w:val="left"/></w:pPr>"#,
        r#"<w:r><w:t>Hello</w:t></w:r>"#,
        r#"<w:r><w:t xml:space="preserve"> world &amp; co</w:t></w:r></w:p>"#,
        r#"<w:p><w:r><w:t>Second</w:t><w:tab/><w:t>line</w:t></w:r></w:p>"#,
        r#"</w:body></w:document>"#,
    );
    let text = extract_text("memo.docx", &docx_with(xml));
    assert_eq!(text, "Hello world & co\nSecond\tline");
}

#[test]
fn docx_empty_paragraph_keeps_blank_line() {
    let xml = concat!(
        r#"<w:document><w:body>"#,
        r#"<w:p><w:r><w:t>A</w:t></w:r></w:p><w:p/>"#,
        r#"<w:p><w:r><w:t>B</w:t></w:r></w:p>"#,
        r#"</w:body></w:document>"#,
    );
    assert_eq!(extract_text("memo.DOCX", &docx_with(xml)), "A\n\nB");
}

#[test]
fn corrupt_docx_degrades_to_empty_text() {
    assert_eq!(extract_text("broken.docx", b"not a zip archive"), "");
    assert!(matches!(
        try_extract(DocumentKind::WordProcessor, b"not a zip archive"),
        Err(ExtractError::Archive(_))
    ));
}

#[test]
fn docx_without_document_part_degrades_to_empty_text() {
    let mut buffer = Cursor::new(Vec::new());
    {
        let mut writer = zip::ZipWriter::new(&mut buffer);
        writer
            .start_file("docProps/core.xml", zip::write::FileOptions::default())
            .expect("should start archive member");
        writer.write_all(b"<core/>").expect("should write member");
        writer.finish().expect("should finish archive");
    }
    assert_eq!(extract_text("memo.docx", &buffer.into_inner()), "");
}

/// A one-page PDF showing `text` in Helvetica, with a valid cross-reference table.
fn pdf_with(text: &str) -> Vec<u8> {
    let content = format!("BT /F1 12 Tf 72 720 Td ({text}) Tj ET");
    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_owned(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_owned(),
        concat!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] ",
            "/Resources << /Font << /F1 4 0 R >> >> /Contents 5 0 R >>"
        )
        .to_owned(),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_owned(),
        format!("<< /Length {} >>\nstream\n{content}\nendstream", content.len()),
    ];

    let mut pdf = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::new();
    for (number, body) in (1..).zip(objects.iter()) {
        offsets.push(pdf.len());
        pdf.extend_from_slice(format!("{number} 0 obj\n{body}\nendobj\n").as_bytes());
    }

    let xref_at = pdf.len();
    let size = offsets.len().saturating_add(1);
    let mut xref = format!("xref\n0 {size}\n0000000000 65535 f \n");
    for offset in offsets {
        xref.push_str(&format!("{offset:010} 00000 n \n"));
    }
    xref.push_str(&format!(
        "trailer\n<< /Size {size} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n"
    ));
    pdf.extend_from_slice(xref.as_bytes());
    pdf
}

#[test]
fn pdf_page_text_is_extracted() {
    let text = match try_extract(DocumentKind::Pdf, &pdf_with("Quarterly budget approved")) {
        Ok(text) => text,
        Err(err) => panic!("valid pdf should extract: {err}"),
    };
    let words = text.split_whitespace().collect::<Vec<_>>().join(" ");
    assert_eq!(words, "Quarterly budget approved");
}

#[test]
fn corrupt_pdf_degrades_to_empty_text() {
    assert_eq!(extract_text("scan.pdf", b"%PDF-1.7 garbage"), "");
    assert!(matches!(
        try_extract(DocumentKind::Pdf, b"%PDF-1.7 garbage"),
        Err(ExtractError::Pdf(_))
    ));
}

#[test]
fn unknown_extension_is_read_as_text() {
    assert_eq!(extract_text("notes.md", "# Agenda".as_bytes()), "# Agenda");
}
