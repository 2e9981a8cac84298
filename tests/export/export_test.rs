//! Export and speech cue tests.

use std::io::{Cursor, Read};

use chrono::{TimeZone, Utc};
use langbot::export::{
    to_docx, to_text, EmailDraft, SpeechCue, DEFAULT_RECIPIENT, DEFAULT_SENDER,
};
use langbot::extract::extract_text;
use langbot::types::Language;

#[test]
fn eml_has_headers_blank_line_and_crlf_body() {
    let mut draft = EmailDraft::new("Updates", "Line one\nLine two");
    draft.date = Utc
        .with_ymd_and_hms(2026, 3, 2, 9, 30, 0)
        .single()
        .expect("valid date");

    let eml = String::from_utf8(draft.to_eml()).expect("eml should be utf8");
    let (headers, body) = eml.split_once("\r\n\r\n").expect("header/body separator");

    let header_lines: Vec<&str> = headers.split("\r\n").collect();
    assert_eq!(header_lines[0], format!("From: {DEFAULT_SENDER}"));
    assert_eq!(header_lines[1], format!("To: {DEFAULT_RECIPIENT}"));
    assert_eq!(header_lines[2], "Subject: Updates");
    assert_eq!(header_lines[3], format!("Date: {}", draft.date.to_rfc2822()));
    assert!(header_lines.contains(&"Content-Type: text/plain; charset=utf-8"));
    assert_eq!(body, "Line one\r\nLine two");
}

#[test]
fn eml_does_not_double_crlf() {
    let draft = EmailDraft::new("s", "a\r\nb");
    let eml = String::from_utf8(draft.to_eml()).expect("eml should be utf8");
    assert!(eml.ends_with("a\r\nb"));
}

#[test]
fn text_export_is_utf8_bytes() {
    assert_eq!(to_text("Grüße"), "Grüße".as_bytes());
}

#[test]
fn docx_round_trips_through_extraction() {
    let text = "Dear Team,\n\nQ3 budget: R&D < 5% of <total>\nBest regards,\nAlex";
    let bytes = match to_docx(text) {
        Ok(bytes) => bytes,
        Err(err) => panic!("docx export should succeed: {err}"),
    };
    assert_eq!(extract_text("x.docx", &bytes), text);
}

#[test]
fn docx_package_has_required_parts() {
    let bytes = to_docx("Hola").expect("docx export should succeed");
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("valid archive");
    for part in ["[Content_Types].xml", "_rels/.rels", "word/document.xml"] {
        assert!(archive.by_name(part).is_ok(), "missing {part}");
    }

    let mut document = String::new();
    archive
        .by_name("word/document.xml")
        .expect("document part")
        .read_to_string(&mut document)
        .expect("document should be utf8");
    assert_eq!(document.matches("<w:p>").count(), 1);
    assert!(document.contains(r#"<w:sz w:val="22"/>"#), "paragraphs are 11pt");
}

#[test]
fn speech_cue_carries_output_language_code() {
    let cue = SpeechCue::new("Hola equipo", Language::Spanish);
    let json = serde_json::to_value(&cue).expect("cue should serialize");
    assert_eq!(json, serde_json::json!({"text": "Hola equipo", "lang": "es"}));
}

#[test]
fn speech_cue_uses_full_chinese_code() {
    assert_eq!(SpeechCue::new("你好", Language::ChineseSimplified).lang, "zh-cn");
}
