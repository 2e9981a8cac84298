//! Materializing the last generated message: plain text, `.docx`, `.eml`,
//! and the speech cue handed to a client-side synthesizer.

use std::io::{Cursor, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::types::Language;

/// Default `From:` address for exported emails.
pub const DEFAULT_SENDER: &str = "sender@example.com";

/// Default `To:` address for exported emails.
pub const DEFAULT_RECIPIENT: &str = "recipient@example.com";

/// Output file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// UTF-8 text.
    Text,
    /// Word document, one paragraph per line.
    Docx,
    /// RFC 822 email message.
    Eml,
}

impl ExportFormat {
    /// `.docx` and `.eml` paths pick those formats; everything else exports text.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("docx") => Self::Docx,
            Some(ext) if ext.eq_ignore_ascii_case("eml") => Self::Eml,
            _ => Self::Text,
        }
    }
}

/// Export failures.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The document archive could not be assembled.
    #[error("document archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
    /// Writing an archive member failed.
    #[error("document write error: {0}")]
    Io(#[from] std::io::Error),
}

/// A plain-text email ready to be serialized as `.eml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailDraft {
    /// `Subject:` header.
    pub subject: String,
    /// Message body.
    pub body: String,
    /// `From:` address.
    pub sender: String,
    /// `To:` address.
    pub recipient: String,
    /// `Date:` header.
    pub date: DateTime<Utc>,
}

impl EmailDraft {
    /// Draft with default addresses, dated now.
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
            sender: DEFAULT_SENDER.to_owned(),
            recipient: DEFAULT_RECIPIENT.to_owned(),
            date: Utc::now(),
        }
    }

    /// Serialize as an RFC 822 message with CRLF line endings.
    pub fn to_eml(&self) -> Vec<u8> {
        let headers = [
            format!("From: {}", single_line(&self.sender)),
            format!("To: {}", single_line(&self.recipient)),
            format!("Subject: {}", single_line(&self.subject)),
            format!("Date: {}", self.date.to_rfc2822()),
            "MIME-Version: 1.0".to_owned(),
            "Content-Type: text/plain; charset=utf-8".to_owned(),
        ];
        let body = self.body.replace("\r\n", "\n").replace('\n', "\r\n");
        format!("{}\r\n\r\n{body}", headers.join("\r\n")).into_bytes()
    }
}

// Header values must not smuggle extra headers in.
fn single_line(value: &str) -> String {
    value.split(['\r', '\n']).collect::<Vec<_>>().join(" ")
}

/// Plain-text export bytes.
pub fn to_text(text: &str) -> Vec<u8> {
    text.as_bytes().to_vec()
}

/// Font size for exported paragraphs, in half-points (11pt).
const DOCX_FONT_HALF_POINTS: u32 = 22;

const DOCX_CONTENT_TYPES: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    r#"<Default Extension="rels" "#,
    r#"ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
    r#"<Default Extension="xml" ContentType="application/xml"/>"#,
    r#"<Override PartName="/word/document.xml" "#,
    r#"ContentType="application/vnd.openxmlformats-officedocument."#,
    r#"wordprocessingml.document.main+xml"/>"#,
    r#"</Types>"#,
);

const DOCX_PACKAGE_RELS: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" "#,
    r#"Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/"#,
    r#"officeDocument" Target="word/document.xml"/>"#,
    r#"</Relationships>"#,
);

/// Word document bytes with one 11pt paragraph per line of `text`.
///
/// # Errors
///
/// Returns [`ExportError`] if the archive cannot be written.
pub fn to_docx(text: &str) -> Result<Vec<u8>, ExportError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    writer.start_file("[Content_Types].xml", options)?;
    writer.write_all(DOCX_CONTENT_TYPES.as_bytes())?;
    writer.start_file("_rels/.rels", options)?;
    writer.write_all(DOCX_PACKAGE_RELS.as_bytes())?;
    writer.start_file("word/document.xml", options)?;
    writer.write_all(document_xml(text).as_bytes())?;

    Ok(writer.finish()?.into_inner())
}

fn document_xml(text: &str) -> String {
    let paragraphs: String = text
        .replace("\r\n", "\n")
        .split('\n')
        .map(|line| {
            format!(
                concat!(
                    r#"<w:p><w:r><w:rPr><w:sz w:val="{size}"/></w:rPr>"#,
                    r#"<w:t xml:space="preserve">{line}</w:t></w:r></w:p>"#,
                ),
                size = DOCX_FONT_HALF_POINTS,
                line = escape_xml(line),
            )
        })
        .collect();
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<w:document "#,
            r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
            r#"<w:body>{paragraphs}</w:body></w:document>"#,
        ),
        paragraphs = paragraphs,
    )
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// What a client-side speech synthesizer needs: the text and its language code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpeechCue {
    /// Text to speak.
    pub text: String,
    /// Output language code (e.g. `es`).
    pub lang: &'static str,
}

impl SpeechCue {
    /// Cue for `text` spoken in `language`.
    pub fn new(text: impl Into<String>, language: Language) -> Self {
        Self {
            text: text.into(),
            lang: language.code(),
        }
    }
}
