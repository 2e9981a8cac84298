//! Text extraction from uploaded documents.
//!
//! Extraction is best-effort: [`extract_text`] never fails and yields an
//! empty string when a document cannot be read.

use std::io::{Cursor, Read};
use std::path::Path;

use regex::Regex;
use tracing::warn;

/// Source document kinds, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// `.txt`
    PlainText,
    /// `.docx`
    WordProcessor,
    /// `.pdf`
    Pdf,
    /// Anything else; read as text.
    Other,
}

impl DocumentKind {
    /// Classify a file name by its extension, ignoring case.
    pub fn from_name(name: &str) -> Self {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("txt") => Self::PlainText,
            Some("docx") => Self::WordProcessor,
            Some("pdf") => Self::Pdf,
            _ => Self::Other,
        }
    }
}

/// Extraction failures. Absorbed by [`extract_text`].
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The archive could not be opened or a member could not be read.
    #[error("document archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
    /// I/O error while reading an archive member.
    #[error("document read error: {0}")]
    Io(#[from] std::io::Error),
    /// Internal pattern failed to compile.
    #[error("document pattern error: {0}")]
    Pattern(#[from] regex::Error),
    /// The PDF could not be parsed or its text decoded.
    #[error("pdf error: {0}")]
    Pdf(String),
}

/// Extract text from `bytes`, classifying by `name`.
///
/// Failures are logged and yield an empty string.
pub fn extract_text(name: &str, bytes: &[u8]) -> String {
    let kind = DocumentKind::from_name(name);
    match try_extract(kind, bytes) {
        Ok(text) => text,
        Err(err) => {
            warn!(
                name,
                kind = ?kind,
                error = %err,
                "document extraction failed, using empty text"
            );
            String::new()
        }
    }
}

/// Extract text, reporting failures.
///
/// # Errors
///
/// Returns [`ExtractError`] when the document cannot be decoded.
pub fn try_extract(kind: DocumentKind, bytes: &[u8]) -> Result<String, ExtractError> {
    match kind {
        DocumentKind::PlainText | DocumentKind::Other => {
            Ok(String::from_utf8_lossy(bytes).into_owned())
        }
        DocumentKind::WordProcessor => extract_docx(bytes),
        DocumentKind::Pdf => extract_pdf(bytes),
    }
}

/// Text of every page, in content-stream order.
fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractError> {
    // pdf-extract panics on some malformed font and encoding tables.
    let extracted = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes))
        .map_err(|_| ExtractError::Pdf("parser panicked on malformed document".to_owned()))?;
    let text = extracted.map_err(|err| ExtractError::Pdf(err.to_string()))?;
    Ok(text.trim().to_owned())
}

/// Paragraph text from a `.docx`, one line per paragraph.
fn extract_docx(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut xml = String::new();
    archive.by_name("word/document.xml")?.read_to_string(&mut xml)?;

    let paragraph = Regex::new(r"(?s)<w:p(?:\s[^>]*)?(?:/>|>.*?</w:p>)")?;
    let run = Regex::new(r#"(?s)<w:t(?:\s[^>]*)?>(.*?)</w:t>|<w:tab/>|<w:br/>"#)?;

    let lines: Vec<String> = paragraph
        .find_iter(&xml)
        .map(|p| {
            run.captures_iter(p.as_str())
                .map(|cap| match cap.get(1) {
                    Some(text) => unescape_xml(text.as_str()),
                    None if cap.get(0).is_some_and(|m| m.as_str() == "<w:tab/>") => {
                        "\t".to_owned()
                    }
                    None => "\n".to_owned(),
                })
                .collect::<String>()
        })
        .collect();
    Ok(lines.join("\n"))
}

fn unescape_xml(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
