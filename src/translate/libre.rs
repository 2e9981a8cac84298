//! LibreTranslate-compatible translation backend (`POST /translate`).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::providers::sanitize_http_error_body;
use crate::types::Language;

use super::{TranslateError, Translator};

/// Public LibreTranslate instance.
pub const DEFAULT_LIBRE_URL: &str = "https://libretranslate.com";

// ---------------------------------------------------------------------------
// Wire types (pub for integration testing)
// ---------------------------------------------------------------------------

/// `/translate` request body.
#[doc(hidden)]
#[derive(Debug, Serialize)]
pub struct LibreRequest {
    /// Text to translate.
    pub q: String,
    /// Source language code, `auto` for detection.
    pub source: String,
    /// Target language code.
    pub target: String,
    /// Input format.
    pub format: String,
    /// Optional API key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

/// `/translate` response body.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
pub struct LibreResponse {
    /// Translated text.
    #[serde(rename = "translatedText")]
    pub translated_text: String,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP client for a LibreTranslate server.
#[derive(Clone)]
pub struct LibreTranslator {
    /// Server base URL, without trailing slash.
    #[doc(hidden)]
    pub base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl std::fmt::Debug for LibreTranslator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LibreTranslator")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl LibreTranslator {
    /// Create a client for `base_url` with an optional API key.
    pub fn new(base_url: &str, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key,
            client: reqwest::Client::new(),
        }
    }
}

/// Map a catalog language to the code LibreTranslate expects.
#[doc(hidden)]
pub fn libre_code(lang: Language) -> &'static str {
    match lang {
        Language::ChineseSimplified => "zh",
        other => other.code(),
    }
}

/// Build the request body for translating `text` into `dest`.
#[doc(hidden)]
pub fn build_request(text: &str, dest: Language, api_key: Option<&str>) -> LibreRequest {
    LibreRequest {
        q: text.to_owned(),
        source: "auto".to_owned(),
        target: libre_code(dest).to_owned(),
        format: "text".to_owned(),
        api_key: api_key.map(str::to_owned),
    }
}

/// Parse a `/translate` response body.
///
/// # Errors
///
/// Returns [`TranslateError::Parse`] if the body does not match the schema.
#[doc(hidden)]
pub fn parse_response(body: &str) -> Result<String, TranslateError> {
    let resp: LibreResponse =
        serde_json::from_str(body).map_err(|e| TranslateError::Parse(e.to_string()))?;
    Ok(resp.translated_text)
}

#[async_trait]
impl Translator for LibreTranslator {
    async fn translate(&self, text: &str, dest: Language) -> Result<String, TranslateError> {
        let url = format!("{}/translate", self.base_url);
        let body = build_request(text, dest, self.api_key.as_deref());

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();
        let payload = response.text().await?;
        if !status.is_success() {
            return Err(TranslateError::HttpStatus {
                status: status.as_u16(),
                body: sanitize_http_error_body(&payload),
            });
        }
        parse_response(&payload)
    }

    fn name(&self) -> &str {
        "libretranslate"
    }
}
