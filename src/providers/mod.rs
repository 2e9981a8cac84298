//! Text-generation provider abstraction layer.
//!
//! Defines the [`LlmProvider`] trait and the shared request/response types
//! used by all provider implementations.
//!
//! Two providers are implemented:
//! - [`gemini::GeminiProvider`]: Gemini `generateContent` API
//! - [`ollama::OllamaProvider`]: Ollama `/api/generate` API
//!
//! [`router::instantiate_provider`] builds the provider named by a
//! `provider/model` spec from config and credentials.

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub mod gemini;
pub mod ollama;
pub mod router;

// ---------------------------------------------------------------------------
// Request / Response
// ---------------------------------------------------------------------------

/// A single-prompt generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    /// Fully assembled prompt text.
    pub prompt: String,
    /// Maximum tokens in the response.
    pub max_tokens: Option<u32>,
}

impl CompletionRequest {
    /// Request for `prompt` with provider-default limits.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            max_tokens: None,
        }
    }
}

/// One alternative output returned by a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Text parts of the candidate, in order.
    pub parts: Vec<String>,
    /// Provider-reported finish reason, if any.
    pub finish_reason: Option<String>,
}

impl Candidate {
    /// The candidate's primary (first non-empty) text part.
    pub fn primary_text(&self) -> Option<&str> {
        self.parts
            .iter()
            .map(String::as_str)
            .find(|part| !part.trim().is_empty())
    }
}

/// Usage statistics for a completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UsageStats {
    /// Tokens used in the prompt/input.
    pub input_tokens: u32,
    /// Tokens generated in the response.
    pub output_tokens: u32,
}

/// The response from a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionResponse {
    /// Candidates in provider order.
    pub candidates: Vec<Candidate>,
    /// Token usage.
    pub usage: UsageStats,
    /// The model identifier that served this response.
    pub model: String,
}

impl CompletionResponse {
    /// Primary text of the first candidate. Later candidates are ignored.
    pub fn first_text(&self) -> Option<&str> {
        self.candidates.first().and_then(Candidate::primary_text)
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors returned by model providers.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// HTTP transport failure.
    #[error("provider request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// Response did not match expected schema.
    #[error("provider response parse error: {0}")]
    Parse(String),
    /// Upstream provider responded with an error status.
    #[error("provider returned non-success status {status}: {body}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },
    /// Provider refused or blocked the prompt.
    #[error("provider blocked the prompt: {0}")]
    Blocked(String),
}

// ---------------------------------------------------------------------------
// HTTP helpers (useful for all providers)
// ---------------------------------------------------------------------------

/// Check HTTP response status and return body text or a structured error.
///
/// # Errors
///
/// Returns `ProviderError::Request` on transport failure, `ProviderError::HttpStatus` on non-2xx.
pub async fn check_http_response(response: reqwest::Response) -> Result<String, ProviderError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(ProviderError::HttpStatus {
            status: status.as_u16(),
            body: sanitize_http_error_body(&body),
        });
    }
    Ok(body)
}

/// Collapse whitespace, redact credential-looking tokens, and truncate.
pub fn sanitize_http_error_body(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut sanitized = collapsed;
    for pattern in [
        r"AIza[0-9A-Za-z_\-]{30,}",
        r"sk-[A-Za-z0-9]{32,}",
        r"ya29\.[0-9A-Za-z_\-]{20,}",
    ] {
        if let Ok(regex) = Regex::new(pattern) {
            sanitized = regex.replace_all(&sanitized, "[REDACTED]").into_owned();
        }
    }

    const MAX_ERROR_BODY_CHARS: usize = 256;
    if sanitized.chars().count() > MAX_ERROR_BODY_CHARS {
        let shortened = sanitized
            .chars()
            .take(MAX_ERROR_BODY_CHARS)
            .collect::<String>();
        return format!("{shortened}...[truncated]");
    }

    sanitized
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Core text-generation provider interface.
///
/// Implementations must be `Send + Sync` so a single provider can be shared
/// behind an `Arc` by every pipeline.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Request a completion for a single prompt.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] on API, network, or parse failure.
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError>;

    /// The model spec string this provider is instantiated for.
    fn model_id(&self) -> &str;
}
