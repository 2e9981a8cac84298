//! Translation capability and the best-effort language normalizer.
//!
//! The [`Translator`] trait is the seam to an external translation service.
//! [`LanguageNormalizer`] wraps an optional translator and never fails: when
//! source and target match it returns the input without a call, and when the
//! translator is absent or errors it passes the text through unchanged.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::{TranslationConfig, TranslationProvider};
use crate::credentials::Credentials;
use crate::types::Language;

pub mod libre;

/// Errors returned by translation backends.
#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    /// HTTP transport failure.
    #[error("translation request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// Upstream service responded with an error status.
    #[error("translation service returned status {status}: {body}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Sanitized response body.
        body: String,
    },
    /// Response did not match the expected schema.
    #[error("translation response parse error: {0}")]
    Parse(String),
}

/// External translation capability.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` into `dest`, letting the backend detect the source.
    ///
    /// # Errors
    ///
    /// Returns [`TranslateError`] on transport, status, or parse failure.
    async fn translate(&self, text: &str, dest: Language) -> Result<String, TranslateError>;

    /// Short backend name for logs.
    fn name(&self) -> &str;
}

/// Best-effort translation between two languages.
#[derive(Clone, Default)]
pub struct LanguageNormalizer {
    translator: Option<Arc<dyn Translator>>,
}

impl std::fmt::Debug for LanguageNormalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageNormalizer")
            .field("translator", &self.translator.as_ref().map(|t| t.name()))
            .finish()
    }
}

impl LanguageNormalizer {
    /// Create a normalizer; `None` means translation is not configured.
    pub fn new(translator: Option<Arc<dyn Translator>>) -> Self {
        Self { translator }
    }

    /// Whether a translation backend is configured.
    pub fn is_available(&self) -> bool {
        self.translator.is_some()
    }

    /// Translate `text` from `source` to `target`.
    ///
    /// Identity when `source == target`. Degrades to the original text when
    /// no translator is configured or the translator fails.
    pub async fn normalize(&self, text: &str, source: Language, target: Language) -> String {
        if source == target {
            return text.to_owned();
        }
        let Some(translator) = &self.translator else {
            debug!(
                source = source.code(),
                target = target.code(),
                "translation not configured, passing text through"
            );
            return text.to_owned();
        };

        match translator.translate(text, target).await {
            Ok(translated) => {
                debug!(
                    backend = translator.name(),
                    source = source.code(),
                    target = target.code(),
                    "text translated"
                );
                translated
            }
            Err(err) => {
                warn!(
                    backend = translator.name(),
                    target = target.code(),
                    error = %err,
                    "translation failed, passing text through"
                );
                text.to_owned()
            }
        }
    }

    /// Translate into the pivot language.
    pub async fn to_pivot(&self, text: &str, source: Language) -> String {
        self.normalize(text, source, Language::PIVOT).await
    }

    /// Translate out of the pivot language.
    pub async fn from_pivot(&self, text: &str, target: Language) -> String {
        self.normalize(text, Language::PIVOT, target).await
    }
}

/// Build the translator selected in config, or `None` when disabled.
pub fn translator_from_config(
    config: &TranslationConfig,
    credentials: &Credentials,
) -> Option<Arc<dyn Translator>> {
    match config.provider {
        TranslationProvider::None => None,
        TranslationProvider::LibreTranslate => {
            let api_key = credentials
                .get(&config.api_key_env)
                .filter(|k| !k.trim().is_empty())
                .map(str::to_owned);
            Some(Arc::new(libre::LibreTranslator::new(&config.base_url, api_key)))
        }
    }
}
