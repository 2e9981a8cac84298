//! Resolves the generation provider named by a `provider/model` spec.

use std::sync::Arc;

use crate::config::ModelsConfig;
use crate::credentials::{Credentials, GEMINI_API_KEY};

use super::gemini::GeminiProvider;
use super::ollama::OllamaProvider;
use super::LlmProvider;

/// Provider routing errors.
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    /// Model spec is not in `<provider>/<model>` format.
    #[error("invalid model spec '{spec}', expected '<provider>/<model>'")]
    InvalidModelSpec {
        /// Invalid raw spec.
        spec: String,
    },
    /// Unsupported provider type in spec prefix.
    #[error("unsupported provider '{provider}'")]
    UnsupportedProvider {
        /// Unsupported provider prefix.
        provider: String,
    },
    /// Required API credential missing for selected provider.
    #[error("missing credential for provider '{provider}': {key}")]
    MissingCredential {
        /// Provider name.
        provider: String,
        /// Missing credential key.
        key: String,
    },
}

/// A model spec split into provider and model name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedModelSpec {
    /// Provider prefix, e.g. `gemini`.
    pub provider: String,
    /// Provider-specific model name, e.g. `gemini-2.5-flash`.
    pub model: String,
}

/// Split `provider/model` into its parts.
///
/// # Errors
///
/// Returns [`RouterError::InvalidModelSpec`] if either part is empty.
pub fn parse_model_spec(spec: &str) -> Result<ParsedModelSpec, RouterError> {
    let mut split = spec.splitn(2, '/');
    let provider = split.next().unwrap_or_default();
    let model = split.next().unwrap_or_default();
    if provider.is_empty() || model.is_empty() {
        return Err(RouterError::InvalidModelSpec {
            spec: spec.to_owned(),
        });
    }
    Ok(ParsedModelSpec {
        provider: provider.to_owned(),
        model: model.to_owned(),
    })
}

/// Instantiate the generation provider configured in `models`.
///
/// # Errors
///
/// Returns an error for malformed specs, unknown providers, or missing
/// credentials. Callers treat any error as "generation not configured".
pub fn instantiate_provider(
    models: &ModelsConfig,
    credentials: &Credentials,
) -> Result<Arc<dyn LlmProvider>, RouterError> {
    let spec = &models.generation;
    let parsed = parse_model_spec(spec)?;
    match parsed.provider.as_str() {
        "gemini" => {
            let key = credentials
                .get(GEMINI_API_KEY)
                .filter(|k| !k.trim().is_empty())
                .ok_or_else(|| RouterError::MissingCredential {
                    provider: parsed.provider.clone(),
                    key: GEMINI_API_KEY.to_owned(),
                })?;
            Ok(Arc::new(
                GeminiProvider::new(spec.clone(), parsed.model, key.to_owned())
                    .with_base_url(&models.gemini_base_url),
            ))
        }
        "ollama" => Ok(Arc::new(
            OllamaProvider::new(spec.clone(), parsed.model).with_base_url(&models.ollama_base_url),
        )),
        _ => Err(RouterError::UnsupportedProvider {
            provider: parsed.provider,
        }),
    }
}
