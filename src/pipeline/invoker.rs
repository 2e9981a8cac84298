//! Single-shot call into the generation provider.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::providers::{CompletionRequest, LlmProvider, ProviderError};

/// Generation failures surfaced to the caller.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// No generation provider was configured (e.g. missing API key).
    #[error("generation client is not configured")]
    NotConfigured,
    /// The provider call failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),
    /// The provider answered without a usable candidate.
    #[error("generation returned no usable content")]
    EmptyResponse,
}

/// Sends prompts to an optional generation provider.
///
/// No retries: one failed attempt is terminal for that request.
#[derive(Clone, Default)]
pub struct GenerationInvoker {
    provider: Option<Arc<dyn LlmProvider>>,
    max_tokens: Option<u32>,
}

impl std::fmt::Debug for GenerationInvoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationInvoker")
            .field("model", &self.model_id())
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl GenerationInvoker {
    /// Create an invoker; `None` means generation is not configured.
    pub fn new(provider: Option<Arc<dyn LlmProvider>>) -> Self {
        Self {
            provider,
            max_tokens: None,
        }
    }

    /// Cap the number of generated tokens.
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Whether a provider is configured.
    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    /// Model spec of the configured provider.
    pub fn model_id(&self) -> Option<&str> {
        self.provider.as_deref().map(|p| p.model_id())
    }

    /// Generate text for `prompt`, returning the first candidate's text.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError`] when no provider is configured, the call
    /// fails, or the response has no usable candidate.
    pub async fn invoke(&self, prompt: &str) -> Result<String, GenerationError> {
        let provider = self.provider.as_ref().ok_or(GenerationError::NotConfigured)?;

        let request = CompletionRequest {
            prompt: prompt.to_owned(),
            max_tokens: self.max_tokens,
        };
        let response = provider.complete(request).await.map_err(|err| {
            warn!(model = provider.model_id(), error = %err, "generation call failed");
            GenerationError::from(err)
        })?;

        debug!(
            model = %response.model,
            candidates = response.candidates.len(),
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "generation response received"
        );

        response
            .first_text()
            .map(str::to_owned)
            .ok_or(GenerationError::EmptyResponse)
    }
}
