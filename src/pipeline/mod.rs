//! The generation pipeline.
//!
//! A single `generate` action runs:
//!
//! 1. template validation (fails before any network call)
//! 2. inbound normalization to the pivot language
//! 3. prompt assembly, reading the session's history window
//! 4. generation
//! 5. outbound normalization to the target language
//! 6. commit: two history entries plus `last_generated`, applied together
//!
//! If generation fails the pipeline stops at step 4 and the session is left
//! untouched.

use std::fmt;

use tracing::{debug, info, warn};

use crate::template::{TemplateCatalog, TemplateError, TemplateFields, TemplateSpec};
use crate::translate::LanguageNormalizer;
use crate::types::{Language, Tone};

pub mod invoker;
pub mod prompt;
pub mod session;

pub use invoker::{GenerationError, GenerationInvoker};
pub use prompt::{build_prompt, HISTORY_WINDOW};
pub use session::{HistoryLine, HistoryStore, Session};

/// Pipeline stage names, used in logs and error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Template selection and field validation.
    Template,
    /// Source language to pivot.
    NormalizeInbound,
    /// Prompt assembly.
    BuildPrompt,
    /// Generation call.
    Generate,
    /// Pivot to target language.
    NormalizeOutbound,
    /// Session update.
    Commit,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Template => "template",
            Self::NormalizeInbound => "inbound translation",
            Self::BuildPrompt => "prompt",
            Self::Generate => "generation",
            Self::NormalizeOutbound => "outbound translation",
            Self::Commit => "commit",
        })
    }
}

/// Caller-visible failures that abort a `generate` action.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A template field is missing.
    #[error("template stage failed: {0}")]
    Template(#[from] TemplateError),
    /// Generation failed or returned nothing usable.
    #[error("generation stage failed: {0}")]
    Generation(#[from] GenerationError),
}

impl PipelineError {
    /// The stage at which the action stopped.
    pub fn stage(&self) -> Stage {
        match self {
            Self::Template(_) => Stage::Template,
            Self::Generation(_) => Stage::Generate,
        }
    }
}

/// One "generate" action's inputs. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Language of `body`.
    pub input_language: Language,
    /// Language of the final output.
    pub output_language: Language,
    /// Requested tone.
    pub tone: Tone,
    /// Selected template name; `None` or the sentinel means no template.
    pub template: Option<String>,
    /// Values for the template's non-body fields.
    pub fields: TemplateFields,
    /// Free-form user text.
    pub body: String,
}

impl GenerationRequest {
    /// A request with no template.
    pub fn new(
        body: impl Into<String>,
        input_language: Language,
        output_language: Language,
        tone: Tone,
    ) -> Self {
        Self {
            input_language,
            output_language,
            tone,
            template: None,
            fields: TemplateFields::new(),
            body: body.into(),
        }
    }

    /// Select a template and its field values.
    #[must_use]
    pub fn with_template(mut self, name: impl Into<String>, fields: TemplateFields) -> Self {
        self.template = Some(name.into());
        self.fields = fields;
        self
    }
}

/// Sequences normalization, prompt assembly, generation, and commit.
#[derive(Debug, Clone)]
pub struct Pipeline {
    normalizer: LanguageNormalizer,
    invoker: GenerationInvoker,
    templates: TemplateCatalog,
}

impl Pipeline {
    /// Create a pipeline over the built-in template catalog.
    pub fn new(normalizer: LanguageNormalizer, invoker: GenerationInvoker) -> Self {
        Self {
            normalizer,
            invoker,
            templates: TemplateCatalog::builtin().clone(),
        }
    }

    /// Replace the template catalog.
    #[must_use]
    pub fn with_templates(mut self, templates: TemplateCatalog) -> Self {
        self.templates = templates;
        self
    }

    /// The template catalog in use.
    pub fn templates(&self) -> &TemplateCatalog {
        &self.templates
    }

    /// Run one generation and commit it to `session`.
    ///
    /// On success the session gains exactly two history entries and its
    /// `last_generated` is replaced. On error the session is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Template`] when a template field is missing
    /// (checked before any network call) and [`PipelineError::Generation`]
    /// when the generation call fails.
    pub async fn generate(
        &self,
        session: &mut Session,
        request: &GenerationRequest,
    ) -> Result<String, PipelineError> {
        let template = self.resolve_template(request)?;

        debug!(
            stage = %Stage::NormalizeInbound,
            source = request.input_language.code(),
            "pipeline stage"
        );
        let body = self
            .normalizer
            .to_pivot(&request.body, request.input_language)
            .await;

        debug!(
            stage = %Stage::BuildPrompt,
            history = session.prompt_window().len(),
            "pipeline stage"
        );
        let prompt = build_prompt(
            &body,
            request.input_language,
            request.output_language,
            request.tone,
            template,
            &request.fields,
            session.prompt_window(),
        )?;

        debug!(stage = %Stage::Generate, model = ?self.invoker.model_id(), "pipeline stage");
        let generated = self.invoker.invoke(&prompt).await.map_err(|err| {
            warn!(stage = %Stage::Generate, error = %err, "generation failed, session unchanged");
            PipelineError::Generation(err)
        })?;

        debug!(
            stage = %Stage::NormalizeOutbound,
            target = request.output_language.code(),
            "pipeline stage"
        );
        let output = self
            .normalizer
            .from_pivot(&generated, request.output_language)
            .await;

        session.commit(&request.body, &output);
        info!(
            stage = %Stage::Commit,
            history_len = session.history().len(),
            output_chars = output.chars().count(),
            "generation committed"
        );
        Ok(output)
    }

    fn resolve_template(
        &self,
        request: &GenerationRequest,
    ) -> Result<Option<&TemplateSpec>, TemplateError> {
        let Some(template) = request
            .template
            .as_deref()
            .and_then(|name| self.templates.get(name))
        else {
            return Ok(None);
        };
        template.validate(&request.fields)?;
        Ok(Some(template))
    }
}

