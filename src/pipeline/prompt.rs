//! Prompt assembly for the generation call.
//!
//! Pure string composition: no network calls, no placeholders left behind.

use crate::template::{TemplateError, TemplateFields, TemplateSpec};
use crate::types::{Language, Tone};

/// Maximum number of history entries included in a prompt.
pub const HISTORY_WINDOW: usize = 10;

const ROLE_FRAMING: &str = "You are a senior corporate communications assistant.";
const QUALITY_DIRECTIVE: &str =
    "Produce a polished, professional message suitable for corporate use.";
const HISTORY_HEADER: &str = "\n---\nPrevious conversation:\n";
const HISTORY_FOOTER: &str = "\n---\n";
const MESSAGE_MARKER: &str = "Message:";
const END_MARKER: &str = "-- End of instructions --";

/// The trailing [`HISTORY_WINDOW`] entries, oldest first.
pub fn history_window(history: &[String]) -> &[String] {
    let start = history.len().saturating_sub(HISTORY_WINDOW);
    &history[start..]
}

/// Render the history block, or an empty string when there is no history.
pub fn history_block(history: &[String]) -> String {
    if history.is_empty() {
        return String::new();
    }
    format!(
        "{HISTORY_HEADER}{}{HISTORY_FOOTER}",
        history_window(history).join("\n")
    )
}

/// Build the full generation prompt.
///
/// Parts, in order: role framing, language pair, tone, quality directive,
/// history block, message marker, (templated) body, end marker. Empty parts
/// are dropped and the rest joined with newlines.
///
/// # Errors
///
/// Returns [`TemplateError::FieldMissing`] if `template` references a field
/// absent from `fields`.
pub fn build_prompt(
    body: &str,
    input: Language,
    output: Language,
    tone: Tone,
    template: Option<&TemplateSpec>,
    fields: &TemplateFields,
    history: &[String],
) -> Result<String, TemplateError> {
    let message = match template {
        Some(template) => template.render(fields, body)?,
        None => body.to_owned(),
    };

    let parts = [
        ROLE_FRAMING.to_owned(),
        format!(
            "Input language: {}. Output language: {}.",
            input.display_name(),
            output.display_name()
        ),
        format!("Tone: {}.", tone.label()),
        QUALITY_DIRECTIVE.to_owned(),
        history_block(history),
        MESSAGE_MARKER.to_owned(),
        message,
        END_MARKER.to_owned(),
    ];

    Ok(parts
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("\n"))
}
