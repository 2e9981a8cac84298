//! Session state: the append-only history log and the last generated output.
//!
//! The log keeps every entry for the session's lifetime. Prompt construction
//! only ever reads the trailing window (see [`super::prompt::history_window`]);
//! storage retention and prompt truncation are kept separate.

use std::fmt;

use super::prompt::history_window;

/// Prefix of the history entry recording the user's raw input.
pub const REQUEST_PREFIX: &str = "User request: ";

/// Prefix of the history entry recording the final output.
pub const RESULT_PREFIX: &str = "Generated: ";

/// Ordered, append-only log of interaction records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryStore {
    entries: Vec<String>,
}

impl HistoryStore {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, entry: String) {
        self.entries.push(entry);
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// All entries, most recent first.
    pub fn recent_first(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().rev().map(String::as_str)
    }

    /// The prompt window: trailing entries, oldest first within the window.
    pub fn window(&self) -> &[String] {
        history_window(&self.entries)
    }
}

/// One history entry formatted for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryLine {
    /// 1-based position in the log (oldest is 1).
    pub number: usize,
    /// Entry text, cut to the preview length.
    pub text: String,
    /// Whether `text` was cut.
    pub truncated: bool,
}

impl fmt::Display for HistoryLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.number, self.text)?;
        if self.truncated {
            f.write_str("...")?;
        }
        Ok(())
    }
}

/// Mutable state for one user's interaction stream.
///
/// Every mutation takes `&mut self`, so a caller sharing a session across
/// tasks must serialize access (e.g. behind a `tokio::sync::Mutex`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    history: HistoryStore,
    last_generated: String,
}

impl Session {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// The history log.
    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Most recent successful output, or `""`.
    pub fn last_generated(&self) -> &str {
        &self.last_generated
    }

    /// Append a raw entry to the history log.
    pub fn append(&mut self, entry: impl Into<String>) {
        self.history.push(entry.into());
    }

    /// Clear history and the last output together.
    pub fn reset(&mut self) {
        self.history.clear();
        self.last_generated.clear();
    }

    /// Record a successful generation: both history entries and the new
    /// last output are applied together.
    pub fn commit(&mut self, user_text: &str, output: &str) {
        self.history.push(format!("{REQUEST_PREFIX}{user_text}"));
        self.history.push(format!("{RESULT_PREFIX}{output}"));
        self.last_generated = output.to_owned();
    }

    /// The history entries a prompt may see.
    pub fn prompt_window(&self) -> &[String] {
        self.history.window()
    }

    /// History formatted for display, most recent first, each entry cut to
    /// `preview_chars` characters.
    pub fn display_lines(&self, preview_chars: usize) -> Vec<HistoryLine> {
        let total = self.history.len();
        self.history
            .recent_first()
            .enumerate()
            .map(|(offset, entry)| {
                let truncated = entry.chars().count() > preview_chars;
                let text = if truncated {
                    entry.chars().take(preview_chars).collect()
                } else {
                    entry.to_owned()
                };
                HistoryLine {
                    number: total.saturating_sub(offset),
                    text,
                    truncated,
                }
            })
            .collect()
    }
}
