//! Shared domain types: the language and tone catalogs.
//!
//! Both catalogs are fixed. Languages carry a human-readable display name
//! (used verbatim in prompts) and a short code (used for translation and
//! speech synthesis). English is the pivot language all translation passes
//! through.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a catalog lookup by name or code fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// No language matches the given display name or code.
    #[error("unknown language '{0}'")]
    UnknownLanguage(String),
    /// No tone matches the given label.
    #[error("unknown tone '{0}'")]
    UnknownTone(String),
}

// ---------------------------------------------------------------------------
// Language
// ---------------------------------------------------------------------------

/// A supported input/output language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Language {
    /// English (`en`), the pivot language.
    English,
    /// Hindi (`hi`).
    Hindi,
    /// Spanish (`es`).
    Spanish,
    /// French (`fr`).
    French,
    /// German (`de`).
    German,
    /// Simplified Chinese (`zh-cn`).
    ChineseSimplified,
    /// Japanese (`ja`).
    Japanese,
    /// Korean (`ko`).
    Korean,
    /// Arabic (`ar`).
    Arabic,
    /// Portuguese (`pt`).
    Portuguese,
    /// Russian (`ru`).
    Russian,
}

impl Language {
    /// The pivot language used for all intermediate processing.
    pub const PIVOT: Language = Language::English;

    /// Every supported language, in catalog order.
    pub const ALL: [Language; 11] = [
        Language::English,
        Language::Hindi,
        Language::Spanish,
        Language::French,
        Language::German,
        Language::ChineseSimplified,
        Language::Japanese,
        Language::Korean,
        Language::Arabic,
        Language::Portuguese,
        Language::Russian,
    ];

    /// Display name, inserted verbatim into prompts.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Hindi => "Hindi",
            Self::Spanish => "Spanish",
            Self::French => "French",
            Self::German => "German",
            Self::ChineseSimplified => "Chinese (Simplified)",
            Self::Japanese => "Japanese",
            Self::Korean => "Korean",
            Self::Arabic => "Arabic",
            Self::Portuguese => "Portuguese",
            Self::Russian => "Russian",
        }
    }

    /// Language code passed to translation and speech capabilities.
    pub fn code(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Hindi => "hi",
            Self::Spanish => "es",
            Self::French => "fr",
            Self::German => "de",
            Self::ChineseSimplified => "zh-cn",
            Self::Japanese => "ja",
            Self::Korean => "ko",
            Self::Arabic => "ar",
            Self::Portuguese => "pt",
            Self::Russian => "ru",
        }
    }

    /// Whether this is the pivot language.
    pub fn is_pivot(self) -> bool {
        self == Self::PIVOT
    }

    /// Look up a language by display name or code, ignoring ASCII case.
    pub fn lookup(value: &str) -> Option<Self> {
        let needle = value.trim();
        Self::ALL.into_iter().find(|lang| {
            lang.display_name().eq_ignore_ascii_case(needle)
                || lang.code().eq_ignore_ascii_case(needle)
        })
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Language {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::lookup(s).ok_or_else(|| CatalogError::UnknownLanguage(s.to_owned()))
    }
}

impl TryFrom<String> for Language {
    type Error = CatalogError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Language> for String {
    fn from(lang: Language) -> Self {
        lang.display_name().to_owned()
    }
}

// ---------------------------------------------------------------------------
// Tone
// ---------------------------------------------------------------------------

/// Requested tone for the rewritten message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Tone {
    /// Professional.
    #[default]
    Professional,
    /// Neutral.
    Neutral,
    /// Friendly.
    Friendly,
    /// Assertive.
    Assertive,
    /// Concise.
    Concise,
    /// Formal.
    Formal,
    /// Casual.
    Casual,
}

impl Tone {
    /// Every supported tone, in catalog order.
    pub const ALL: [Tone; 7] = [
        Tone::Professional,
        Tone::Neutral,
        Tone::Friendly,
        Tone::Assertive,
        Tone::Concise,
        Tone::Formal,
        Tone::Casual,
    ];

    /// Label used in the tone directive.
    pub fn label(self) -> &'static str {
        match self {
            Self::Professional => "Professional",
            Self::Neutral => "Neutral",
            Self::Friendly => "Friendly",
            Self::Assertive => "Assertive",
            Self::Concise => "Concise",
            Self::Formal => "Formal",
            Self::Casual => "Casual",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Tone {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|tone| tone.label().eq_ignore_ascii_case(needle))
            .ok_or_else(|| CatalogError::UnknownTone(s.to_owned()))
    }
}

impl TryFrom<String> for Tone {
    type Error = CatalogError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Tone> for String {
    fn from(tone: Tone) -> Self {
        tone.label().to_owned()
    }
}
