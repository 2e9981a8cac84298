//! Configuration loading and validation.
//!
//! LangBot reads `~/.langbot/config.toml` (or `$LANGBOT_CONFIG_PATH`).
//! Precedence: env vars > config file > defaults. A missing file is not an
//! error; every section has defaults.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::providers::gemini::{DEFAULT_GEMINI_MODEL, DEFAULT_GEMINI_URL};
use crate::providers::ollama::DEFAULT_OLLAMA_URL;
use crate::translate::libre::DEFAULT_LIBRE_URL;
use crate::types::{Language, Tone};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Generation model settings.
    pub models: ModelsConfig,
    /// Translation backend settings.
    pub translation: TranslationConfig,
    /// Session display settings.
    pub session: SessionConfig,
    /// Default form values for the CLI.
    pub defaults: DefaultsConfig,
}

/// Generation model settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// Model spec in `provider/model` form (e.g. "gemini/gemini-2.5-flash").
    pub generation: String,
    /// Optional cap on generated tokens.
    pub max_output_tokens: Option<u32>,
    /// Gemini API base URL.
    pub gemini_base_url: String,
    /// Ollama API base URL.
    pub ollama_base_url: String,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            generation: format!("gemini/{DEFAULT_GEMINI_MODEL}"),
            max_output_tokens: None,
            gemini_base_url: DEFAULT_GEMINI_URL.to_owned(),
            ollama_base_url: DEFAULT_OLLAMA_URL.to_owned(),
        }
    }
}

/// Which translation backend to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    /// No translation; text passes through unchanged.
    #[default]
    None,
    /// A LibreTranslate-compatible server.
    #[serde(rename = "libretranslate")]
    LibreTranslate,
}

/// Translation backend settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    /// Selected backend.
    pub provider: TranslationProvider,
    /// Backend base URL.
    pub base_url: String,
    /// Credential key holding the backend API key, if any.
    pub api_key_env: String,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::None,
            base_url: DEFAULT_LIBRE_URL.to_owned(),
            api_key_env: "LIBRETRANSLATE_API_KEY".to_owned(),
        }
    }
}

/// Session display settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// History entries longer than this are truncated for display.
    pub preview_chars: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            preview_chars: default_preview_chars(),
        }
    }
}

/// Default form values.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Input language.
    pub input_language: Language,
    /// Output language.
    pub output_language: Language,
    /// Tone.
    pub tone: Tone,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            input_language: Language::English,
            output_language: Language::English,
            tone: Tone::Professional,
        }
    }
}

fn default_preview_chars() -> usize {
    200
}

impl Config {
    /// Parse a TOML string into config.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or has invalid values.
    pub fn from_toml(toml_str: &str) -> anyhow::Result<Self> {
        toml::from_str(toml_str).context("failed to parse config TOML")
    }

    /// Apply environment variable overrides (env > config > defaults).
    ///
    /// Takes a resolver function so tests never touch the process env.
    pub fn apply_overrides(&mut self, env: impl Fn(&str) -> Option<String>) {
        if let Some(v) = env("LANGBOT_GENERATION_MODEL") {
            self.models.generation = v;
        }
        if let Some(v) = env("LANGBOT_TRANSLATION_URL") {
            self.translation.base_url = v;
        }
        if let Some(v) = env("LANGBOT_TRANSLATION_PROVIDER") {
            match v.trim().to_ascii_lowercase().as_str() {
                "none" => self.translation.provider = TranslationProvider::None,
                "libretranslate" => self.translation.provider = TranslationProvider::LibreTranslate,
                _ => tracing::warn!(
                    var = "LANGBOT_TRANSLATION_PROVIDER",
                    value = %v,
                    "ignoring invalid env override"
                ),
            }
        }
        if let Some(v) = env("LANGBOT_PREVIEW_CHARS") {
            match v.parse() {
                Ok(n) => self.session.preview_chars = n,
                Err(_) => tracing::warn!(
                    var = "LANGBOT_PREVIEW_CHARS",
                    value = %v,
                    "ignoring invalid env override"
                ),
            }
        }
    }
}

/// Load config from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config at {}", path.display()))?;
    Config::from_toml(&contents)
        .with_context(|| format!("failed to parse config at {}", path.display()))
}

/// Load config from the default location with env overrides applied.
///
/// A missing file yields defaults.
///
/// # Errors
///
/// Returns an error if the home directory cannot be resolved or an existing
/// file cannot be read or parsed.
pub fn load_default_config() -> anyhow::Result<Config> {
    let path = match std::env::var("LANGBOT_CONFIG_PATH") {
        Ok(p) => PathBuf::from(p),
        Err(_) => runtime_paths()?.config_toml,
    };
    let mut config = if path.exists() {
        tracing::debug!(path = %path.display(), "loading config from file");
        load_config(&path)?
    } else {
        tracing::debug!(path = %path.display(), "no config file found, using defaults");
        Config::default()
    };
    config.apply_overrides(|key| std::env::var(key).ok());
    Ok(config)
}

/// Resolve the default config directory (`~/.langbot/`).
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn config_dir() -> anyhow::Result<PathBuf> {
    let home = directories::BaseDirs::new()
        .ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
    Ok(home.home_dir().join(".langbot"))
}

/// Well-known files under the config directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimePaths {
    /// `~/.langbot`
    pub root: PathBuf,
    /// `~/.langbot/config.toml`
    pub config_toml: PathBuf,
    /// `~/.langbot/.env`
    pub env_file: PathBuf,
    /// `~/.langbot/logs`
    pub logs_dir: PathBuf,
}

impl RuntimePaths {
    /// Derive all paths from a root directory.
    pub fn from_root(root: PathBuf) -> Self {
        Self {
            config_toml: root.join("config.toml"),
            env_file: root.join(".env"),
            logs_dir: root.join("logs"),
            root,
        }
    }
}

/// Resolve runtime paths under [`config_dir`].
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn runtime_paths() -> anyhow::Result<RuntimePaths> {
    Ok(RuntimePaths::from_root(config_dir()?))
}
