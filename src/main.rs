//! LangBot CLI entry point.
//!
//! Provides `generate` for one-shot rewrites, `chat` for an interactive
//! session with memory, and catalog listings.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use langbot::config::{load_default_config, runtime_paths, Config};
use langbot::credentials::{load_default_credentials, Credentials};
use langbot::export::{to_docx, to_text, EmailDraft, ExportFormat, SpeechCue};
use langbot::extract::extract_text;
use langbot::pipeline::{GenerationInvoker, GenerationRequest, Pipeline, Session};
use langbot::providers::router::instantiate_provider;
use langbot::template::{TemplateCatalog, TemplateFields, NO_TEMPLATE};
use langbot::translate::{translator_from_config, LanguageNormalizer};
use langbot::types::{Language, Tone};

/// LangBot: multi-language corporate message assistant.
#[derive(Parser)]
#[command(name = "langbot", version, about)]
struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Available CLI subcommands.
#[derive(Subcommand)]
enum Command {
    /// Rewrite one message and exit.
    Generate {
        /// Source text.
        #[arg(long, conflicts_with = "file")]
        text: Option<String>,
        /// Read source text from a .txt, .docx, or .pdf file.
        #[arg(long)]
        file: Option<PathBuf>,
        /// Write the result to a file (`.docx` writes a Word document, `.eml` an email).
        #[arg(long)]
        out: Option<PathBuf>,
        /// Form options.
        #[command(flatten)]
        form: FormArgs,
    },
    /// Start an interactive session that remembers previous messages.
    Chat {
        /// Form options applied to every message.
        #[command(flatten)]
        form: FormArgs,
    },
    /// List supported languages.
    Languages,
    /// List supported tones.
    Tones,
    /// List message templates and their fields.
    Templates,
}

/// Language, tone, and template options.
#[derive(Args, Clone)]
struct FormArgs {
    /// Input language (name or code).
    #[arg(long)]
    input_lang: Option<Language>,
    /// Output language (name or code).
    #[arg(long)]
    output_lang: Option<Language>,
    /// Tone of the rewritten message.
    #[arg(long)]
    tone: Option<Tone>,
    /// Template name, or "(none)".
    #[arg(long, default_value = NO_TEMPLATE)]
    template: String,
    /// Template recipient.
    #[arg(long, default_value = "Team")]
    recipient: String,
    /// Template sender.
    #[arg(long, default_value = "Your Name")]
    sender: String,
    /// Template subject.
    #[arg(long, default_value = "Updates")]
    subject: String,
    /// Template proposed times.
    #[arg(long, default_value = "Mon/Tue 10-11am")]
    times: String,
}

impl FormArgs {
    fn request(&self, config: &Config, body: &str) -> GenerationRequest {
        let request = GenerationRequest::new(
            body,
            self.input_lang.unwrap_or(config.defaults.input_language),
            self.output_lang.unwrap_or(config.defaults.output_language),
            self.tone.unwrap_or(config.defaults.tone),
        );
        if self.template == NO_TEMPLATE {
            return request;
        }
        let fields = TemplateFields::new()
            .with("recipient", &self.recipient)
            .with("sender", &self.sender)
            .with("subject", &self.subject)
            .with("times", &self.times);
        request.with_template(&self.template, fields)
    }

    fn output_language(&self, config: &Config) -> Language {
        self.output_lang.unwrap_or(config.defaults.output_language)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Generate {
            text,
            file,
            out,
            form,
        } => handle_generate(text, file, out, form).await,
        Command::Chat { form } => handle_chat(form).await,
        Command::Languages => {
            for lang in Language::ALL {
                println!("{:<22} {}", lang.display_name(), lang.code());
            }
            Ok(())
        }
        Command::Tones => {
            for tone in Tone::ALL {
                println!("{tone}");
            }
            Ok(())
        }
        Command::Templates => {
            let catalog = TemplateCatalog::builtin();
            for name in catalog.names() {
                let fields = catalog
                    .get(name)
                    .map(|t| t.required_fields().join(", "))
                    .unwrap_or_default();
                println!("{name}: {fields}");
            }
            Ok(())
        }
    }
}

/// Load config and credentials, then wire the pipeline.
///
/// Missing generation or translation capabilities are logged, not fatal.
fn build_pipeline() -> anyhow::Result<(Config, Pipeline)> {
    let config = load_default_config().context("failed to load configuration")?;
    let credentials: Credentials =
        load_default_credentials().context("failed to load credentials")?;

    let translator = translator_from_config(&config.translation, &credentials);
    if translator.is_none() {
        info!("translation not configured, text passes through untranslated");
    }

    let provider = match instantiate_provider(&config.models, &credentials) {
        Ok(provider) => Some(provider),
        Err(err) => {
            warn!(error = %err, "generation client not initialized");
            None
        }
    };

    let invoker =
        GenerationInvoker::new(provider).with_max_tokens(config.models.max_output_tokens);
    let pipeline = Pipeline::new(LanguageNormalizer::new(translator), invoker);
    Ok((config, pipeline))
}

async fn handle_generate(
    text: Option<String>,
    file: Option<PathBuf>,
    out: Option<PathBuf>,
    form: FormArgs,
) -> anyhow::Result<()> {
    langbot::logging::init_cli();

    let body = match (text, file) {
        (Some(text), _) => text,
        (None, Some(path)) => read_source(&path)?,
        (None, None) => anyhow::bail!("provide --text or --file"),
    };

    let (config, pipeline) = build_pipeline()?;
    let mut session = Session::new();
    let request = form.request(&config, &body);

    let output = pipeline.generate(&mut session, &request).await?;

    println!("{output}");
    if let Some(path) = out {
        save_output(&path, &output, &form)?;
        eprintln!("Saved to {}", path.display());
    }
    Ok(())
}

async fn handle_chat(form: FormArgs) -> anyhow::Result<()> {
    let paths = runtime_paths()?;
    let _logging_guard = langbot::logging::init_production(&paths.logs_dir)?;

    let (config, pipeline) = build_pipeline()?;
    let mut session = Session::new();

    println!("LangBot: An AI-Powered Multi-Language Translation Assistant");
    println!("Type a message to generate. Commands: {CHAT_COMMANDS}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match ChatInput::parse(&line) {
            ChatInput::Blank => continue,
            ChatInput::Quit => break,
            ChatInput::Reset => {
                session.reset();
                info!("session memory reset");
                println!("Memory reset.");
            }
            ChatInput::History => print_history(&session, config.session.preview_chars),
            ChatInput::Speak => {
                if session.last_generated().is_empty() {
                    println!("Nothing generated yet.");
                } else {
                    let language = form.output_language(&config);
                    let cue = SpeechCue::new(session.last_generated(), language);
                    println!("{}", serde_json::to_string(&cue)?);
                }
            }
            ChatInput::Save(path) => {
                if session.last_generated().is_empty() {
                    println!("Nothing generated yet.");
                } else if path.is_empty() {
                    println!("Usage: /save <path>");
                } else {
                    match save_output(Path::new(path), session.last_generated(), &form) {
                        Ok(()) => println!("Saved to {path}"),
                        Err(err) => println!("Save failed: {err:#}"),
                    }
                }
            }
            ChatInput::Unknown(command) => {
                println!("Unknown command: {command}. Commands: {CHAT_COMMANDS}");
            }
            ChatInput::Message(text) => {
                let request = form.request(&config, text);
                match pipeline.generate(&mut session, &request).await {
                    Ok(output) => println!("\n{output}\n"),
                    Err(err) => println!("Error ({} stage): {err}", err.stage()),
                }
            }
        }
    }
    Ok(())
}

const CHAT_COMMANDS: &str = "/history /reset /save <path> /speak /quit";

/// One line of chat input.
#[derive(Debug, PartialEq, Eq)]
enum ChatInput<'a> {
    Blank,
    Quit,
    Reset,
    History,
    Speak,
    Save(&'a str),
    /// A `/`-prefixed word that names no command. Never sent to the model.
    Unknown(&'a str),
    Message(&'a str),
}

impl<'a> ChatInput<'a> {
    fn parse(line: &'a str) -> Self {
        let line = line.trim();
        let (command, arg) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(command, arg)| (command, arg.trim()));
        match command {
            "" => Self::Blank,
            "/quit" | "/exit" => Self::Quit,
            "/reset" => Self::Reset,
            "/history" => Self::History,
            "/speak" => Self::Speak,
            "/save" => Self::Save(arg),
            _ if command.starts_with('/') => Self::Unknown(command),
            _ => Self::Message(line),
        }
    }
}

fn print_history(session: &Session, preview_chars: usize) {
    let lines = session.display_lines(preview_chars);
    if lines.is_empty() {
        println!("No history yet.");
        return;
    }
    for line in lines {
        println!("{line}");
    }
}

fn read_source(path: &Path) -> anyhow::Result<String> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    Ok(extract_text(name, &bytes))
}

fn save_output(path: &Path, text: &str, form: &FormArgs) -> anyhow::Result<()> {
    let bytes = match ExportFormat::from_path(path) {
        ExportFormat::Text => to_text(text),
        ExportFormat::Docx => to_docx(text).context("failed to build document")?,
        ExportFormat::Eml => EmailDraft::new(form.subject.clone(), text).to_eml(),
    };
    std::fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))
}
