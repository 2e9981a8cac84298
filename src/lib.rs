//! LangBot: a multi-language corporate message assistant.
//!
//! Takes user text, optionally fits it into a corporate template, translates
//! it through English, rewrites it in a requested tone with an LLM, and keeps
//! a running session history that feeds later generations.
//!
//! See `DESIGN.md` for the architecture and module grounding.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod credentials;
pub mod logging;
pub mod types;

pub mod providers;
pub mod template;
pub mod translate;

pub mod pipeline;

pub mod export;
pub mod extract;
