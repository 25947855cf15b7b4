//! Query pipeline, prompt registry, language guard, summarizer, and
//! configuration loading.

pub mod config;
pub mod error;
pub mod language;
pub mod prompt;
pub mod query;
pub mod summarize;
