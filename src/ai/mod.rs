//! LLM-backed semantic scoring
//!
//! Asks an OpenAI-compatible chat endpoint to rate a document's relevance,
//! depth and readability, and converts the answer into the AI sub-score
//! (at most 25 points). Failures never escape [`AiEngine::analyze`]: after
//! the retry budget is spent the document is simply scored without AI.
//!
//! # Configuration
//!
//! - `MD_AUDIT_LLM_API_KEY`: required to enable AI scoring
//! - `MD_AUDIT_LLM_BASE_URL`: endpoint root (default `https://api.openai.com/v1`)
//! - `MD_AUDIT_LLM_MODEL`: model name (default `gpt-4o`)
//! - `MD_AUDIT_ENABLE_AI`: `true`/`1`/`yes` to enable, anything else disables
//!
//! # Example
//!
//! ```rust,ignore
//! use md_audit::ai::{ai_score, engine_for};
//!
//! if let Some(engine) = engine_for(&config) {
//!     let analysis = engine.analyze(&doc, &keywords);
//!     let points = ai_score(analysis.as_ref());
//! }
//! ```

mod client;
mod engine;
mod prompts;

pub use client::{AiClient, ChatBackend, ChatRequest, Message, Role};
pub use engine::{ai_score, engine_for, parse_analysis, AiEngine};
pub use prompts::SeoPromptBuilder;

#[cfg(test)]
pub(crate) use engine::tests as test_support;

use thiserror::Error;

/// Errors that can occur talking to the language model
#[derive(Error, Debug)]
pub enum AiError {
    #[error("Missing API key: set MD_AUDIT_LLM_API_KEY or `llm_api_key` in the config file")]
    MissingApiKey,

    #[error("Rate limited by the API: {0}")]
    RateLimited(String),

    #[error("API request timed out: {0}")]
    Timeout(String),

    #[error("Failed to connect to the API: {0}")]
    Connection(String),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse API response: {0}")]
    Parse(String),
}

impl AiError {
    /// Rate limiting backs off longer than other transient failures
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, AiError::RateLimited(_))
    }
}

pub type AiResult<T> = Result<T, AiError>;
