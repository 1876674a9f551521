//! Semantic scoring engine with retry and backoff

use crate::ai::client::{AiClient, ChatBackend, ChatRequest, Message};
use crate::ai::prompts::{SeoPromptBuilder, SYSTEM_PROMPT};
use crate::ai::{AiError, AiResult};
use crate::config::{AiSettings, AuditConfig};
use crate::models::{AiAnalysis, AI_CAP};
use crate::parser::ParsedDocument;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{debug, warn};

const RELEVANCE_WEIGHT: f64 = 0.4;
const DEPTH_WEIGHT: f64 = 0.3;
const READABILITY_WEIGHT: f64 = 0.3;

/// Runs scoring requests against a chat backend
pub struct AiEngine {
    backend: Box<dyn ChatBackend>,
    model: String,
    temperature: f32,
    max_attempts: u32,
    backoff: Duration,
    rate_limit_backoff: Duration,
}

impl std::fmt::Debug for AiEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiEngine")
            .field("model", &self.model)
            .field("max_attempts", &self.max_attempts)
            .finish_non_exhaustive()
    }
}

impl AiEngine {
    /// Engine backed by the HTTP client; fails without an API key
    pub fn from_config(settings: &AiSettings) -> AiResult<Self> {
        let client = AiClient::from_settings(settings)?;
        Ok(Self::with_backend(client, settings))
    }

    /// Engine over any transport, e.g. a scripted one in tests
    pub fn with_backend(backend: impl ChatBackend + 'static, settings: &AiSettings) -> Self {
        Self {
            backend: Box::new(backend),
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_attempts: settings.max_retries.max(1),
            backoff: Duration::from_millis(settings.backoff_ms),
            rate_limit_backoff: Duration::from_millis(settings.rate_limit_backoff_ms),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Ask the model to assess `doc`.
    ///
    /// Returns `None` once every attempt has failed; errors are logged, never
    /// returned.
    pub fn analyze(&self, doc: &ParsedDocument, keywords: &[String]) -> Option<AiAnalysis> {
        let request = self.request(doc, keywords);

        for attempt in 0..self.max_attempts {
            let result = self
                .backend
                .complete(&request)
                .and_then(|reply| parse_analysis(&reply));

            match result {
                Ok(analysis) => {
                    debug!("AI analysis succeeded on attempt {}", attempt + 1);
                    return Some(analysis);
                }
                Err(err) => {
                    warn!(
                        "AI analysis failed (attempt {}/{}): {}",
                        attempt + 1,
                        self.max_attempts,
                        err
                    );
                    if attempt + 1 < self.max_attempts {
                        let delay = self.backoff_for(&err, attempt);
                        if !delay.is_zero() {
                            std::thread::sleep(delay);
                        }
                    }
                }
            }
        }

        warn!(
            "AI analysis gave up after {} attempts, scoring without AI",
            self.max_attempts
        );
        None
    }

    fn request(&self, doc: &ParsedDocument, keywords: &[String]) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                Message::system(SYSTEM_PROMPT),
                Message::user(SeoPromptBuilder::new(doc).keywords(keywords).build()),
            ],
            temperature: self.temperature,
            json_mode: true,
        }
    }

    /// Exponential backoff; rate limits start from a longer base
    fn backoff_for(&self, err: &AiError, attempt: u32) -> Duration {
        let base = if err.is_rate_limit() {
            self.rate_limit_backoff
        } else {
            self.backoff
        };
        base.saturating_mul(1u32 << attempt.min(16))
    }
}

/// Build the engine for a configuration, or `None` when AI scoring is off
pub fn engine_for(config: &AuditConfig) -> Option<AiEngine> {
    if !config.ai.enabled {
        debug!("AI analysis disabled");
        return None;
    }
    match AiEngine::from_config(&config.ai) {
        Ok(engine) => {
            debug!("AI analysis enabled with model {}", engine.model());
            Some(engine)
        }
        Err(e) => {
            warn!("AI analysis unavailable: {}", e);
            None
        }
    }
}

/// AI sub-score: weighted mean of the three ratings scaled to 25 points
pub fn ai_score(analysis: Option<&AiAnalysis>) -> f64 {
    let Some(a) = analysis else {
        return 0.0;
    };
    let weighted = a.relevance_score * RELEVANCE_WEIGHT
        + a.depth_score * DEPTH_WEIGHT
        + a.readability_score * READABILITY_WEIGHT;
    (weighted * AI_CAP / 100.0).clamp(0.0, AI_CAP)
}

/// Parse a model reply into an [`AiAnalysis`].
///
/// Accepts bare JSON or JSON wrapped in a code fence. Every score must be
/// a number (or numeric string) in 0-100.
pub fn parse_analysis(reply: &str) -> AiResult<AiAnalysis> {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    let fence = FENCE.get_or_init(|| {
        Regex::new(r"(?s)```(?:json)?\s*(\{.*\})\s*```").expect("valid regex")
    });

    let json_str = match fence.captures(reply) {
        Some(caps) => caps.get(1).map_or(reply, |m| m.as_str()),
        None => reply.trim(),
    };
    let data: Value =
        serde_json::from_str(json_str).map_err(|e| AiError::Parse(format!("invalid JSON: {e}")))?;
    if !data.is_object() {
        return Err(AiError::Parse("expected a JSON object".to_string()));
    }

    Ok(AiAnalysis {
        relevance_score: score_field(&data, "relevance_score")?,
        depth_score: score_field(&data, "depth_score")?,
        readability_score: score_field(&data, "readability_score")?,
        overall_feedback: data
            .get("overall_feedback")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .trim()
            .to_string(),
        improvement_suggestions: string_list(&data, "improvement_suggestions"),
    })
}

fn score_field(data: &Value, key: &str) -> AiResult<f64> {
    let value = match data.get(key) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| AiError::Parse(format!("missing or non-numeric `{key}`")))?;

    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(AiError::Parse(format!("`{key}` out of range: {value}")));
    }
    Ok(value)
}

fn string_list(data: &Value, key: &str) -> Vec<String> {
    match data.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
        _ => Vec::new(),
    }
}
