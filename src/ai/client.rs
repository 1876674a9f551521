//! OpenAI-compatible chat client
//!
//! Uses ureq (sync HTTP), so no async runtime is needed. Any endpoint that
//! speaks the `/chat/completions` protocol works (OpenAI, DeepInfra,
//! OpenRouter, a local Ollama).

use crate::ai::{AiError, AiResult};
use crate::config::AiSettings;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

/// A single chat completion request
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: f32,
    /// Ask the backend for a JSON object reply
    pub json_mode: bool,
}

/// Transport for chat completions
///
/// [`AiClient`] talks HTTP; tests plug in scripted backends.
pub trait ChatBackend: Send + Sync {
    /// Send one request and return the assistant's reply text
    fn complete(&self, request: &ChatRequest) -> AiResult<String>;
}

/// Chat client over HTTP
pub struct AiClient {
    endpoint: String,
    api_key: String,
    agent: ureq::Agent,
}

fn make_agent(timeout: Duration) -> ureq::Agent {
    ureq::config::Config::builder()
        .http_status_as_error(false) // Status codes are classified below
        .timeout_global(Some(timeout))
        .build()
        .new_agent()
}

impl AiClient {
    pub fn new(base_url: &str, api_key: impl Into<String>, timeout: Duration) -> Self {
        Self {
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            api_key: api_key.into(),
            agent: make_agent(timeout),
        }
    }

    /// Build a client from settings; the API key must be present
    pub fn from_settings(settings: &AiSettings) -> AiResult<Self> {
        if settings.api_key.trim().is_empty() {
            return Err(AiError::MissingApiKey);
        }
        Ok(Self::new(
            &settings.base_url,
            settings.api_key.trim(),
            Duration::from_secs(settings.timeout_secs.max(1)),
        ))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ChatBackend for AiClient {
    fn complete(&self, request: &ChatRequest) -> AiResult<String> {
        let body = OpenAiRequest {
            model: &request.model,
            messages: &request.messages,
            temperature: request.temperature,
            response_format: request.json_mode.then_some(ResponseFormat {
                format_type: "json_object",
            }),
        };

        let response = self
            .agent
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .header("Authorization", &format!("Bearer {}", self.api_key))
            .send_json(&body)
            .map_err(classify_transport_error)?;

        let status = response.status().as_u16();
        if status >= 400 {
            let error_text = response.into_body().read_to_string().unwrap_or_default();
            return Err(classify_status(status, error_text));
        }

        let resp: OpenAiResponse = response
            .into_body()
            .read_json()
            .map_err(|e| AiError::Parse(e.to_string()))?;

        resp.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| AiError::Parse("No response choices".to_string()))
    }
}

fn classify_transport_error(err: ureq::Error) -> AiError {
    match err {
        ureq::Error::Timeout(_) => AiError::Timeout(err.to_string()),
        ureq::Error::ConnectionFailed | ureq::Error::HostNotFound | ureq::Error::Io(_) => {
            AiError::Connection(err.to_string())
        }
        ureq::Error::StatusCode(status) => classify_status(status, err.to_string()),
        other => AiError::Api {
            status: 0,
            message: other.to_string(),
        },
    }
}

fn classify_status(status: u16, message: String) -> AiError {
    match status {
        429 => AiError::RateLimited(message),
        408 | 504 => AiError::Timeout(format!("HTTP {status}: {message}")),
        _ => AiError::Api { status, message },
    }
}

// OpenAI API types
#[derive(Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Deserialize)]
struct OpenAiMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_base_url() {
        let client = AiClient::new("https://api.example.com/v1/", "k", Duration::from_secs(5));
        assert_eq!(client.endpoint(), "https://api.example.com/v1/chat/completions");
    }

    #[test]
    fn test_from_settings_requires_key() {
        let settings = AiSettings::default();
        assert!(matches!(
            AiClient::from_settings(&settings),
            Err(AiError::MissingApiKey)
        ));

        let settings = AiSettings {
            api_key: "sk-test".into(),
            ..Default::default()
        };
        assert!(AiClient::from_settings(&settings).is_ok());
    }

    #[test]
    fn test_status_classification() {
        assert!(classify_status(429, String::new()).is_rate_limit());
        assert!(matches!(classify_status(504, String::new()), AiError::Timeout(_)));
        assert!(matches!(
            classify_status(500, "boom".into()),
            AiError::Api { status: 500, .. }
        ));
    }

    #[test]
    fn test_request_serialization() {
        let messages = vec![Message::system("sys"), Message::user("hi")];
        let body = OpenAiRequest {
            model: "gpt-4o",
            messages: &messages,
            temperature: 0.3,
            response_format: Some(ResponseFormat {
                format_type: "json_object",
            }),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "gpt-4o");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["response_format"]["type"], "json_object");
    }
}
