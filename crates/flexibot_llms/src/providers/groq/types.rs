//! Groq-specific types

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for Groq provider
#[derive(Debug, Clone)]
pub struct GroqConfig {
    /// API key for authentication
    pub api_key: String,
    /// Base URL (default: https://api.groq.com/openai/v1)
    pub base_url: String,
    /// Whole-request timeout; `None` waits indefinitely
    pub timeout: Option<Duration>,
}

impl GroqConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.groq.com/openai/v1";

    /// Create new config with API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }

    /// Set base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let mut url = base_url.into();
        // Strip /chat/completions suffix if user provided full endpoint URL
        if let Some(stripped) = url.strip_suffix('/') {
            url = stripped.to_string();
        }
        if let Some(stripped) = url.strip_suffix("/chat/completions") {
            url = stripped.to_string();
        }
        self.base_url = url;
        self
    }

    /// Set request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Groq chat completion request
#[derive(Debug, Serialize)]
pub struct GroqRequest {
    pub model: String,
    pub messages: Vec<GroqMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
}

/// Groq message
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GroqMessage {
    pub role: String,
    pub content: String,
}

/// Groq chat completion response
#[derive(Debug, Deserialize)]
pub struct GroqResponse {
    pub id: String,
    pub model: String,
    pub choices: Vec<GroqChoice>,
    #[serde(default)]
    pub usage: Option<GroqUsage>,
}

/// Groq response choice
#[derive(Debug, Deserialize)]
pub struct GroqChoice {
    #[allow(dead_code)]
    pub index: u32,
    pub message: GroqResponseMessage,
    pub finish_reason: Option<String>,
}

/// Groq response message
#[derive(Debug, Deserialize)]
pub struct GroqResponseMessage {
    #[allow(dead_code)]
    pub role: String,
    pub content: Option<String>,
}

/// Groq usage statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroqUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Groq streaming chunk
#[derive(Debug, Deserialize)]
pub struct GroqStreamChunk {
    pub id: String,
    #[serde(default)]
    pub choices: Vec<GroqStreamChoice>,
    /// Groq reports usage of a streamed completion under `x_groq` on the last chunk
    #[serde(default)]
    pub x_groq: Option<GroqStreamExtra>,
    #[serde(default)]
    pub usage: Option<GroqUsage>,
}

/// Groq streaming choice
#[derive(Debug, Deserialize)]
pub struct GroqStreamChoice {
    pub delta: GroqDelta,
    pub finish_reason: Option<String>,
}

/// Groq streaming delta
#[derive(Debug, Deserialize)]
pub struct GroqDelta {
    pub content: Option<String>,
}

/// Groq streaming extension block
#[derive(Debug, Deserialize)]
pub struct GroqStreamExtra {
    #[serde(default)]
    pub usage: Option<GroqUsage>,
}

/// Groq transcription response (`response_format=json`)
#[derive(Debug, Deserialize)]
pub struct GroqTranscriptionResponse {
    pub text: String,
}

/// Groq error envelope
#[derive(Debug, Deserialize)]
pub struct GroqErrorEnvelope {
    pub error: GroqErrorBody,
}

/// Groq error body
#[derive(Debug, Deserialize)]
pub struct GroqErrorBody {
    pub message: String,
}

/// Extract the human message from an error body, falling back to the raw text.
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<GroqErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = GroqConfig::new("key");
        assert_eq!(config.base_url, "https://api.groq.com/openai/v1");
        assert!(config.timeout.is_none());
    }

    #[test]
    fn test_with_base_url_strips_endpoint() {
        let config = GroqConfig::new("key").with_base_url("http://localhost:1234/v1/chat/completions");
        assert_eq!(config.base_url, "http://localhost:1234/v1");

        let config = GroqConfig::new("key").with_base_url("http://localhost:1234/v1/");
        assert_eq!(config.base_url, "http://localhost:1234/v1");
    }

    #[test]
    fn test_error_message_parses_envelope() {
        let body = r#"{"error":{"message":"Invalid API Key","type":"invalid_request_error"}}"#;
        assert_eq!(error_message(body), "Invalid API Key");
        assert_eq!(error_message("gateway timeout"), "gateway timeout");
    }

    #[test]
    fn test_stream_chunk_with_x_groq_usage() {
        let data = r#"{"id":"c1","object":"chat.completion.chunk","choices":[{"index":0,"delta":{},"finish_reason":"stop"}],"x_groq":{"id":"req_1","usage":{"prompt_tokens":12,"completion_tokens":3,"total_tokens":15}}}"#;
        let chunk: GroqStreamChunk = serde_json::from_str(data).unwrap();
        assert_eq!(chunk.choices[0].finish_reason.as_deref(), Some("stop"));
        assert_eq!(chunk.x_groq.unwrap().usage.unwrap().total_tokens, 15);
    }
}
