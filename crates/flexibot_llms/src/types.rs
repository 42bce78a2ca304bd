//! Unified request, response and stream types shared by all providers.

use std::collections::HashMap;
use std::pin::Pin;
use std::task::{Context, Poll};

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use futures::Stream;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One part of a multimodal message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text {
        text: String,
    },
    /// Inline image, base64 encoded
    Image {
        mime_type: String,
        data: String,
    },
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text { text: text.into() }
    }

    /// Build an inline image part from raw bytes.
    pub fn image(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        ContentPart::Image {
            mime_type: mime_type.into(),
            data: BASE64_STANDARD.encode(bytes),
        }
    }
}

/// Message content: plain text or a list of parts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

impl From<String> for MessageContent {
    fn from(text: String) -> Self {
        MessageContent::Text(text)
    }
}

impl From<&str> for MessageContent {
    fn from(text: &str) -> Self {
        MessageContent::Text(text.to_string())
    }
}

impl From<Vec<ContentPart>> for MessageContent {
    fn from(parts: Vec<ContentPart>) -> Self {
        MessageContent::Parts(parts)
    }
}

/// A chat message in provider-agnostic form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: MessageContent,
}

impl Message {
    pub fn new(role: Role, content: impl Into<MessageContent>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<MessageContent>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<MessageContent>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<MessageContent>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Concatenated text of the message, `None` when it has no text part.
    pub fn text(&self) -> Option<String> {
        match &self.content {
            MessageContent::Text(text) => Some(text.clone()),
            MessageContent::Parts(parts) => {
                let texts: Vec<&str> = parts
                    .iter()
                    .filter_map(|p| match p {
                        ContentPart::Text { text } => Some(text.as_str()),
                        _ => None,
                    })
                    .collect();
                if texts.is_empty() {
                    None
                } else {
                    Some(texts.join("\n"))
                }
            }
        }
    }

    /// Content as a list of parts.
    pub fn parts(&self) -> Vec<ContentPart> {
        match &self.content {
            MessageContent::Text(text) => vec![ContentPart::text(text.clone())],
            MessageContent::Parts(parts) => parts.clone(),
        }
    }

    pub fn has_image(&self) -> bool {
        matches!(&self.content, MessageContent::Parts(parts)
            if parts.iter().any(|p| matches!(p, ContentPart::Image { .. })))
    }
}

/// HTTP headers sent with a provider request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    inner: HashMap<String, String>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.inner.get(key).map(String::as_str)
    }

    /// Copy every header from `other`, overwriting duplicates.
    pub fn merge_with(&mut self, other: &Headers) {
        for (k, v) in &other.inner {
            self.inner.insert(k.clone(), v.clone());
        }
    }

    pub fn to_reqwest_headers(&self) -> reqwest::header::HeaderMap {
        let mut map = reqwest::header::HeaderMap::new();
        for (k, v) in &self.inner {
            if let (Ok(name), Ok(value)) = (
                reqwest::header::HeaderName::from_bytes(k.as_bytes()),
                reqwest::header::HeaderValue::from_str(v),
            ) {
                map.insert(name, value);
            }
        }
        map
    }
}

/// Generation options
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_sequences: Option<Vec<String>>,
    #[serde(skip)]
    pub headers: Option<Headers>,
}

impl GenerateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn top_p(mut self, top_p: f32) -> Self {
        self.top_p = Some(top_p);
        self
    }

    pub fn stop_sequences(mut self, stop: Vec<String>) -> Self {
        self.stop_sequences = Some(stop);
        self
    }

    pub fn headers(mut self, headers: Headers) -> Self {
        self.headers = Some(headers);
        self
    }
}

/// Provider-agnostic generation request
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub options: GenerateOptions,
}

impl GenerateRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            options: GenerateOptions::default(),
        }
    }

    pub fn with_options(mut self, options: GenerateOptions) -> Self {
        self.options = options;
        self
    }
}

/// Token usage reported by the provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl Usage {
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReasonKind {
    Stop,
    Length,
    ContentFilter,
    Other,
}

/// Why generation ended, with the provider's raw value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinishReason {
    pub unified: FinishReasonKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

impl FinishReason {
    pub fn with_raw(unified: FinishReasonKind, raw: impl Into<String>) -> Self {
        Self {
            unified,
            raw: Some(raw.into()),
        }
    }

    pub fn other() -> Self {
        Self {
            unified: FinishReasonKind::Other,
            raw: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseContent {
    Text { text: String },
}

/// Provider-agnostic generation response
#[derive(Debug, Clone, Serialize)]
pub struct GenerateResponse {
    pub content: Vec<ResponseContent>,
    pub usage: Usage,
    pub finish_reason: FinishReason,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl GenerateResponse {
    /// All text content joined together.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .map(|c| match c {
                ResponseContent::Text { text } => text.as_str(),
            })
            .collect()
    }
}

/// Incremental event of a streamed generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    Start { id: String },
    TextDelta { id: String, delta: String },
    Finish { usage: Usage, reason: FinishReason },
    Error { message: String },
}

impl StreamEvent {
    pub fn start(id: impl Into<String>) -> Self {
        StreamEvent::Start { id: id.into() }
    }

    pub fn text_delta(id: impl Into<String>, delta: impl Into<String>) -> Self {
        StreamEvent::TextDelta {
            id: id.into(),
            delta: delta.into(),
        }
    }

    pub fn finish(usage: Usage, reason: FinishReason) -> Self {
        StreamEvent::Finish { usage, reason }
    }

    pub fn error(message: impl Into<String>) -> Self {
        StreamEvent::Error {
            message: message.into(),
        }
    }
}

type BoxedEventStream = Pin<Box<dyn Stream<Item = Result<StreamEvent>> + Send>>;

/// Stream of generation events
pub struct GenerateStream {
    inner: BoxedEventStream,
}

impl GenerateStream {
    pub fn new(inner: BoxedEventStream) -> Self {
        Self { inner }
    }
}

impl Stream for GenerateStream {
    type Item = Result<StreamEvent>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

impl std::fmt::Debug for GenerateStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerateStream").finish_non_exhaustive()
    }
}

/// Speech-to-text request
#[derive(Debug, Clone)]
pub struct TranscriptionRequest {
    pub model: String,
    pub file_name: String,
    pub audio: Vec<u8>,
    pub language: Option<String>,
}

impl TranscriptionRequest {
    pub fn new(model: impl Into<String>, file_name: impl Into<String>, audio: Vec<u8>) -> Self {
        Self {
            model: model.into(),
            file_name: file_name.into(),
            audio,
            language: None,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

/// Speech-to-text result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcription {
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[test]
    fn test_message_text_plain() {
        let msg = Message::user("hello");
        assert_eq!(msg.text().as_deref(), Some("hello"));
        assert!(!msg.has_image());
    }

    #[test]
    fn test_message_text_from_parts() {
        let msg = Message::user(vec![
            ContentPart::text("what is this?"),
            ContentPart::image("image/png", &[1, 2, 3]),
        ]);
        assert_eq!(msg.text().as_deref(), Some("what is this?"));
        assert!(msg.has_image());
        assert_eq!(msg.parts().len(), 2);
    }

    #[test]
    fn test_message_without_text() {
        let msg = Message::user(vec![ContentPart::image("image/jpeg", b"abc")]);
        assert!(msg.text().is_none());
    }

    #[test]
    fn test_image_part_is_base64() {
        let part = ContentPart::image("image/png", b"hello");
        match part {
            ContentPart::Image { mime_type, data } => {
                assert_eq!(mime_type, "image/png");
                assert_eq!(data, "aGVsbG8=");
            }
            _ => panic!("expected image part"),
        }
    }

    #[test]
    fn test_headers_merge_overwrites() {
        let mut base = Headers::new();
        base.insert("Authorization", "Bearer a");
        base.insert("Content-Type", "application/json");

        let mut custom = Headers::new();
        custom.insert("Authorization", "Bearer b");
        base.merge_with(&custom);

        assert_eq!(base.get("Authorization"), Some("Bearer b"));
        assert_eq!(base.to_reqwest_headers().len(), 2);
    }

    #[test]
    fn test_generate_options_builder() {
        let options = GenerateOptions::new().max_tokens(256).temperature(0.2);
        assert_eq!(options.max_tokens, Some(256));
        assert_eq!(options.temperature, Some(0.2));
        assert!(options.top_p.is_none());
    }

    #[test]
    fn test_usage_total() {
        assert_eq!(Usage::new(10, 5).total_tokens, 15);
    }

    #[test]
    fn test_response_text_concatenates() {
        let response = GenerateResponse {
            content: vec![
                ResponseContent::Text { text: "Hello, ".into() },
                ResponseContent::Text { text: "world".into() },
            ],
            usage: Usage::default(),
            finish_reason: FinishReason::other(),
            metadata: None,
        };
        assert_eq!(response.text(), "Hello, world");
    }

    #[tokio::test]
    async fn test_generate_stream_yields_inner_events() {
        let events = vec![
            Ok(StreamEvent::start("1")),
            Ok(StreamEvent::text_delta("1", "hi")),
        ];
        let mut stream = GenerateStream::new(Box::pin(futures::stream::iter(events)));

        assert!(matches!(stream.next().await, Some(Ok(StreamEvent::Start { .. }))));
        assert!(matches!(
            stream.next().await,
            Some(Ok(StreamEvent::TextDelta { ref delta, .. })) if delta == "hi"
        ));
        assert!(stream.next().await.is_none());
    }
}
