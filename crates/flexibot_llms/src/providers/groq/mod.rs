//! Groq provider module
//!
//! Implements the Provider trait over Groq's OpenAI-compatible API:
//! chat completions (one-shot and SSE streaming) and Whisper transcription.
//! API docs: https://console.groq.com/docs/api-reference

mod convert;
mod provider;
mod stream;
mod types;

pub use provider::GroqProvider;
pub use types::{GroqConfig, GroqRequest, GroqResponse};
