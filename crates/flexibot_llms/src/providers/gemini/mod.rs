//! Gemini provider module
//!
//! Implements the Provider trait over the Generative Language REST API.
//! Used for multimodal (image + text) prompts.

mod convert;
mod provider;
mod stream;
mod types;

pub use provider::GeminiProvider;
pub use types::{GeminiConfig, GeminiRequest, GeminiResponse};
