use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::types::{
    GenerateRequest, GenerateResponse, GenerateStream, Headers, Transcription,
    TranscriptionRequest,
};

/// A remote model API.
///
/// `generate` and `stream` are required; model listing and transcription are
/// optional capabilities with conservative defaults.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Stable identifier, e.g. `"groq"`.
    fn provider_id(&self) -> &str;

    /// Headers for every request, merged with per-request `custom_headers`.
    fn build_headers(&self, custom_headers: Option<&Headers>) -> Headers;

    /// Models the provider exposes. Empty when listing is unsupported.
    async fn list_models(&self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    /// One-shot generation.
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse>;

    /// Streamed generation.
    async fn stream(&self, request: GenerateRequest) -> Result<GenerateStream>;

    /// Speech-to-text.
    async fn transcribe(&self, _request: TranscriptionRequest) -> Result<Transcription> {
        Err(Error::unsupported(format!(
            "{} does not support transcription",
            self.provider_id()
        )))
    }
}
