//! Groq provider implementation

use super::convert::{from_groq_response, to_groq_request};
use super::stream::create_stream;
use super::types::{GroqConfig, GroqResponse, GroqTranscriptionResponse, error_message};
use crate::error::{Error, Result};
use crate::provider::Provider;
use crate::types::{
    GenerateRequest, GenerateResponse, GenerateStream, Headers, Transcription,
    TranscriptionRequest,
};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use reqwest_eventsource::EventSource;

/// Groq provider
pub struct GroqProvider {
    config: GroqConfig,
    client: Client,
}

impl GroqProvider {
    /// Environment variable for API key
    pub const API_KEY_ENV: &'static str = "GROQ_API_KEY";
    /// Environment variable overriding the API base URL
    pub const BASE_URL_ENV: &'static str = "GROQ_BASE_URL";

    /// Create a new Groq provider
    pub fn new(config: GroqConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(Error::MissingApiKey("groq".to_string()));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { config, client })
    }

    /// Create provider from environment
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(Self::API_KEY_ENV)
            .map_err(|_| Error::MissingApiKey("groq".to_string()))?;

        let mut config = GroqConfig::new(api_key);
        if let Ok(base_url) = std::env::var(Self::BASE_URL_ENV) {
            config = config.with_base_url(base_url);
        }

        Self::new(config)
    }

    pub fn config(&self) -> &GroqConfig {
        &self.config
    }

    async fn api_error(response: reqwest::Response) -> Error {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Error::api_error("Groq", status, error_message(&body))
    }
}

#[async_trait]
impl Provider for GroqProvider {
    fn provider_id(&self) -> &str {
        "groq"
    }

    fn build_headers(&self, custom_headers: Option<&Headers>) -> Headers {
        let mut headers = Headers::new();
        headers.insert("Authorization", format!("Bearer {}", self.config.api_key));
        headers.insert("Content-Type", "application/json");

        if let Some(custom) = custom_headers {
            headers.merge_with(custom);
        }

        headers
    }

    async fn list_models(&self) -> Result<Vec<String>> {
        let url = format!("{}/models", self.config.base_url);
        let headers = self.build_headers(None);

        let response = self
            .client
            .get(&url)
            .headers(headers.to_reqwest_headers())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        // { "data": [{ "id": "model-id", ... }, ...] }
        let resp: serde_json::Value = response.json().await?;
        let models = resp
            .get("data")
            .and_then(|d| d.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|m| m.get("id").and_then(|id| id.as_str()))
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default();

        Ok(models)
    }

    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse> {
        let url = format!("{}/chat/completions", self.config.base_url);
        let groq_request = to_groq_request(&request, false)?;
        let headers = self.build_headers(request.options.headers.as_ref());

        #[cfg(feature = "tracing")]
        tracing::debug!(
            model = %groq_request.model,
            messages = groq_request.messages.len(),
            "Sending Groq chat completion"
        );

        let response = self
            .client
            .post(&url)
            .headers(headers.to_reqwest_headers())
            .json(&groq_request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let groq_resp: GroqResponse = response.json().await?;
        from_groq_response(groq_resp)
    }

    async fn stream(&self, request: GenerateRequest) -> Result<GenerateStream> {
        let url = format!("{}/chat/completions", self.config.base_url);
        let groq_request = to_groq_request(&request, true)?;
        let headers = self.build_headers(request.options.headers.as_ref());

        let req_builder = self
            .client
            .post(&url)
            .headers(headers.to_reqwest_headers())
            .json(&groq_request);

        let event_source = EventSource::new(req_builder)
            .map_err(|e| Error::stream_error(format!("Failed to create event source: {}", e)))?;

        create_stream(event_source).await
    }

    async fn transcribe(&self, request: TranscriptionRequest) -> Result<Transcription> {
        if request.audio.is_empty() {
            return Err(Error::provider_error("audio payload is empty"));
        }

        let url = format!("{}/audio/transcriptions", self.config.base_url);

        let file = Part::bytes(request.audio).file_name(request.file_name);
        let mut form = Form::new()
            .part("file", file)
            .text("model", request.model)
            .text("response_format", "json");
        if let Some(language) = request.language {
            form = form.text("language", language);
        }

        // reqwest sets the multipart Content-Type with its boundary
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let resp: GroqTranscriptionResponse = response.json().await?;
        Ok(Transcription { text: resp.text })
    }
}
