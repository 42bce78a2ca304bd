//! Gemini provider implementation

use super::convert::{from_gemini_response, to_gemini_request};
use super::stream::create_stream;
use super::types::{GeminiConfig, GeminiModelList, GeminiResponse, error_message};
use crate::error::{Error, Result};
use crate::provider::Provider;
use crate::types::{GenerateRequest, GenerateResponse, GenerateStream, Headers};
use async_trait::async_trait;
use reqwest::Client;
use reqwest_eventsource::EventSource;

/// Gemini provider
pub struct GeminiProvider {
    config: GeminiConfig,
    client: Client,
}

impl GeminiProvider {
    /// Environment variable for API key
    pub const API_KEY_ENV: &'static str = "GOOGLE_API_KEY";
    /// Environment variable overriding the API base URL
    pub const BASE_URL_ENV: &'static str = "GEMINI_BASE_URL";
    /// Header carrying the API key; keeps it out of URLs and error messages
    pub const API_KEY_HEADER: &'static str = "x-goog-api-key";

    pub fn new(config: GeminiConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(Error::MissingApiKey("gemini".to_string()));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { config, client })
    }

    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(Self::API_KEY_ENV)
            .map_err(|_| Error::MissingApiKey("gemini".to_string()))?;

        let mut config = GeminiConfig::new(api_key);
        if let Ok(base_url) = std::env::var(Self::BASE_URL_ENV) {
            config = config.with_base_url(base_url);
        }

        Self::new(config)
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn model_url(&self, model: &str, method: &str) -> String {
        let model = model.strip_prefix("models/").unwrap_or(model);
        format!("{}/models/{}:{}", self.config.base_url, model, method)
    }

    async fn api_error(response: reqwest::Response) -> Error {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Error::api_error("Gemini", status, error_message(&body))
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    fn provider_id(&self) -> &str {
        "gemini"
    }

    fn build_headers(&self, custom_headers: Option<&Headers>) -> Headers {
        let mut headers = Headers::new();
        headers.insert("Content-Type", "application/json");
        headers.insert(Self::API_KEY_HEADER, &self.config.api_key);

        if let Some(custom) = custom_headers {
            headers.merge_with(custom);
        }

        headers
    }

    async fn list_models(&self) -> Result<Vec<String>> {
        let url = format!("{}/models", self.config.base_url);

        let response = self
            .client
            .get(&url)
            .headers(self.build_headers(None).to_reqwest_headers())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let list: GeminiModelList = response.json().await?;
        Ok(list
            .models
            .into_iter()
            .map(|m| {
                m.name
                    .strip_prefix("models/")
                    .map(str::to_string)
                    .unwrap_or(m.name)
            })
            .collect())
    }

    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse> {
        let url = self.model_url(&request.model, "generateContent");
        let gemini_request = to_gemini_request(&request)?;
        let headers = self.build_headers(request.options.headers.as_ref());

        #[cfg(feature = "tracing")]
        tracing::debug!(model = %request.model, "Sending Gemini generateContent");

        let response = self
            .client
            .post(&url)
            .headers(headers.to_reqwest_headers())
            .json(&gemini_request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let gemini_resp: GeminiResponse = response.json().await?;
        from_gemini_response(gemini_resp)
    }

    async fn stream(&self, request: GenerateRequest) -> Result<GenerateStream> {
        let url = self.model_url(&request.model, "streamGenerateContent");
        let gemini_request = to_gemini_request(&request)?;
        let headers = self.build_headers(request.options.headers.as_ref());

        let req_builder = self
            .client
            .post(&url)
            .query(&[("alt", "sse")])
            .headers(headers.to_reqwest_headers())
            .json(&gemini_request);

        let event_source = EventSource::new(req_builder)
            .map_err(|e| Error::stream_error(format!("Failed to create event source: {}", e)))?;

        create_stream(event_source).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_api_key_is_rejected() {
        assert!(matches!(
            GeminiProvider::new(GeminiConfig::new("")),
            Err(Error::MissingApiKey(_))
        ));
    }

    #[test]
    fn test_model_url() {
        let provider =
            GeminiProvider::new(GeminiConfig::new("k").with_base_url("http://localhost/v1beta/"))
                .unwrap();
        assert_eq!(
            provider.model_url("models/gemini-1.5-flash", "generateContent"),
            "http://localhost/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn test_api_key_sent_as_header() {
        let provider = GeminiProvider::new(GeminiConfig::new("secret")).unwrap();
        let headers = provider.build_headers(None);
        assert_eq!(headers.get("x-goog-api-key"), Some("secret"));
        assert!(headers.get("Authorization").is_none());
    }

    #[test]
    fn test_api_key_not_in_urls() {
        let provider = GeminiProvider::new(GeminiConfig::new("secret")).unwrap();
        assert!(!provider.model_url("gemini-1.5-flash", "generateContent").contains("secret"));
    }

    #[tokio::test]
    async fn test_transport_error_does_not_leak_key() {
        let provider = GeminiProvider::new(
            GeminiConfig::new("AIza_SECRET_KEY").with_base_url("http://127.0.0.1:9/v1beta"),
        )
        .unwrap();
        let request = GenerateRequest::new(
            "gemini-1.5-flash",
            vec![crate::types::Message::user("hello")],
        );

        let err = provider.generate(request).await.unwrap_err();
        assert!(matches!(err, Error::Http(_)));
        assert!(!err.to_string().contains("AIza_SECRET_KEY"), "{err}");
    }
}
