//! Image question answering.
//!
//! Vision answers are shown to the user but never recorded as turns.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use flexibot_constant::models::IMAGE_EXTENSIONS;
use flexibot_llms::{GenerateOptions, Provider};
use flexibot_observability::{record_duration, record_error};
use tracing::{Instrument, debug};

use crate::context::build_vision_request;
use crate::error::{Result, RuntimeError};

/// An image loaded into memory with its detected MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInput {
    file_name: String,
    mime_type: &'static str,
    bytes: Vec<u8>,
}

impl ImageInput {
    /// Validate the extension, then read the file.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        let mime_type = mime_type_for(&file_name)?;
        let bytes = tokio::fs::read(path).await?;
        Self::new(file_name, mime_type, bytes)
    }

    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self> {
        let file_name = file_name.into();
        let mime_type = mime_type_for(&file_name)?;
        Self::new(file_name, mime_type, bytes)
    }

    fn new(file_name: String, mime_type: &'static str, bytes: Vec<u8>) -> Result<Self> {
        if bytes.is_empty() {
            return Err(RuntimeError::invalid_input(format!("image '{file_name}' is empty")));
        }
        Ok(Self {
            file_name,
            mime_type,
            bytes,
        })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime_type(&self) -> &'static str {
        self.mime_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

fn mime_type_for(file_name: &str) -> Result<&'static str> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "jpg" | "jpeg" => Ok("image/jpeg"),
        "png" => Ok("image/png"),
        _ => Err(RuntimeError::invalid_input(format!(
            "unsupported image type '{}' (expected one of: {})",
            file_name,
            IMAGE_EXTENSIONS.join(", ")
        ))),
    }
}

/// Answers a question about one image.
#[async_trait]
pub trait VisionClient: Send + Sync {
    async fn describe(&self, question: &str, image: &ImageInput) -> Result<String>;
}

/// `VisionClient` backed by a multimodal provider (Gemini by default).
pub struct ProviderVisionClient {
    provider: Arc<dyn Provider>,
    model: String,
    options: GenerateOptions,
}

impl ProviderVisionClient {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            options: GenerateOptions::default(),
        }
    }

    pub fn with_options(mut self, options: GenerateOptions) -> Self {
        self.options = options;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl VisionClient for ProviderVisionClient {
    async fn describe(&self, question: &str, image: &ImageInput) -> Result<String> {
        let request = build_vision_request(&self.model, question, image, self.options.clone())?;
        let span = flexibot_observability::completion_span!(
            self.provider.provider_id(),
            self.model.as_str(),
            request.messages.len()
        );

        async {
            debug!(image = %image.file_name(), bytes = image.bytes().len(), "Sending vision request");
            let start = Instant::now();
            let result = self.provider.generate(request).await;
            record_duration("duration_ms", start.elapsed());

            match result {
                Ok(response) => {
                    let text = response.text();
                    tracing::Span::current().record("output.chars", text.chars().count());
                    Ok(text)
                }
                Err(e) => {
                    let err = RuntimeError::from(e);
                    record_error(&err);
                    Err(err)
                }
            }
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_mime_types() {
        assert_eq!(mime_type_for("a.JPG").unwrap(), "image/jpeg");
        assert_eq!(mime_type_for("a.jpeg").unwrap(), "image/jpeg");
        assert_eq!(mime_type_for("a.png").unwrap(), "image/png");
        assert!(mime_type_for("a.gif").unwrap_err().is_invalid_input());
        assert!(mime_type_for("noext").is_err());
    }

    #[test]
    fn test_empty_image_is_rejected() {
        assert!(ImageInput::from_bytes("a.png", Vec::new()).is_err());
    }

    #[tokio::test]
    async fn test_from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.png");
        std::fs::File::create(&path).unwrap().write_all(b"\x89PNG").unwrap();

        let image = ImageInput::from_path(&path).await.unwrap();
        assert_eq!(image.file_name(), "photo.png");
        assert_eq!(image.mime_type(), "image/png");
        assert_eq!(image.bytes(), b"\x89PNG");
    }

    #[tokio::test]
    async fn test_from_path_checks_extension_before_reading() {
        let err = ImageInput::from_path("/does/not/exist.bmp").await.unwrap_err();
        assert!(err.is_invalid_input());
    }
}
