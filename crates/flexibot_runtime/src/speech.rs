//! Speech-to-text for voice input.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use flexibot_constant::models::AUDIO_EXTENSIONS;
use flexibot_llms::{Provider, TranscriptionRequest};
use flexibot_observability::{record_duration, record_error};
use tracing::{Instrument, debug};

use crate::error::{Result, RuntimeError};

/// An audio clip loaded into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioInput {
    file_name: String,
    bytes: Vec<u8>,
}

impl AudioInput {
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        check_extension(&file_name)?;
        let bytes = tokio::fs::read(path).await?;
        Self::from_bytes(file_name, bytes)
    }

    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self> {
        let file_name = file_name.into();
        check_extension(&file_name)?;
        if bytes.is_empty() {
            return Err(RuntimeError::invalid_input(format!("audio '{file_name}' is empty")));
        }
        Ok(Self { file_name, bytes })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

fn check_extension(file_name: &str) -> Result<()> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    if AUDIO_EXTENSIONS.contains(&extension.as_str()) {
        Ok(())
    } else {
        Err(RuntimeError::invalid_input(format!(
            "unsupported audio type '{}' (expected one of: {})",
            file_name,
            AUDIO_EXTENSIONS.join(", ")
        )))
    }
}

/// Turns recorded speech into text.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio: &AudioInput) -> Result<String>;
}

/// `Transcriber` backed by a provider's transcription endpoint (Groq Whisper).
pub struct ProviderTranscriber {
    provider: Arc<dyn Provider>,
    model: String,
    language: Option<String>,
}

impl ProviderTranscriber {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            language: None,
        }
    }

    /// ISO-639-1 hint passed to the model.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

#[async_trait]
impl Transcriber for ProviderTranscriber {
    async fn transcribe(&self, audio: &AudioInput) -> Result<String> {
        let mut request =
            TranscriptionRequest::new(&self.model, audio.file_name(), audio.bytes().to_vec());
        if let Some(language) = &self.language {
            request = request.with_language(language);
        }

        let span = tracing::info_span!(
            "llm.transcription",
            llm.provider = self.provider.provider_id(),
            llm.model = self.model.as_str(),
            duration_ms = tracing::field::Empty,
            error = tracing::field::Empty,
            error.message = tracing::field::Empty,
        );

        async {
            debug!(file = %audio.file_name(), bytes = audio.bytes().len(), "Transcribing audio");
            let start = Instant::now();
            let result = self.provider.transcribe(request).await;
            record_duration("duration_ms", start.elapsed());

            result.map(|t| t.text.trim().to_string()).map_err(|e| {
                let err = RuntimeError::from(e);
                record_error(&err);
                err
            })
        }
        .instrument(span)
        .await
    }
}
