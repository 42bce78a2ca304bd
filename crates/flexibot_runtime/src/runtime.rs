//! Chat orchestrator.
//!
//! `ChatRuntime` runs one request/response cycle against a caller-owned
//! `Session`:
//!
//! 1. validate input (nothing is sent and nothing changes on failure)
//! 2. render the last K turns and assemble the prompt
//! 3. mark the session in flight and call the completion client
//! 4. on success append the new turn; on failure leave the store untouched
//!
//! Image questions and transcription go through optional clients and never
//! touch the turn store.

use std::sync::Arc;
use std::time::Instant;

use flexibot_core::{Session, SessionStatus, Turn};
use flexibot_llms::providers::gemini::GeminiConfig;
use flexibot_llms::providers::groq::GroqConfig;
use flexibot_llms::{GeminiProvider, GroqProvider, ProviderRegistry};
use flexibot_observability::{record_duration, record_error};
use tokio::sync::mpsc;
use tracing::{Instrument, debug, info};

use crate::completion::{CompletionClient, ProviderCompletionClient};
use crate::config::{Credentials, RuntimeConfig};
use crate::context::{Prompt, build, render};
use crate::error::{Result, RuntimeError};
use crate::speech::{AudioInput, ProviderTranscriber, Transcriber};
use crate::vision::{ImageInput, ProviderVisionClient, VisionClient};

/// Registry id of the chat and speech provider.
pub const GROQ: &str = "groq";
/// Registry id of the vision provider.
pub const GEMINI: &str = "gemini";

pub struct ChatRuntime {
    completion: Arc<dyn CompletionClient>,
    vision: Option<Arc<dyn VisionClient>>,
    transcriber: Option<Arc<dyn Transcriber>>,
    providers: ProviderRegistry,
}

impl ChatRuntime {
    pub fn new(completion: Arc<dyn CompletionClient>) -> Self {
        Self {
            completion,
            vision: None,
            transcriber: None,
            providers: ProviderRegistry::new(),
        }
    }

    pub fn with_vision(mut self, vision: Arc<dyn VisionClient>) -> Self {
        self.vision = Some(vision);
        self
    }

    pub fn with_transcriber(mut self, transcriber: Arc<dyn Transcriber>) -> Self {
        self.transcriber = Some(transcriber);
        self
    }

    /// Wire Groq (chat + speech) and, when a Google key is present, Gemini (vision).
    ///
    /// Base URLs honour `GROQ_BASE_URL` / `GEMINI_BASE_URL`.
    pub fn from_config(config: &RuntimeConfig, credentials: &Credentials) -> Result<Self> {
        let mut groq_config = GroqConfig::new(credentials.groq_api_key.clone());
        if let Ok(base_url) = std::env::var(GroqProvider::BASE_URL_ENV) {
            groq_config = groq_config.with_base_url(base_url);
        }
        if let Some(timeout) = config.request_timeout {
            groq_config = groq_config.with_timeout(timeout);
        }
        let mut providers = ProviderRegistry::new().register(GROQ, GroqProvider::new(groq_config)?);

        if let Some(api_key) = &credentials.google_api_key {
            let mut gemini_config = GeminiConfig::new(api_key.clone());
            if let Ok(base_url) = std::env::var(GeminiProvider::BASE_URL_ENV) {
                gemini_config = gemini_config.with_base_url(base_url);
            }
            if let Some(timeout) = config.request_timeout {
                gemini_config = gemini_config.with_timeout(timeout);
            }
            providers = providers.register(GEMINI, GeminiProvider::new(gemini_config)?);
        } else {
            debug!("GOOGLE_API_KEY not set; image questions disabled");
        }

        Self::from_registry(config, providers)
    }

    /// Build the clients from already-registered providers. `groq` is
    /// required; `gemini` is optional and enables image questions.
    pub fn from_registry(config: &RuntimeConfig, providers: ProviderRegistry) -> Result<Self> {
        let groq = providers.get_provider(GROQ)?;

        let completion = ProviderCompletionClient::new(Arc::clone(&groq))
            .with_options(config.generate_options());
        let mut transcriber = ProviderTranscriber::new(groq, config.transcription_model.clone());
        if let Some(language) = &config.transcription_language {
            transcriber = transcriber.with_language(language.clone());
        }

        let mut runtime = Self::new(Arc::new(completion)).with_transcriber(Arc::new(transcriber));

        if let Ok(gemini) = providers.get_provider(GEMINI) {
            let vision = ProviderVisionClient::new(gemini, config.vision_model.clone())
                .with_options(config.generate_options());
            runtime = runtime.with_vision(Arc::new(vision));
        }

        runtime.providers = providers;
        Ok(runtime)
    }

    /// Ids of the providers this runtime was built from.
    pub fn provider_ids(&self) -> Vec<String> {
        self.providers.list_providers()
    }

    pub fn has_vision(&self) -> bool {
        self.vision.is_some()
    }

    pub fn has_transcriber(&self) -> bool {
        self.transcriber.is_some()
    }

    /// Assemble the prompt for `input` from the session's current window.
    pub fn prepare(&self, session: &Session, input: &str) -> Result<Prompt> {
        let window = render(session.turns().all(), session.config.memory_window.get());
        build(&session.config.system_prompt, &window.messages(), input)
    }

    /// Send one message and record the turn.
    pub async fn send(&self, session: &mut Session, input: &str) -> Result<String> {
        let prompt = self.prepare(session, input)?;
        let model = session.config.model;
        let completion = Arc::clone(&self.completion);

        self.run_turn(session, input, prompt, |messages| async move {
            completion.complete(&messages, model.as_str()).await
        })
        .await
    }

    /// Like `send`, pushing reply deltas into `sink` as they arrive.
    pub async fn send_streaming(
        &self,
        session: &mut Session,
        input: &str,
        sink: mpsc::UnboundedSender<String>,
    ) -> Result<String> {
        let prompt = self.prepare(session, input)?;
        let model = session.config.model;
        let completion = Arc::clone(&self.completion);

        self.run_turn(session, input, prompt, |messages| async move {
            completion
                .complete_streaming(&messages, model.as_str(), sink)
                .await
        })
        .await
    }

    async fn run_turn<F, Fut>(
        &self,
        session: &mut Session,
        input: &str,
        prompt: Prompt,
        call: F,
    ) -> Result<String>
    where
        F: FnOnce(Vec<flexibot_core::ChatMessage>) -> Fut,
        Fut: std::future::Future<Output = Result<String>>,
    {
        let span = flexibot_observability::session_span!(session.id.as_str(), "send");

        async {
            debug!(
                window = prompt.len().saturating_sub(2) / 2,
                model = %session.config.model,
                "Prompt assembled"
            );

            session.set_status(SessionStatus::InFlight);
            let start = Instant::now();
            let result = call(prompt.into_messages()).await;
            session.set_status(SessionStatus::Awaiting);
            record_duration("duration_ms", start.elapsed());

            match result {
                Ok(reply) => {
                    session.add_turn(Turn::new(input, reply.clone()));
                    tracing::Span::current().record("turns", session.turn_count());
                    info!(turns = session.turn_count(), "Turn recorded");
                    Ok(reply)
                }
                Err(e) => {
                    record_error(&e);
                    Err(e)
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Ask a question about an image. The answer is not recorded as a turn.
    pub async fn analyze_image(
        &self,
        session: &mut Session,
        question: &str,
        image: &ImageInput,
    ) -> Result<String> {
        if question.trim().is_empty() {
            return Err(RuntimeError::invalid_input(
                "a question is required to analyze an image",
            ));
        }
        let vision = self.vision.as_ref().ok_or_else(|| {
            RuntimeError::ConfigError(format!(
                "{} is not set; image questions are unavailable",
                Credentials::GOOGLE_API_KEY_ENV
            ))
        })?;

        let span = flexibot_observability::session_span!(session.id.as_str(), "vision");
        async {
            session.set_status(SessionStatus::InFlight);
            let result = vision.describe(question, image).await;
            session.set_status(SessionStatus::Awaiting);
            result
        }
        .instrument(span)
        .await
    }

    /// Transcribe an audio clip. Empty transcripts are rejected.
    pub async fn transcribe(&self, audio: &AudioInput) -> Result<String> {
        let transcriber = self
            .transcriber
            .as_ref()
            .ok_or_else(|| RuntimeError::ConfigError("no transcriber configured".to_string()))?;

        let text = transcriber.transcribe(audio).await?;
        if text.trim().is_empty() {
            return Err(RuntimeError::invalid_input(format!(
                "no speech recognized in '{}'",
                audio.file_name()
            )));
        }
        Ok(text)
    }
}
