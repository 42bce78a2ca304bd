//! Runtime configuration for FlexiBot

use std::str::FromStr;
use std::time::Duration;

use flexibot_constant::models::{DEFAULT_TRANSCRIPTION_MODEL, DEFAULT_VISION_MODEL};
use flexibot_core::{ChatModel, MemoryWindow, SessionConfig, TypingDelay};
use flexibot_llms::GenerateOptions;
use tracing::warn;

use crate::error::{Result, RuntimeError};

/// API credentials read from the environment
#[derive(Clone)]
pub struct Credentials {
    pub groq_api_key: String,
    pub google_api_key: Option<String>,
}

impl Credentials {
    pub const GROQ_API_KEY_ENV: &'static str = "GROQ_API_KEY";
    pub const GOOGLE_API_KEY_ENV: &'static str = "GOOGLE_API_KEY";

    /// `GROQ_API_KEY` is required; `GOOGLE_API_KEY` only enables vision.
    pub fn from_env() -> Result<Self> {
        let groq_api_key = non_empty_env(Self::GROQ_API_KEY_ENV).ok_or_else(|| {
            RuntimeError::ConfigError(format!(
                "{} is not set. Add it to your environment or a .env file.",
                Self::GROQ_API_KEY_ENV
            ))
        })?;

        Ok(Self {
            groq_api_key,
            google_api_key: non_empty_env(Self::GOOGLE_API_KEY_ENV),
        })
    }

    pub fn has_vision(&self) -> bool {
        self.google_api_key.is_some()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("groq_api_key", &"***")
            .field("google_api_key", &self.google_api_key.as_ref().map(|_| "***"))
            .finish()
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Chat model for text turns
    pub model: ChatModel,
    /// Number of previous turns re-sent with each request
    pub memory_window: MemoryWindow,
    /// Typewriter delay per character
    pub typing_delay: TypingDelay,
    /// System instruction; empty is allowed
    pub system_prompt: String,
    /// Gemini model for image questions
    pub vision_model: String,
    /// Whisper model for voice input
    pub transcription_model: String,
    /// ISO-639-1 hint for transcription
    pub transcription_language: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    /// Whole-request HTTP timeout (None = no timeout)
    pub request_timeout: Option<Duration>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            model: ChatModel::default(),
            memory_window: MemoryWindow::default(),
            typing_delay: TypingDelay::default(),
            system_prompt: String::new(),
            vision_model: DEFAULT_VISION_MODEL.to_string(),
            transcription_model: DEFAULT_TRANSCRIPTION_MODEL.to_string(),
            transcription_language: None,
            max_tokens: None,
            temperature: None,
            request_timeout: None,
        }
    }
}

impl RuntimeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(mut self, model: ChatModel) -> Self {
        self.model = model;
        self
    }

    pub fn with_memory_window(mut self, window: MemoryWindow) -> Self {
        self.memory_window = window;
        self
    }

    pub fn with_typing_delay(mut self, delay: TypingDelay) -> Self {
        self.typing_delay = delay;
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_vision_model(mut self, model: impl Into<String>) -> Self {
        self.vision_model = model.into();
        self
    }

    pub fn with_transcription_model(mut self, model: impl Into<String>) -> Self {
        self.transcription_model = model.into();
        self
    }

    pub fn with_transcription_language(mut self, language: impl Into<String>) -> Self {
        self.transcription_language = Some(language.into());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Unparsable or out-of-range values are ignored with a warning.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(model) = parse_env::<ChatModel>("FLEXIBOT_MODEL") {
            config.model = model;
        }

        if let Some(k) = parse_env::<usize>("FLEXIBOT_MEMORY_LENGTH") {
            match MemoryWindow::new(k) {
                Ok(window) => config.memory_window = window,
                Err(e) => warn!(error = %e, "Ignoring FLEXIBOT_MEMORY_LENGTH"),
            }
        }

        if let Some(ms) = parse_env::<u64>("FLEXIBOT_TYPING_DELAY_MS") {
            match TypingDelay::from_millis(ms) {
                Ok(delay) => config.typing_delay = delay,
                Err(e) => warn!(error = %e, "Ignoring FLEXIBOT_TYPING_DELAY_MS"),
            }
        }

        if let Ok(prompt) = std::env::var("FLEXIBOT_SYSTEM_PROMPT") {
            config.system_prompt = prompt;
        }

        if let Some(model) = non_empty_env("FLEXIBOT_VISION_MODEL") {
            config.vision_model = model;
        }

        if let Some(model) = non_empty_env("FLEXIBOT_TRANSCRIPTION_MODEL") {
            config.transcription_model = model;
        }

        config.transcription_language = non_empty_env("FLEXIBOT_TRANSCRIPTION_LANGUAGE");
        config.max_tokens = parse_env("FLEXIBOT_MAX_TOKENS");
        config.temperature = parse_env("FLEXIBOT_TEMPERATURE");
        config.request_timeout =
            parse_env::<u64>("FLEXIBOT_REQUEST_TIMEOUT_SECS").map(Duration::from_secs);

        config
    }

    /// Settings for a new chat session.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig::new(self.model)
            .with_memory_window(self.memory_window)
            .with_typing_delay(self.typing_delay)
            .with_system_prompt(self.system_prompt.clone())
    }

    /// Generation options shared by chat and vision requests.
    pub fn generate_options(&self) -> GenerateOptions {
        let mut options = GenerateOptions::new();
        if let Some(max_tokens) = self.max_tokens {
            options = options.max_tokens(max_tokens);
        }
        if let Some(temperature) = self.temperature {
            options = options.temperature(temperature);
        }
        options
    }
}

fn parse_env<T>(key: &str) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = non_empty_env(key)?;
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, value = %raw, error = %e, "Ignoring unparsable environment value");
            None
        }
    }
}
