//! Runtime error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Rejected before any external call; the session is untouched.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A completion, vision or speech call failed.
    #[error("Upstream error: {0}")]
    UpstreamFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Provider not found: {0}")]
    ProviderNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RuntimeError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        RuntimeError::InvalidInput(message.into())
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, RuntimeError::InvalidInput(_))
    }

    pub fn is_upstream(&self) -> bool {
        matches!(self, RuntimeError::UpstreamFailed(_))
    }
}

impl From<flexibot_llms::Error> for RuntimeError {
    fn from(err: flexibot_llms::Error) -> Self {
        use flexibot_llms::Error;

        match err {
            Error::MissingApiKey(provider) => {
                RuntimeError::ConfigError(format!("missing API key for {provider}"))
            }
            Error::ProviderNotFound(id) => RuntimeError::ProviderNotFound(id),
            Error::Unsupported(message) => RuntimeError::InvalidInput(message),
            other => RuntimeError::UpstreamFailed(other.to_string()),
        }
    }
}

impl From<flexibot_core::FlexiError> for RuntimeError {
    fn from(err: flexibot_core::FlexiError) -> Self {
        use flexibot_core::FlexiError;

        match err {
            FlexiError::InvalidInput(message) => RuntimeError::InvalidInput(message),
            FlexiError::Io(e) => RuntimeError::Io(e),
            other => RuntimeError::ConfigError(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_errors_map_to_upstream() {
        let err: RuntimeError = flexibot_llms::Error::api_error("Groq", 429, "rate limited").into();
        assert!(err.is_upstream());
        assert!(err.to_string().contains("rate limited"));
    }

    #[test]
    fn test_missing_key_maps_to_config() {
        let err: RuntimeError = flexibot_llms::Error::MissingApiKey("gemini".into()).into();
        assert!(matches!(err, RuntimeError::ConfigError(ref m) if m.contains("gemini")));
    }

    #[test]
    fn test_core_errors() {
        let err: RuntimeError = flexibot_core::FlexiError::Config("bad k".into()).into();
        assert!(matches!(err, RuntimeError::ConfigError(_)));

        let err: RuntimeError = flexibot_core::FlexiError::InvalidInput("empty".into()).into();
        assert!(err.is_invalid_input());
    }
}
