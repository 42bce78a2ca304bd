//! flexibot_llms: provider-agnostic chat completions SDK with streaming support.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                  ProviderRegistry                    │
//! │  ┌──────────────────────────────────────────────┐   │
//! │  │  HashMap<String, Arc<dyn Provider>>           │   │
//! │  └──────────────────────────────────────────────┘   │
//! │                       │                              │
//! │             ┌─────────┴─────────┐                   │
//! │             ▼                   ▼                   │
//! │      ┌────────────┐      ┌────────────┐            │
//! │      │    Groq    │      │   Gemini   │            │
//! │      │  chat/STT  │      │   vision   │            │
//! │      └────────────┘      └────────────┘            │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use flexibot_llms::{GroqProvider, ProviderRegistry};
//!
//! let provider = GroqProvider::from_env().unwrap();
//! let registry = ProviderRegistry::new()
//!     .register("groq", provider);
//! ```

pub mod error;
pub mod provider;
pub mod providers;
pub mod types;


// Re-export core abstractions
pub use error::{Error, Result};
pub use provider::{Provider, ProviderRegistry};

// Re-export provider implementations
#[cfg(feature = "gemini")]
pub use providers::GeminiProvider;
#[cfg(feature = "groq")]
pub use providers::GroqProvider;

// Re-export commonly used types
pub use types::{
    ContentPart, GenerateOptions, GenerateRequest, GenerateResponse, GenerateStream, Message,
    Role, StreamEvent, Transcription, TranscriptionRequest,
};
