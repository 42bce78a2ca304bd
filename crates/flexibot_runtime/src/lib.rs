pub mod completion;
pub mod config;
pub mod context;
pub mod error;
pub mod evaluation;
pub mod runtime;
pub mod speech;
pub mod vision;

pub use completion::{CompletionClient, ProviderCompletionClient};
pub use config::{Credentials, RuntimeConfig};
pub use context::{ContextWindow, Prompt, build, render};
pub use error::{Result, RuntimeError};
pub use evaluation::{Feedback, FeedbackNote, evaluate};
pub use runtime::{ChatRuntime, GEMINI, GROQ};
pub use speech::{AudioInput, ProviderTranscriber, Transcriber};
pub use vision::{ImageInput, ProviderVisionClient, VisionClient};
