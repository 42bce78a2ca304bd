//! Conversation context and prompt assembly.
//!
//! - **window**: selects the most recent K turns and renders them as messages
//! - **messages**: assembles the ordered prompt and converts it to provider requests

mod messages;
mod window;

pub use messages::{Prompt, build, build_generate_request, build_vision_request};
pub use window::{ContextWindow, estimate_tokens, render};
