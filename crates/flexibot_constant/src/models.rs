//! Model identifiers.
//!
//! Chat models are the fixed set enumerated by `ChatModel` in flexibot-core;
//! the vision and transcription models here are defaults that env
//! configuration may override.

/// Gemini model used for image questions.
pub const DEFAULT_VISION_MODEL: &str = "gemini-1.5-flash";

/// Groq-hosted Whisper model used for speech-to-text.
pub const DEFAULT_TRANSCRIPTION_MODEL: &str = "whisper-large-v3";

/// Image file extensions accepted for vision requests.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Audio file extensions accepted by the transcription endpoint.
pub const AUDIO_EXTENSIONS: &[&str] = &[
    "flac", "mp3", "mp4", "mpeg", "mpga", "m4a", "ogg", "wav", "webm",
];
