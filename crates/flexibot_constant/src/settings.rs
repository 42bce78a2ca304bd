//! Ranges and defaults for user-tunable session settings.

/// Conversational memory length (turns re-injected per request)
pub const MEMORY_LENGTH_MIN: usize = 1;
pub const MEMORY_LENGTH_MAX: usize = 10;
pub const MEMORY_LENGTH_DEFAULT: usize = 5;

/// Typewriter delay in milliseconds per character
pub const TYPING_DELAY_MS_MIN: u64 = 1;
pub const TYPING_DELAY_MS_MAX: u64 = 100;
pub const TYPING_DELAY_MS_DEFAULT: u64 = 5;
