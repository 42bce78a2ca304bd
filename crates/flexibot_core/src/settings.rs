//! Validated session settings: chat model, memory window and typing delay.

use std::str::FromStr;
use std::time::Duration;

use flexibot_constant::settings::{
    MEMORY_LENGTH_DEFAULT, MEMORY_LENGTH_MAX, MEMORY_LENGTH_MIN, TYPING_DELAY_MS_DEFAULT,
    TYPING_DELAY_MS_MAX, TYPING_DELAY_MS_MIN,
};
use serde::{Deserialize, Serialize};

use crate::error::{FlexiError, Result};

/// Chat-completion model selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChatModel {
    #[default]
    #[serde(rename = "llama3-8b-8192")]
    Llama3_8b,
    #[serde(rename = "mixtral-8x7b-32768")]
    Mixtral8x7b,
    #[serde(rename = "gemma-7b-it")]
    Gemma7b,
}

impl ChatModel {
    pub const ALL: [ChatModel; 3] = [ChatModel::Llama3_8b, ChatModel::Mixtral8x7b, ChatModel::Gemma7b];

    /// Model ids in `ALL` order.
    pub const IDS: [&'static str; 3] = {
        let mut ids = [""; 3];
        let mut i = 0;
        while i < Self::ALL.len() {
            ids[i] = Self::ALL[i].as_str();
            i += 1;
        }
        ids
    };

    pub const fn as_str(&self) -> &'static str {
        match self {
            ChatModel::Llama3_8b => "llama3-8b-8192",
            ChatModel::Mixtral8x7b => "mixtral-8x7b-32768",
            ChatModel::Gemma7b => "gemma-7b-it",
        }
    }
}

impl FromStr for ChatModel {
    type Err = FlexiError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        ChatModel::ALL
            .into_iter()
            .find(|m| m.as_str() == wanted)
            .ok_or_else(|| {
                FlexiError::Config(format!(
                    "unknown model '{}' (expected one of: {})",
                    s,
                    ChatModel::IDS.join(", ")
                ))
            })
    }
}

impl std::fmt::Display for ChatModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Number of most recent turns re-injected into each request (K).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct MemoryWindow(usize);

impl MemoryWindow {
    pub fn new(k: usize) -> Result<Self> {
        if !(MEMORY_LENGTH_MIN..=MEMORY_LENGTH_MAX).contains(&k) {
            return Err(FlexiError::Config(format!(
                "memory length {} out of range {}..={}",
                k, MEMORY_LENGTH_MIN, MEMORY_LENGTH_MAX
            )));
        }
        Ok(Self(k))
    }

    pub fn get(&self) -> usize {
        self.0
    }
}

impl Default for MemoryWindow {
    fn default() -> Self {
        Self(MEMORY_LENGTH_DEFAULT)
    }
}

impl TryFrom<usize> for MemoryWindow {
    type Error = FlexiError;

    fn try_from(k: usize) -> Result<Self> {
        Self::new(k)
    }
}

impl From<MemoryWindow> for usize {
    fn from(window: MemoryWindow) -> Self {
        window.0
    }
}

/// Typewriter delay between rendered characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct TypingDelay(u64);

impl TypingDelay {
    pub fn from_millis(ms: u64) -> Result<Self> {
        if !(TYPING_DELAY_MS_MIN..=TYPING_DELAY_MS_MAX).contains(&ms) {
            return Err(FlexiError::Config(format!(
                "typing delay {}ms out of range {}..={}",
                ms, TYPING_DELAY_MS_MIN, TYPING_DELAY_MS_MAX
            )));
        }
        Ok(Self(ms))
    }

    pub fn as_millis(&self) -> u64 {
        self.0
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_millis(self.0)
    }
}

impl Default for TypingDelay {
    fn default() -> Self {
        Self(TYPING_DELAY_MS_DEFAULT)
    }
}

impl TryFrom<u64> for TypingDelay {
    type Error = FlexiError;

    fn try_from(ms: u64) -> Result<Self> {
        Self::from_millis(ms)
    }
}

impl From<TypingDelay> for u64 {
    fn from(delay: TypingDelay) -> Self {
        delay.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_model_as_str() {
        assert_eq!(ChatModel::Llama3_8b.as_str(), "llama3-8b-8192");
        assert_eq!(ChatModel::Mixtral8x7b.as_str(), "mixtral-8x7b-32768");
        assert_eq!(ChatModel::Gemma7b.as_str(), "gemma-7b-it");
    }

    #[test]
    fn test_chat_model_from_str() {
        assert_eq!("gemma-7b-it".parse::<ChatModel>().unwrap(), ChatModel::Gemma7b);
        assert_eq!(
            " MIXTRAL-8x7b-32768 ".parse::<ChatModel>().unwrap(),
            ChatModel::Mixtral8x7b
        );
        assert!("gpt-4".parse::<ChatModel>().is_err());
    }

    #[test]
    fn test_chat_model_ids_follow_all() {
        for (model, id) in ChatModel::ALL.iter().zip(ChatModel::IDS) {
            assert_eq!(model.as_str(), id);
            assert_eq!(id.parse::<ChatModel>().unwrap(), *model);
        }
        let err = "gpt-4".parse::<ChatModel>().unwrap_err().to_string();
        assert!(err.contains("llama3-8b-8192, mixtral-8x7b-32768, gemma-7b-it"));
    }

    #[test]
    fn test_chat_model_default() {
        assert_eq!(ChatModel::default().as_str(), "llama3-8b-8192");
    }

    #[test]
    fn test_chat_model_serialization() {
        let json = serde_json::to_string(&ChatModel::Mixtral8x7b).unwrap();
        assert_eq!(json, "\"mixtral-8x7b-32768\"");
    }

    #[test]
    fn test_memory_window_bounds() {
        assert!(MemoryWindow::new(0).is_err());
        assert!(MemoryWindow::new(11).is_err());
        assert_eq!(MemoryWindow::new(1).unwrap().get(), 1);
        assert_eq!(MemoryWindow::new(10).unwrap().get(), 10);
        assert_eq!(MemoryWindow::default().get(), 5);
    }

    #[test]
    fn test_memory_window_deserialize_rejects_out_of_range() {
        assert!(serde_json::from_str::<MemoryWindow>("3").is_ok());
        assert!(serde_json::from_str::<MemoryWindow>("42").is_err());
    }

    #[test]
    fn test_typing_delay_bounds() {
        assert!(TypingDelay::from_millis(0).is_err());
        assert!(TypingDelay::from_millis(101).is_err());
        assert_eq!(
            TypingDelay::from_millis(100).unwrap().as_duration(),
            Duration::from_millis(100)
        );
        assert_eq!(TypingDelay::default().as_millis(), 5);
    }
}
