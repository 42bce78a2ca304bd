use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::settings::{ChatModel, MemoryWindow, TypingDelay};
use crate::store::TurnStore;
use crate::turn::Turn;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Awaiting,
    InFlight,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    pub model: ChatModel,
    pub memory_window: MemoryWindow,
    pub typing_delay: TypingDelay,
    pub system_prompt: String,
}

impl SessionConfig {
    pub fn new(model: ChatModel) -> Self {
        Self {
            model,
            ..Self::default()
        }
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
}

/// One user interaction: its settings plus the turns exchanged so far.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub status: SessionStatus,
    pub config: SessionConfig,
    turns: TurnStore,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            id: SessionId::new(),
            status: SessionStatus::Awaiting,
            config,
            turns: TurnStore::new(),
            created_at: Utc::now(),
        }
    }

    pub fn add_turn(&mut self, turn: Turn) {
        self.turns.append(turn);
    }

    pub fn turns(&self) -> &TurnStore {
        &self.turns
    }

    pub fn set_status(&mut self, status: SessionStatus) {
        self.status = status;
    }

    pub fn is_in_flight(&self) -> bool {
        self.status == SessionStatus::InFlight
    }

    pub fn turn_count(&self) -> usize {
        self.turns.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_new() {
        let id = SessionId::new();
        assert!(!id.0.is_empty());
        assert_eq!(id.as_str().len(), 36); // UUID format
    }

    #[test]
    fn test_session_id_display() {
        let id = SessionId::new();
        let display = format!("{}", id);
        assert_eq!(display, id.as_str());
    }

    #[test]
    fn test_session_status_serialization() {
        let json = serde_json::to_string(&SessionStatus::InFlight).unwrap();
        assert_eq!(json, "\"in_flight\"");
    }

    #[test]
    fn test_session_config_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.model, ChatModel::Llama3_8b);
        assert_eq!(config.memory_window.get(), 5);
        assert_eq!(config.typing_delay.as_millis(), 5);
        assert!(config.system_prompt.is_empty());
    }

    #[test]
    fn test_session_config_builder() {
        let config = SessionConfig::new(ChatModel::Gemma7b)
            .with_memory_window(MemoryWindow::new(2).unwrap())
            .with_typing_delay(TypingDelay::from_millis(40).unwrap())
            .with_system_prompt("Be brief.");

        assert_eq!(config.model, ChatModel::Gemma7b);
        assert_eq!(config.memory_window.get(), 2);
        assert_eq!(config.typing_delay.as_millis(), 40);
        assert_eq!(config.system_prompt, "Be brief.");
    }

    #[test]
    fn test_session_new() {
        let session = Session::new(SessionConfig::default());
        assert_eq!(session.status, SessionStatus::Awaiting);
        assert!(!session.is_in_flight());
        assert_eq!(session.turn_count(), 0);
    }

    #[test]
    fn test_session_add_turn() {
        let mut session = Session::new(SessionConfig::default());
        session.add_turn(Turn::new("hello", "hi"));
        assert_eq!(session.turn_count(), 1);
        assert_eq!(session.turns().last().unwrap().human(), "hello");
    }

    #[test]
    fn test_sessions_are_isolated() {
        let mut first = Session::new(SessionConfig::default());
        let second = Session::new(SessionConfig::default());
        first.add_turn(Turn::new("only here", "yes"));

        assert_eq!(first.turn_count(), 1);
        assert_eq!(second.turn_count(), 0);
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_session_serialization() {
        let mut session = Session::new(SessionConfig::new(ChatModel::Mixtral8x7b));
        session.add_turn(Turn::new("q", "a"));

        let json = serde_json::to_string(&session).unwrap();
        let decoded: Session = serde_json::from_str(&json).unwrap();

        assert_eq!(decoded.id, session.id);
        assert_eq!(decoded.turn_count(), 1);
        assert_eq!(decoded.config.model, ChatModel::Mixtral8x7b);
    }
}
