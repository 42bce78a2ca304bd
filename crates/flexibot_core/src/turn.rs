use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A role-tagged message as it is sent to a chat model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", content = "content", rename_all = "snake_case")]
pub enum ChatMessage {
    System(String),
    User(String),
    Assistant(String),
}

impl ChatMessage {
    pub fn system(text: impl Into<String>) -> Self {
        ChatMessage::System(text.into())
    }

    pub fn user(text: impl Into<String>) -> Self {
        ChatMessage::User(text.into())
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        ChatMessage::Assistant(text.into())
    }

    pub fn role(&self) -> Role {
        match self {
            ChatMessage::System(_) => Role::System,
            ChatMessage::User(_) => Role::User,
            ChatMessage::Assistant(_) => Role::Assistant,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            ChatMessage::System(text) | ChatMessage::User(text) | ChatMessage::Assistant(text) => {
                text
            }
        }
    }
}

/// One human input paired with the model output it produced.
///
/// Fields are private: a turn never changes after the request/response cycle
/// that created it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    human: String,
    assistant: String,
    timestamp: DateTime<Utc>,
}

impl Turn {
    pub fn new(human: impl Into<String>, assistant: impl Into<String>) -> Self {
        Self {
            human: human.into(),
            assistant: assistant.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn human(&self) -> &str {
        &self.human
    }

    pub fn assistant(&self) -> &str {
        &self.assistant
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// The user message followed by the assistant reply.
    pub fn to_messages(&self) -> [ChatMessage; 2] {
        [
            ChatMessage::user(self.human.clone()),
            ChatMessage::assistant(self.assistant.clone()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serialization() {
        let role = Role::User;
        let json = serde_json::to_string(&role).unwrap();
        assert_eq!(json, "\"user\"");

        let decoded: Role = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, Role::User);
    }

    #[test]
    fn test_role_display() {
        assert_eq!(Role::System.to_string(), "system");
        assert_eq!(Role::Assistant.to_string(), "assistant");
    }

    #[test]
    fn test_chat_message_roles() {
        assert_eq!(ChatMessage::system("s").role(), Role::System);
        assert_eq!(ChatMessage::user("u").role(), Role::User);
        assert_eq!(ChatMessage::assistant("a").role(), Role::Assistant);
    }

    #[test]
    fn test_chat_message_text() {
        let msg = ChatMessage::user("hello world");
        assert_eq!(msg.text(), "hello world");
    }

    #[test]
    fn test_chat_message_serialization() {
        let msg = ChatMessage::assistant("hi there");
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"hi there"}"#);

        let decoded: ChatMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_empty_system_message_is_valid() {
        let msg = ChatMessage::system("");
        assert_eq!(msg.text(), "");
        assert_eq!(msg.role(), Role::System);
    }

    #[test]
    fn test_turn_accessors() {
        let turn = Turn::new("what is rust?", "a systems language");
        assert_eq!(turn.human(), "what is rust?");
        assert_eq!(turn.assistant(), "a systems language");
        assert!(turn.timestamp() <= Utc::now());
    }

    #[test]
    fn test_turn_to_messages() {
        let turn = Turn::new("h1", "a1");
        let [user, assistant] = turn.to_messages();
        assert_eq!(user, ChatMessage::user("h1"));
        assert_eq!(assistant, ChatMessage::assistant("a1"));
    }

    #[test]
    fn test_turn_serialization() {
        let turn = Turn::new("hello", "hi");
        let json = serde_json::to_string(&turn).unwrap();
        assert!(json.contains(r#""human":"hello""#));
        assert!(json.contains(r#""assistant":"hi""#));

        let decoded: Turn = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, turn);
    }
}
