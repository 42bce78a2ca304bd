//! Context window: the last K turns of a session, rendered as messages.

use flexibot_core::{ChatMessage, Turn};

/// View over the most recent turns of a store.
///
/// Borrowed from the store, so a window can never observe a turn appended
/// after it was rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextWindow<'a> {
    turns: &'a [Turn],
}

impl<'a> ContextWindow<'a> {
    /// Number of turns in the window.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn turns(&self) -> &'a [Turn] {
        self.turns
    }

    /// User/assistant messages, two per turn, oldest first.
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.turns.iter().flat_map(Turn::to_messages).collect()
    }
}

/// Take the last `k` turns (fewer if there are fewer), preserving order.
///
/// `k == 0` yields an empty window.
pub fn render(turns: &[Turn], k: usize) -> ContextWindow<'_> {
    let start = turns.len().saturating_sub(k);
    ContextWindow {
        turns: &turns[start..],
    }
}

/// Rough token estimate: ~4 characters per token.
pub fn estimate_tokens(messages: &[ChatMessage]) -> usize {
    let chars: usize = messages.iter().map(|m| m.text().chars().count()).sum();
    chars / 4
}
