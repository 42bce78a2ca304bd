use serde::{Deserialize, Serialize};

use crate::turn::Turn;

/// Append-only turn history for one session.
///
/// There is no removal API; the store lives and dies with its session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TurnStore {
    turns: Vec<Turn>,
}

impl TurnStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// All turns in insertion order.
    pub fn all(&self) -> &[Turn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
