pub mod error;
pub mod session;
pub mod settings;
pub mod store;
pub mod turn;

pub use error::{FlexiError, Result};
pub use session::{Session, SessionConfig, SessionId, SessionStatus};
pub use settings::{ChatModel, MemoryWindow, TypingDelay};
pub use store::TurnStore;
pub use turn::{ChatMessage, Role, Turn};
