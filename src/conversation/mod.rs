//! Conversation state and the session that drives it

pub mod message;
pub mod session;
pub mod state;

pub use message::{Message, Sender};
pub use session::Session;
pub use state::{CompletionResult, ConversationState, Effect, Event, Speakable};
