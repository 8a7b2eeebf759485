//! Conversation domain entities.

pub mod key;
pub mod model;

pub use key::{ConversationKey, SelfPairError};
pub use model::{Conversation, ConversationSummary};
