//! Conversation resolution and message delivery routing.

pub mod resolver;
pub mod router;

pub use resolver::ConversationResolver;
pub use router::{DeliveryOutcome, DeliveryRouter};
