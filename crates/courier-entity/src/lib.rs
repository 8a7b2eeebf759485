//! # courier-entity
//!
//! Domain entity models for Courier. Every struct in this crate is either
//! a database table row or a value object assembled from rows. All
//! entities derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and
//! row-backed entities additionally derive `sqlx::FromRow`.

pub mod conversation;
pub mod id;
pub mod message;
pub mod user;

pub use conversation::{Conversation, ConversationKey, ConversationSummary, SelfPairError};
pub use id::{ConversationId, MessageId, UserId};
pub use message::{Message, MessageWithParties};
pub use user::{User, UserSummary};
