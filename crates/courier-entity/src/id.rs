//! Typed identifier aliases.
//!
//! Durable entities use `BIGSERIAL` keys, so identifiers are plain `i64`
//! values. The aliases keep signatures readable and make it obvious which
//! kind of id a function expects.

/// Identifier of a registered user.
pub type UserId = i64;

/// Identifier of a conversation between two users.
pub type ConversationId = i64;

/// Identifier of a message.
pub type MessageId = i64;
