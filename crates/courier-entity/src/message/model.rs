//! Message entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::id::{ConversationId, MessageId, UserId};

/// A single direct message.
///
/// Immutable once created except for the `read` flag.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Message {
    /// Unique message identifier.
    pub id: MessageId,
    /// Conversation this message belongs to.
    pub conversation_id: ConversationId,
    /// Sending user.
    pub sender_id: UserId,
    /// Receiving user.
    pub receiver_id: UserId,
    /// Message body.
    pub content: String,
    /// Whether the receiver has read the message.
    #[sqlx(rename = "is_read")]
    pub read: bool,
    /// Creation time; the sole ordering authority for history.
    pub created_at: DateTime<Utc>,
}

/// A message joined with both parties' display names.
///
/// This is the shape pushed over the realtime channel and returned from
/// the send and history operations.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MessageWithParties {
    /// Unique message identifier.
    pub id: MessageId,
    /// Conversation this message belongs to.
    pub conversation_id: ConversationId,
    /// Sending user.
    pub sender_id: UserId,
    /// Receiving user.
    pub receiver_id: UserId,
    /// Message body.
    pub content: String,
    /// Whether the receiver has read the message.
    #[sqlx(rename = "is_read")]
    pub read: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Sender's display name.
    pub sender_username: String,
    /// Receiver's display name.
    pub receiver_username: String,
}

impl MessageWithParties {
    /// Drops the joined names, leaving the bare row.
    pub fn into_message(self) -> Message {
        Message {
            id: self.id,
            conversation_id: self.conversation_id,
            sender_id: self.sender_id,
            receiver_id: self.receiver_id,
            content: self.content,
            read: self.read,
            created_at: self.created_at,
        }
    }
}
