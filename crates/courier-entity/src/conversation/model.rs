//! Conversation entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::id::{ConversationId, UserId};
use crate::message::Message;
use crate::user::UserSummary;

/// A durable conversation between exactly two users.
///
/// `user_low_id < user_high_id` always; the pair is unique, so at most one
/// conversation exists per unordered pair of users.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Conversation {
    /// Unique conversation identifier.
    pub id: ConversationId,
    /// Smaller user id of the pair.
    pub user_low_id: UserId,
    /// Larger user id of the pair.
    pub user_high_id: UserId,
    /// When the conversation was created.
    pub created_at: DateTime<Utc>,
    /// Bumped whenever a message lands in the conversation.
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// The participant that is not `user`.
    pub fn other_participant(&self, user: UserId) -> UserId {
        if user == self.user_low_id {
            self.user_high_id
        } else {
            self.user_low_id
        }
    }
}

/// A conversation as shown in a user's inbox listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSummary {
    /// Conversation identifier.
    pub conversation_id: ConversationId,
    /// The other party of the conversation.
    pub other_user: UserSummary,
    /// Most recent message, if any has been sent.
    pub last_message: Option<Message>,
    /// Last activity time, drives inbox ordering.
    pub updated_at: DateTime<Utc>,
}
