//! Response DTOs for the REST surface.

use chrono::{DateTime, Utc};
use serde::Serialize;

use courier_entity::{Conversation, MessageWithParties, User, UserId};
use courier_realtime::DeliveryOutcome;

/// Standard wrapper for all successful responses.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Always `true` for successes.
    pub success: bool,
    /// The payload.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Wraps a payload in the success envelope.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Public view of a user.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// User identifier.
    pub id: UserId,
    /// Display name.
    pub username: String,
    /// Durable online mirror at read time.
    pub is_online: bool,
    /// Last presence transition.
    pub last_seen: Option<DateTime<Utc>>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            is_online: user.is_online,
            last_seen: user.last_seen,
        }
    }
}

/// Identity bootstrap result: the user plus a signed token.
#[derive(Debug, Serialize)]
pub struct CreateUserResponse {
    /// The created or fetched user.
    pub user: UserResponse,
    /// Signed identity token for subsequent requests.
    pub token: String,
    /// Token expiry.
    pub expires_at: DateTime<Utc>,
}

/// Outcome of a send: the persisted message and whether it reached the
/// receiver's live connection.
#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    /// The persisted message with party names.
    pub message: MessageWithParties,
    /// Whether a realtime push to the receiver was attempted.
    pub realtime_delivered: bool,
}

impl From<DeliveryOutcome> for SendMessageResponse {
    fn from(outcome: DeliveryOutcome) -> Self {
        Self {
            message: outcome.message,
            realtime_delivered: outcome.realtime_delivered,
        }
    }
}

/// Conversation history between the caller and one other user.
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    /// The canonical conversation row, created lazily if absent.
    pub conversation: Conversation,
    /// Messages in ascending creation order.
    pub messages: Vec<MessageWithParties>,
}

/// Unread message count for the caller.
#[derive(Debug, Serialize)]
pub struct UnreadCountResponse {
    /// Messages addressed to the caller and not yet read.
    pub unread_count: i64,
}

/// Basic liveness payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` when the process can respond.
    pub status: String,
    /// Crate version.
    pub version: String,
}

/// Health payload including dependency checks.
#[derive(Debug, Serialize)]
pub struct DetailedHealthResponse {
    /// `"ok"` or `"degraded"`.
    pub status: String,
    /// `"connected"` or `"unreachable"`.
    pub database: String,
    /// Identities currently registered in the presence directory.
    pub online_users: usize,
}
