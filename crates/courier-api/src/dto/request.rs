//! Request DTOs with validation rules.

use serde::{Deserialize, Serialize};
use validator::Validate;

use courier_entity::UserId;

/// Identity bootstrap request.
///
/// Courier has no password step; posting a name either creates the
/// identity or fetches the existing one.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserRequest {
    /// Desired display name. Stored trimmed and lower-cased.
    #[validate(length(min = 1, max = 100, message = "Username is required"))]
    pub username: String,
}

/// REST body for sending a direct message.
///
/// Content is deliberately not validated here; the delivery router owns
/// the whitespace-only rejection so REST and WebSocket sends behave
/// identically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageRequest {
    /// Receiving user.
    pub receiver_id: UserId,
    /// Message body.
    pub content: String,
}
