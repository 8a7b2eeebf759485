//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::id::UserId;

/// A registered identity in the relay.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: UserId,
    /// Unique display name, stored trimmed and lower-cased.
    pub username: String,
    /// Durable online mirror. Best-effort only; the in-memory presence
    /// directory is authoritative for delivery decisions.
    pub is_online: bool,
    /// Opaque reference to the live connection, null while offline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub socket_ref: Option<String>,
    /// Last presence transition time.
    pub last_seen: Option<DateTime<Utc>>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Canonical storage form of a display name.
    pub fn normalize_name(raw: &str) -> String {
        raw.trim().to_lowercase()
    }

    /// Reduced view used in listings and summaries.
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            username: self.username.clone(),
            is_online: self.is_online,
        }
    }
}

/// Minimal user view embedded in other payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    /// User identifier.
    pub id: UserId,
    /// Display name.
    pub username: String,
    /// Durable online mirror at read time.
    pub is_online: bool,
}
