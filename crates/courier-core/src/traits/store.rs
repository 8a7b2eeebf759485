//! Durable store trait consumed by the delivery core.
//!
//! The [`DeliveryStore`] trait is defined here in `courier-core` and
//! implemented by `courier-database` over PostgreSQL; tests substitute an
//! in-memory implementation. The realtime crate only ever sees the trait
//! object, which keeps the presence-and-delivery core free of any direct
//! database dependency.

use async_trait::async_trait;

use courier_entity::{Conversation, ConversationId, ConversationKey, MessageWithParties, User, UserId};

use crate::result::AppResult;

/// Persistence operations required by the delivery core.
///
/// Contract notes:
/// - [`find_or_create_conversation`](Self::find_or_create_conversation)
///   must be atomic per pair: any number of concurrent calls with the same
///   key yield exactly one conversation row, and every call returns it.
/// - [`update_presence_mirror`](Self::update_presence_mirror) writes are
///   best-effort; callers log failures and carry on. The mirror is never
///   consulted for delivery decisions.
/// - Every operation maps backend failures to `StoreUnavailable`.
#[async_trait]
pub trait DeliveryStore: Send + Sync {
    /// Looks up a user by id.
    async fn find_user(&self, id: UserId) -> AppResult<Option<User>>;

    /// Looks up a user by normalized display name.
    async fn find_user_by_name(&self, username: &str) -> AppResult<Option<User>>;

    /// Fetches the conversation for `key`, creating it if absent.
    async fn find_or_create_conversation(&self, key: ConversationKey) -> AppResult<Conversation>;

    /// Persists a message, bumps the conversation's `updated_at`, and
    /// returns the row joined with both parties' display names.
    async fn create_message(
        &self,
        conversation_id: ConversationId,
        sender_id: UserId,
        receiver_id: UserId,
        content: &str,
    ) -> AppResult<MessageWithParties>;

    /// Writes the durable presence mirror: `is_online`, `last_seen = now`,
    /// and the opaque connection reference (cleared when going offline).
    async fn update_presence_mirror(
        &self,
        user_id: UserId,
        online: bool,
        connection_ref: Option<&str>,
    ) -> AppResult<()>;
}
