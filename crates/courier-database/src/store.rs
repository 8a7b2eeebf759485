//! PostgreSQL-backed [`DeliveryStore`] implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use courier_core::result::AppResult;
use courier_core::traits::DeliveryStore;
use courier_entity::{Conversation, ConversationId, ConversationKey, MessageWithParties, User, UserId};

use crate::repositories::{ConversationRepository, MessageRepository, UserRepository};

/// Delivery-store facade over the concrete repositories.
#[derive(Debug, Clone)]
pub struct PgDeliveryStore {
    users: UserRepository,
    conversations: ConversationRepository,
    messages: MessageRepository,
}

impl PgDeliveryStore {
    /// Create a store over the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            conversations: ConversationRepository::new(pool.clone()),
            messages: MessageRepository::new(pool),
        }
    }
}

#[async_trait]
impl DeliveryStore for PgDeliveryStore {
    async fn find_user(&self, id: UserId) -> AppResult<Option<User>> {
        self.users.find_by_id(id).await
    }

    async fn find_user_by_name(&self, username: &str) -> AppResult<Option<User>> {
        self.users.find_by_username(username).await
    }

    async fn find_or_create_conversation(&self, key: ConversationKey) -> AppResult<Conversation> {
        self.conversations.find_or_create(key).await
    }

    async fn create_message(
        &self,
        conversation_id: ConversationId,
        sender_id: UserId,
        receiver_id: UserId,
        content: &str,
    ) -> AppResult<MessageWithParties> {
        self.messages
            .create(conversation_id, sender_id, receiver_id, content)
            .await
    }

    async fn update_presence_mirror(
        &self,
        user_id: UserId,
        online: bool,
        connection_ref: Option<&str>,
    ) -> AppResult<()> {
        self.users.set_presence(user_id, online, connection_ref).await
    }
}
