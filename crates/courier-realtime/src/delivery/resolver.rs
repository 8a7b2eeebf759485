//! Conversation resolution: canonical pair to durable conversation row.

use std::sync::Arc;

use courier_core::result::AppResult;
use courier_core::traits::DeliveryStore;
use courier_entity::{Conversation, ConversationKey, UserId};

/// Resolves an unordered pair of identities to its single conversation.
#[derive(Clone)]
pub struct ConversationResolver {
    store: Arc<dyn DeliveryStore>,
}

impl ConversationResolver {
    /// Create a resolver over the store.
    pub fn new(store: Arc<dyn DeliveryStore>) -> Self {
        Self { store }
    }

    /// Resolve the conversation between `a` and `b`, creating it lazily
    /// on first contact.
    ///
    /// Rejects `a == b` with `SelfConversation`. Repeated calls with
    /// either argument order return the same row. Atomicity under
    /// concurrent first contact is delegated to the store's conditional
    /// insert, so no in-process lock is taken here.
    pub async fn resolve(&self, a: UserId, b: UserId) -> AppResult<Conversation> {
        let key = ConversationKey::new(a, b)?;
        self.store.find_or_create_conversation(key).await
    }
}
