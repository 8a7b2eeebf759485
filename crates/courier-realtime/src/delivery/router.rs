//! Message delivery router: persist first, then push to whoever is
//! reachable.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use courier_core::error::AppError;
use courier_core::result::AppResult;
use courier_core::traits::DeliveryStore;
use courier_entity::{MessageWithParties, UserId};

use crate::events::ServerEvent;
use crate::presence::PresenceDirectory;

use super::resolver::ConversationResolver;

/// Outcome of a send.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryOutcome {
    /// The persisted message, joined with both display names.
    pub message: MessageWithParties,
    /// True iff the receiver had a live handle when the router looked.
    /// Sender echo and push transport errors do not affect this flag.
    pub realtime_delivered: bool,
}

/// Routes sends between persistence and realtime push.
#[derive(Clone)]
pub struct DeliveryRouter {
    store: Arc<dyn DeliveryStore>,
    directory: Arc<PresenceDirectory>,
    resolver: ConversationResolver,
}

impl DeliveryRouter {
    /// Create a router over the store and directory.
    pub fn new(store: Arc<dyn DeliveryStore>, directory: Arc<PresenceDirectory>) -> Self {
        let resolver = ConversationResolver::new(store.clone());
        Self {
            store,
            directory,
            resolver,
        }
    }

    /// The router's conversation resolver, shared with callers that need
    /// pair resolution without a send (history retrieval).
    pub fn resolver(&self) -> &ConversationResolver {
        &self.resolver
    }

    /// Send `content` from `sender_id` to `receiver_id`.
    ///
    /// Validation and persistence strictly precede any push: a message
    /// that fails to persist is never pushed. Pushes are best-effort,
    /// at-most-once. A transport failure is logged per recipient and
    /// never rolls back the stored row; the message then surfaces only
    /// through history retrieval.
    pub async fn send(
        &self,
        sender_id: UserId,
        receiver_id: UserId,
        content: &str,
    ) -> AppResult<DeliveryOutcome> {
        if content.trim().is_empty() {
            return Err(AppError::empty_content("Message content must not be empty"));
        }

        self.store
            .find_user(receiver_id)
            .await?
            .ok_or_else(|| AppError::unknown_receiver(format!("No user with id {receiver_id}")))?;

        let conversation = self.resolver.resolve(sender_id, receiver_id).await?;

        let message = self
            .store
            .create_message(conversation.id, sender_id, receiver_id, content)
            .await?;

        if let Some(sender) = self.directory.lookup(sender_id) {
            if let Err(e) = sender.push(ServerEvent::MessageSent {
                message: message.clone(),
            }) {
                warn!(conn_id = %sender.id, error = %e, "Sender echo dropped");
            }
        }

        let realtime_delivered = match self.directory.lookup(receiver_id) {
            Some(receiver) => {
                if let Err(e) = receiver.push(ServerEvent::MessageReceive {
                    message: message.clone(),
                }) {
                    warn!(conn_id = %receiver.id, error = %e, "Receiver push dropped");
                }
                true
            }
            None => false,
        };

        debug!(
            message_id = message.id,
            conversation_id = message.conversation_id,
            realtime_delivered,
            "Message routed"
        );

        Ok(DeliveryOutcome {
            message,
            realtime_delivered,
        })
    }
}
