//! Message repository implementation.

use sqlx::PgPool;

use courier_core::error::{AppError, ErrorKind};
use courier_core::result::AppResult;
use courier_entity::{ConversationId, Message, MessageId, MessageWithParties, UserId};

const SELECT_WITH_PARTIES: &str = "SELECT m.id, m.conversation_id, m.sender_id, m.receiver_id,
            m.content, m.is_read, m.created_at,
            s.username AS sender_username, r.username AS receiver_username
     FROM messages m
     JOIN users s ON s.id = m.sender_id
     JOIN users r ON r.id = m.receiver_id";

/// Repository for message persistence and read-state updates.
#[derive(Debug, Clone)]
pub struct MessageRepository {
    pool: PgPool,
}

impl MessageRepository {
    /// Create a new message repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persist a message and return it joined with both display names.
    ///
    /// Runs in a transaction that also bumps the conversation's
    /// `updated_at`, so inbox ordering follows message activity.
    pub async fn create(
        &self,
        conversation_id: ConversationId,
        sender_id: UserId,
        receiver_id: UserId,
        content: &str,
    ) -> AppResult<MessageWithParties> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::StoreUnavailable, "Failed to begin transaction", e)
        })?;

        let message = sqlx::query_as::<_, MessageWithParties>(
            "WITH inserted AS (
                 INSERT INTO messages (conversation_id, sender_id, receiver_id, content)
                 VALUES ($1, $2, $3, $4)
                 RETURNING *
             )
             SELECT i.id, i.conversation_id, i.sender_id, i.receiver_id,
                    i.content, i.is_read, i.created_at,
                    s.username AS sender_username, r.username AS receiver_username
             FROM inserted i
             JOIN users s ON s.id = i.sender_id
             JOIN users r ON r.id = i.receiver_id",
        )
        .bind(conversation_id)
        .bind(sender_id)
        .bind(receiver_id)
        .bind(content)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::StoreUnavailable, "Failed to create message", e)
        })?;

        sqlx::query("UPDATE conversations SET updated_at = NOW() WHERE id = $1")
            .bind(conversation_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::StoreUnavailable,
                    "Failed to bump conversation activity",
                    e,
                )
            })?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::StoreUnavailable, "Failed to commit message", e)
        })?;

        Ok(message)
    }

    /// Full history of a conversation, oldest first. `created_at` is the
    /// sole ordering authority.
    pub async fn history(&self, conversation_id: ConversationId) -> AppResult<Vec<MessageWithParties>> {
        sqlx::query_as::<_, MessageWithParties>(&format!(
            "{SELECT_WITH_PARTIES}
             WHERE m.conversation_id = $1
             ORDER BY m.created_at ASC"
        ))
        .bind(conversation_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::StoreUnavailable, "Failed to fetch history", e)
        })
    }

    /// Mark a message read, but only for its receiver. Returns `None`
    /// when the message does not exist or belongs to someone else.
    pub async fn mark_read(
        &self,
        message_id: MessageId,
        receiver_id: UserId,
    ) -> AppResult<Option<Message>> {
        sqlx::query_as::<_, Message>(
            "UPDATE messages SET is_read = TRUE
             WHERE id = $1 AND receiver_id = $2
             RETURNING *",
        )
        .bind(message_id)
        .bind(receiver_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::StoreUnavailable, "Failed to mark message read", e)
        })
    }

    /// Number of unread messages addressed to a user.
    pub async fn unread_count(&self, user_id: UserId) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM messages WHERE receiver_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::StoreUnavailable, "Failed to count unread", e)
        })
    }
}
