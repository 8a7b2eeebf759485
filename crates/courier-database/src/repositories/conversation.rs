//! Conversation repository implementation.

use std::collections::HashMap;

use sqlx::PgPool;

use courier_core::error::{AppError, ErrorKind};
use courier_core::result::AppResult;
use courier_entity::{
    Conversation, ConversationKey, ConversationSummary, Message, User, UserId,
};

/// Repository for conversation lookup, creation, and inbox listings.
#[derive(Debug, Clone)]
pub struct ConversationRepository {
    pool: PgPool,
}

impl ConversationRepository {
    /// Create a new conversation repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find the conversation for a canonical pair, if it exists.
    pub async fn find_by_key(&self, key: ConversationKey) -> AppResult<Option<Conversation>> {
        sqlx::query_as::<_, Conversation>(
            "SELECT * FROM conversations WHERE user_low_id = $1 AND user_high_id = $2",
        )
        .bind(key.low())
        .bind(key.high())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::StoreUnavailable, "Failed to find conversation", e)
        })
    }

    /// Fetch the conversation for `key`, creating it if absent.
    ///
    /// The insert is conditional on the `(user_low_id, user_high_id)`
    /// unique constraint, so concurrent first contact between the same
    /// pair yields exactly one row; the loser of the race re-reads the
    /// winner's row.
    pub async fn find_or_create(&self, key: ConversationKey) -> AppResult<Conversation> {
        if let Some(existing) = self.find_by_key(key).await? {
            return Ok(existing);
        }

        let inserted = sqlx::query_as::<_, Conversation>(
            "INSERT INTO conversations (user_low_id, user_high_id) VALUES ($1, $2)
             ON CONFLICT (user_low_id, user_high_id) DO NOTHING
             RETURNING *",
        )
        .bind(key.low())
        .bind(key.high())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::StoreUnavailable,
                "Failed to create conversation",
                e,
            )
        })?;

        match inserted {
            Some(conversation) => Ok(conversation),
            None => self.find_by_key(key).await?.ok_or_else(|| {
                AppError::store_unavailable("Conversation vanished after conflicting insert")
            }),
        }
    }

    /// A user's conversations, most recently active first, each with the
    /// other party and the last message.
    pub async fn list_summaries(&self, user_id: UserId) -> AppResult<Vec<ConversationSummary>> {
        let conversations = sqlx::query_as::<_, Conversation>(
            "SELECT * FROM conversations
             WHERE user_low_id = $1 OR user_high_id = $1
             ORDER BY updated_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::StoreUnavailable, "Failed to list conversations", e)
        })?;

        if conversations.is_empty() {
            return Ok(Vec::new());
        }

        let other_ids: Vec<UserId> = conversations
            .iter()
            .map(|c| c.other_participant(user_id))
            .collect();
        let conversation_ids: Vec<i64> = conversations.iter().map(|c| c.id).collect();

        let others: HashMap<UserId, User> =
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ANY($1)")
                .bind(&other_ids)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(
                        ErrorKind::StoreUnavailable,
                        "Failed to fetch conversation parties",
                        e,
                    )
                })?
                .into_iter()
                .map(|u| (u.id, u))
                .collect();

        let last_messages: HashMap<i64, Message> = sqlx::query_as::<_, Message>(
            "SELECT DISTINCT ON (conversation_id) *
             FROM messages
             WHERE conversation_id = ANY($1)
             ORDER BY conversation_id, created_at DESC",
        )
        .bind(&conversation_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::StoreUnavailable, "Failed to fetch last messages", e)
        })?
        .into_iter()
        .map(|m| (m.conversation_id, m))
        .collect();

        let summaries = conversations
            .into_iter()
            .filter_map(|c| {
                let other = others.get(&c.other_participant(user_id))?;
                Some(ConversationSummary {
                    conversation_id: c.id,
                    other_user: other.summary(),
                    last_message: last_messages.get(&c.id).cloned(),
                    updated_at: c.updated_at,
                })
            })
            .collect();

        Ok(summaries)
    }
}
