//! User repository implementation.

use sqlx::PgPool;

use courier_core::error::{AppError, ErrorKind};
use courier_core::result::AppResult;
use courier_entity::{User, UserId};

/// Repository for user lookup, bootstrap, and presence-mirror writes.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by primary key.
    pub async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::StoreUnavailable, "Failed to find user by id", e)
            })
    }

    /// Find a user by display name (case-insensitive).
    pub async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(username) = LOWER($1)")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::StoreUnavailable,
                    "Failed to find user by username",
                    e,
                )
            })
    }

    /// Fetch the user with the given normalized name, creating the row if
    /// it does not exist yet. Safe under concurrent bootstrap of the same
    /// name: the insert is conditional on the unique name and the loser
    /// re-reads the winner's row.
    pub async fn create_or_fetch(&self, username: &str) -> AppResult<User> {
        let normalized = User::normalize_name(username);

        let inserted = sqlx::query_as::<_, User>(
            "INSERT INTO users (username) VALUES ($1)
             ON CONFLICT (username) DO NOTHING
             RETURNING *",
        )
        .bind(&normalized)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::StoreUnavailable, "Failed to create user", e)
        })?;

        match inserted {
            Some(user) => Ok(user),
            None => self.find_by_username(&normalized).await?.ok_or_else(|| {
                AppError::store_unavailable("User vanished after conflicting insert")
            }),
        }
    }

    /// List all users, alphabetically.
    pub async fn list_all(&self) -> AppResult<Vec<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY username")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::StoreUnavailable, "Failed to list users", e)
            })
    }

    /// Fetch a batch of users by id.
    pub async fn find_by_ids(&self, ids: &[UserId]) -> AppResult<Vec<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ANY($1) ORDER BY username")
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::StoreUnavailable, "Failed to fetch users", e)
            })
    }

    /// Write the durable presence mirror for a user.
    pub async fn set_presence(
        &self,
        id: UserId,
        online: bool,
        socket_ref: Option<&str>,
    ) -> AppResult<()> {
        sqlx::query(
            "UPDATE users SET is_online = $2, socket_ref = $3, last_seen = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(online)
        .bind(socket_ref)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::StoreUnavailable,
                "Failed to update presence mirror",
                e,
            )
        })?;
        Ok(())
    }
}
