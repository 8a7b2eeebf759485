//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use courier_auth::{JwtDecoder, JwtEncoder};
use courier_core::config::AppConfig;
use courier_core::traits::DeliveryStore;
use courier_database::repositories::{ConversationRepository, MessageRepository, UserRepository};
use courier_database::PgDeliveryStore;
use courier_realtime::{ConnectionAuthenticator, RealtimeEngine};

/// Shared dependencies handed to every handler via `State<AppState>`.
///
/// Everything heavyweight is behind an `Arc` so the state clones cheaply
/// per request and per connection task.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool.
    pub db_pool: PgPool,
    /// Token issuer for the bootstrap endpoint.
    pub jwt_encoder: Arc<JwtEncoder>,
    /// Token validator shared with the realtime authenticator.
    pub jwt_decoder: Arc<JwtDecoder>,
    /// Handshake credential gate for `/ws`.
    pub authenticator: ConnectionAuthenticator,
    /// Presence directory, connection manager, and delivery router.
    pub engine: RealtimeEngine,
    /// User lookups and creation.
    pub user_repo: Arc<UserRepository>,
    /// Conversation summaries.
    pub conversation_repo: Arc<ConversationRepository>,
    /// Message history and read receipts.
    pub message_repo: Arc<MessageRepository>,
}

impl AppState {
    /// Builds the full dependency graph over an established pool.
    pub fn new(config: Arc<AppConfig>, pool: PgPool) -> Self {
        let jwt_encoder = Arc::new(JwtEncoder::new(&config.auth));
        let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));
        let authenticator = ConnectionAuthenticator::new(jwt_decoder.clone());

        let store: Arc<dyn DeliveryStore> = Arc::new(PgDeliveryStore::new(pool.clone()));
        let engine = RealtimeEngine::new(&config.realtime, store);

        Self {
            config,
            db_pool: pool.clone(),
            jwt_encoder,
            jwt_decoder,
            authenticator,
            engine,
            user_repo: Arc::new(UserRepository::new(pool.clone())),
            conversation_repo: Arc::new(ConversationRepository::new(pool.clone())),
            message_repo: Arc::new(MessageRepository::new(pool)),
        }
    }
}
