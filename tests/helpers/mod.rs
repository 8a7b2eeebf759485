//! Shared test helpers for integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::Utc;
use serde_json::Value;
use tower::ServiceExt;

use courier_api::AppState;
use courier_core::config::AppConfig;
use courier_core::error::AppError;
use courier_core::result::AppResult;
use courier_core::traits::DeliveryStore;
use courier_entity::{
    Conversation, ConversationId, ConversationKey, MessageWithParties, User, UserId,
};
use courier_realtime::{RealtimeEngine, ServerEvent};

/// Test application over a lazy pool.
///
/// The pool never connects unless a handler actually runs a query, so
/// routing, extraction, and error-mapping tests need no live database.
pub struct TestApp {
    /// The Axum router for making test requests.
    pub router: Router,
    /// Application config backing the router.
    pub config: AppConfig,
}

/// Parsed response from a test request.
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestApp {
    /// Builds the app with default configuration and a lazy pool.
    pub fn new() -> Self {
        let config = AppConfig::default();
        let db = courier_database::DatabasePool::connect_lazy(&config.database)
            .expect("lazy pool construction cannot fail");

        let state = AppState::new(Arc::new(config.clone()), db.pool().clone());
        let router = courier_api::build_router(state);

        Self { router, config }
    }

    /// Issues a request and parses the JSON body (empty object when the
    /// body is not JSON).
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);

        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .expect("request construction"),
            None => builder.body(Body::empty()).expect("request construction"),
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router never errors");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body read");
        let body = serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::Object(Default::default()));

        TestResponse { status, body }
    }

    /// Issues a WebSocket handshake request with proper upgrade headers
    /// so refusal happens in the handler, not the upgrade extractor.
    pub async fn ws_handshake(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .header("connection", "upgrade")
            .header("upgrade", "websocket")
            .header("sec-websocket-version", "13")
            .header("sec-websocket-key", "dGhlIHNhbXBsZSBub25jZQ==")
            .body(Body::empty())
            .expect("request construction");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router never errors");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body read");
        let body = serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::Object(Default::default()));

        TestResponse { status, body }
    }
}

/// In-memory [`DeliveryStore`] for exercising the realtime engine
/// without PostgreSQL.
///
/// A single mutex per table serializes find-or-create, which satisfies
/// the trait's atomicity contract the same way the database's unique
/// constraint does.
pub struct MemoryStore {
    users: Mutex<Vec<User>>,
    conversations: Mutex<Vec<Conversation>>,
    messages: Mutex<Vec<MessageWithParties>>,
    transitions: Mutex<Vec<(UserId, bool, Option<String>)>>,
    next_conversation_id: AtomicI64,
    next_message_id: AtomicI64,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    /// Builds a store seeded with the given users, all offline.
    pub fn with_users(seed: &[(UserId, &str)]) -> Self {
        let users = seed
            .iter()
            .map(|(id, name)| User {
                id: *id,
                username: name.to_string(),
                is_online: false,
                socket_ref: None,
                last_seen: None,
                created_at: Utc::now(),
            })
            .collect();

        Self {
            users: Mutex::new(users),
            conversations: Mutex::new(Vec::new()),
            messages: Mutex::new(Vec::new()),
            transitions: Mutex::new(Vec::new()),
            next_conversation_id: AtomicI64::new(1),
            next_message_id: AtomicI64::new(1),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Makes subsequent conversation/message writes fail with
    /// `StoreUnavailable`.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn conversation_count(&self) -> usize {
        self.conversations.lock().unwrap().len()
    }

    pub fn conversations(&self) -> Vec<Conversation> {
        self.conversations.lock().unwrap().clone()
    }

    pub fn message_count(&self) -> usize {
        self.messages.lock().unwrap().len()
    }

    pub fn messages(&self) -> Vec<MessageWithParties> {
        self.messages.lock().unwrap().clone()
    }

    /// Recorded presence mirror writes, in order.
    pub fn transitions(&self) -> Vec<(UserId, bool, Option<String>)> {
        self.transitions.lock().unwrap().clone()
    }
}

#[async_trait]
impl DeliveryStore for MemoryStore {
    async fn find_user(&self, id: UserId) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }

    async fn find_user_by_name(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_or_create_conversation(&self, key: ConversationKey) -> AppResult<Conversation> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::store_unavailable("simulated store outage"));
        }

        let mut conversations = self.conversations.lock().unwrap();
        if let Some(existing) = conversations
            .iter()
            .find(|c| c.user_low_id == key.low() && c.user_high_id == key.high())
        {
            return Ok(existing.clone());
        }

        let now = Utc::now();
        let conversation = Conversation {
            id: self.next_conversation_id.fetch_add(1, Ordering::SeqCst),
            user_low_id: key.low(),
            user_high_id: key.high(),
            created_at: now,
            updated_at: now,
        };
        conversations.push(conversation.clone());
        Ok(conversation)
    }

    async fn create_message(
        &self,
        conversation_id: ConversationId,
        sender_id: UserId,
        receiver_id: UserId,
        content: &str,
    ) -> AppResult<MessageWithParties> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::store_unavailable("simulated store outage"));
        }

        let (sender_username, receiver_username) = {
            let users = self.users.lock().unwrap();
            let name_of = |id: UserId| {
                users
                    .iter()
                    .find(|u| u.id == id)
                    .map(|u| u.username.clone())
                    .ok_or_else(|| AppError::internal(format!("unknown party {id}")))
            };
            (name_of(sender_id)?, name_of(receiver_id)?)
        };

        let message = MessageWithParties {
            id: self.next_message_id.fetch_add(1, Ordering::SeqCst),
            conversation_id,
            sender_id,
            receiver_id,
            content: content.to_string(),
            read: false,
            created_at: Utc::now(),
            sender_username,
            receiver_username,
        };
        self.messages.lock().unwrap().push(message.clone());
        Ok(message)
    }

    async fn update_presence_mirror(
        &self,
        user_id: UserId,
        online: bool,
        connection_ref: Option<&str>,
    ) -> AppResult<()> {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.id == user_id) {
            user.is_online = online;
            user.socket_ref = connection_ref.map(str::to_string);
            user.last_seen = Some(Utc::now());
        }
        self.transitions
            .lock()
            .unwrap()
            .push((user_id, online, connection_ref.map(str::to_string)));
        Ok(())
    }
}

/// Engine over a fresh [`MemoryStore`] seeded with the given users.
pub fn engine_with_users(seed: &[(UserId, &str)]) -> (RealtimeEngine, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::with_users(seed));
    let config = courier_core::config::realtime::RealtimeConfig::default();
    let engine = RealtimeEngine::new(&config, store.clone());
    (engine, store)
}

/// Drains every event currently buffered on a connection's receiver.
pub fn drain_events(rx: &mut tokio::sync::mpsc::Receiver<ServerEvent>) -> Vec<ServerEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
