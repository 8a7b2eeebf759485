//! Route definitions for the Courier HTTP API.

use axum::http::HeaderValue;
use axum::routing::{get, patch, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Builds the complete router: REST under `/api`, the realtime upgrade
/// at `/ws`, CORS and request tracing layered over both.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(user_routes())
        .merge(message_routes())
        .merge(conversation_routes())
        .merge(health_routes());

    let cors = build_cors_layer(&state);

    Router::new()
        .nest("/api", api_routes)
        .route("/ws", get(handlers::ws::ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/create", post(handlers::user::create_user))
        .route("/users", get(handlers::user::list_users))
        .route("/users/online", get(handlers::user::online_users))
}

fn message_routes() -> Router<AppState> {
    Router::new()
        .route("/messages/send", post(handlers::message::send_message))
        .route(
            "/messages/history/{other_user_id}",
            get(handlers::message::history),
        )
        .route(
            "/messages/{message_id}/read",
            patch(handlers::message::mark_read),
        )
        .route("/messages/unread/count", get(handlers::message::unread_count))
}

fn conversation_routes() -> Router<AppState> {
    Router::new().route(
        "/conversations",
        get(handlers::conversation::list_conversations),
    )
}

fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/detailed", get(handlers::health::health_detailed))
}

/// CORS layer from configuration. A literal `*` entry means any origin;
/// otherwise only the listed origins are allowed.
fn build_cors_layer(state: &AppState) -> CorsLayer {
    let origins = &state.config.server.cors.allowed_origins;

    if origins.iter().any(|origin| origin == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(parsed)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
