//! Authentication extractors.
//!
//! [`AuthUser`] pulls the `Authorization: Bearer` header for REST
//! handlers; [`WsAuth`] pulls the `token` query parameter for the
//! WebSocket handshake. Both validate before any handler code runs, so
//! an unauthenticated request is refused without side effects.

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::Deserialize;

use courier_core::error::AppError;
use courier_entity::UserId;
use courier_realtime::AuthenticatedClient;

use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated identity extracted from the bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Verified user ID from the token subject.
    pub user_id: UserId,
    /// Display name captured at token issuance.
    pub username: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::missing_credential("Missing Authorization header"))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::missing_credential("Expected a Bearer token"))?;

        let claims = state.jwt_decoder.decode(token)?;

        Ok(AuthUser {
            user_id: claims.user_id(),
            username: claims.username,
        })
    }
}

#[derive(Debug, Deserialize)]
struct WsQuery {
    token: Option<String>,
}

/// The authenticated identity for a WebSocket handshake.
///
/// Declared before `WebSocketUpgrade` in the handler signature, so a
/// missing or invalid token refuses the handshake before the protocol
/// switch is even considered.
#[derive(Debug, Clone)]
pub struct WsAuth {
    /// Verified identity bound to the connection for its lifetime.
    pub client: AuthenticatedClient,
}

impl FromRequestParts<AppState> for WsAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let query: Query<WsQuery> = Query::try_from_uri(&parts.uri)
            .map_err(|_| AppError::missing_credential("Malformed handshake query"))?;

        let client = state.authenticator.authenticate(query.token.as_deref())?;

        Ok(WsAuth { client })
    }
}
