//! User bootstrap and listing handlers.

use axum::extract::State;
use axum::Json;
use tracing::info;
use validator::Validate;

use courier_core::error::AppError;
use courier_entity::User;

use crate::dto::request::CreateUserRequest;
use crate::dto::response::{ApiResponse, CreateUserResponse, UserResponse};
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/users/create
///
/// Passwordless bootstrap: creates the identity if the name is new,
/// fetches it otherwise, and issues a token either way.
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> ApiResult<Json<ApiResponse<CreateUserResponse>>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let name = User::normalize_name(&payload.username);
    if name.is_empty() {
        return Err(AppError::validation("Username must not be blank").into());
    }

    let user = state.user_repo.create_or_fetch(&name).await?;
    let issued = state.jwt_encoder.issue(user.id, &user.username)?;

    info!(user_id = user.id, username = %user.username, "Identity bootstrapped");

    Ok(Json(ApiResponse::ok(CreateUserResponse {
        user: user.into(),
        token: issued.token,
        expires_at: issued.expires_at,
    })))
}

/// GET /api/users
///
/// Lists every registered identity.
pub async fn list_users(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<UserResponse>>>> {
    let users = state.user_repo.list_all().await?;
    let users = users.into_iter().map(UserResponse::from).collect();

    Ok(Json(ApiResponse::ok(users)))
}

/// GET /api/users/online
///
/// Lists identities with a live connection. Reads the in-process
/// presence directory rather than the durable mirror, so the answer
/// matches what the delivery router would see.
pub async fn online_users(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<UserResponse>>>> {
    let online_ids = state.engine.directory().list_online();
    let users = state.user_repo.find_by_ids(&online_ids).await?;

    let users = users
        .into_iter()
        .map(|user| UserResponse {
            is_online: true,
            ..UserResponse::from(user)
        })
        .collect();

    Ok(Json(ApiResponse::ok(users)))
}
