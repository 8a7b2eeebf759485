//! Message send, history, and read-receipt handlers.

use axum::extract::{Path, State};
use axum::Json;

use courier_core::error::AppError;
use courier_entity::{Message, MessageId, UserId};

use crate::dto::request::SendMessageRequest;
use crate::dto::response::{ApiResponse, HistoryResponse, SendMessageResponse, UnreadCountResponse};
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/messages/send
///
/// Same pipeline as the WebSocket `message:send` event: the delivery
/// router validates, resolves the conversation, persists, and pushes to
/// any live connections.
pub async fn send_message(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<SendMessageRequest>,
) -> ApiResult<Json<ApiResponse<SendMessageResponse>>> {
    let outcome = state
        .engine
        .router()
        .send(auth.user_id, payload.receiver_id, &payload.content)
        .await?;

    Ok(Json(ApiResponse::ok(outcome.into())))
}

/// GET /api/messages/history/{other_user_id}
///
/// Returns the full conversation with one other user, creating the
/// conversation row lazily so a first visit yields an empty history
/// rather than a 404.
pub async fn history(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(other_user_id): Path<UserId>,
) -> ApiResult<Json<ApiResponse<HistoryResponse>>> {
    if state.user_repo.find_by_id(other_user_id).await?.is_none() {
        return Err(AppError::unknown_receiver(format!(
            "User {other_user_id} does not exist"
        ))
        .into());
    }

    let conversation = state
        .engine
        .router()
        .resolver()
        .resolve(auth.user_id, other_user_id)
        .await?;
    let messages = state.message_repo.history(conversation.id).await?;

    Ok(Json(ApiResponse::ok(HistoryResponse {
        conversation,
        messages,
    })))
}

/// PATCH /api/messages/{message_id}/read
///
/// Marks a message as read. Only the receiver may do this; a message
/// that is not addressed to the caller reads as absent.
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(message_id): Path<MessageId>,
) -> ApiResult<Json<ApiResponse<Message>>> {
    let message = state
        .message_repo
        .mark_read(message_id, auth.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Message not found or not addressed to you"))?;

    Ok(Json(ApiResponse::ok(message)))
}

/// GET /api/messages/unread/count
pub async fn unread_count(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<UnreadCountResponse>>> {
    let unread_count = state.message_repo.unread_count(auth.user_id).await?;

    Ok(Json(ApiResponse::ok(UnreadCountResponse { unread_count })))
}
