//! Conversation listing handler.

use axum::extract::State;
use axum::Json;

use courier_entity::ConversationSummary;

use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/conversations
///
/// Lists the caller's conversations, most recently active first, each
/// with the other participant and the latest message.
pub async fn list_conversations(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<ConversationSummary>>>> {
    let summaries = state.conversation_repo.list_summaries(auth.user_id).await?;

    Ok(Json(ApiResponse::ok(summaries)))
}
