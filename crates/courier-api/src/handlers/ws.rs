//! WebSocket upgrade and per-connection event loop.
//!
//! Authentication happens before the upgrade; a refused handshake never
//! touches the presence directory. After the upgrade the connection runs
//! two halves: an outbound forwarder draining the engine's channel onto
//! the socket, and an inbound loop dispatching client events. Cleanup
//! deregisters exactly once regardless of how the connection ends.

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tracing::{info, warn};

use courier_core::error::AppError;
use courier_core::result::AppResult;
use courier_realtime::{
    AuthenticatedClient, ClientEvent, ConnectionHandle, ServerEvent, UserPresence,
};

use crate::extractors::WsAuth;
use crate::state::AppState;

/// GET /ws?token={jwt}
///
/// [`WsAuth`] has already verified the credential by the time this
/// handler runs; a refused handshake never touches the directory.
pub async fn ws_handler(
    State(state): State<AppState>,
    auth: WsAuth,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_upgrade(move |socket| handle_ws_connection(state, auth.client, socket))
}

async fn handle_ws_connection(state: AppState, client: AuthenticatedClient, socket: WebSocket) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    let (handle, mut outbound_rx) = state
        .engine
        .manager()
        .connect(client.user_id, &client.username)
        .await;

    // Outbound forwarder: engine events become JSON text frames.
    let outbound_task = tokio::spawn(async move {
        while let Some(event) = outbound_rx.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(e) => {
                    warn!(error = %e, "Dropping unserializable outbound event");
                    continue;
                }
            };
            if ws_tx.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(result) = ws_rx.next().await {
        match result {
            Ok(Message::Text(text)) => {
                dispatch_client_event(&state, &handle, text.as_str()).await;
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                warn!(conn_id = %handle.id, error = %e, "WebSocket transport error");
                break;
            }
        }
    }

    outbound_task.abort();
    state.engine.manager().disconnect(&handle).await;

    info!(
        conn_id = %handle.id,
        user_id = client.user_id,
        "WebSocket connection closed"
    );
}

/// Parses and routes one inbound frame.
///
/// Failures become `error` events on this connection; the connection
/// itself stays open.
async fn dispatch_client_event(state: &AppState, handle: &ConnectionHandle, raw: &str) {
    let event: ClientEvent = match serde_json::from_str(raw) {
        Ok(event) => event,
        Err(e) => {
            push_or_log(handle, ServerEvent::error(format!("Unparseable event: {e}")));
            return;
        }
    };

    if let Err(e) = handle_client_event(state, handle, event).await {
        warn!(
            conn_id = %handle.id,
            user_id = handle.user_id,
            error = %e,
            "Realtime request failed"
        );
        push_or_log(handle, ServerEvent::error(e.message.clone()));
    }
}

async fn handle_client_event(
    state: &AppState,
    handle: &ConnectionHandle,
    event: ClientEvent,
) -> AppResult<()> {
    match event {
        ClientEvent::MessageSend {
            receiver_id,
            content,
        } => {
            // The router pushes message:sent and message:receive itself.
            state
                .engine
                .router()
                .send(handle.user_id, receiver_id, &content)
                .await?;
        }
        ClientEvent::ChatHistory { other_user_id } => {
            let conversation = state
                .engine
                .router()
                .resolver()
                .resolve(handle.user_id, other_user_id)
                .await?;
            let messages = state.message_repo.history(conversation.id).await?;
            push_or_log(handle, ServerEvent::ChatHistoryResponse { messages });
        }
        ClientEvent::MessageRead { message_id } => {
            state
                .message_repo
                .mark_read(message_id, handle.user_id)
                .await?
                .ok_or_else(|| AppError::not_found("Message not found or not addressed to you"))?;
            push_or_log(handle, ServerEvent::MessageReadSuccess { message_id });
        }
        ClientEvent::OnlineUsers => {
            let online_ids = state.engine.directory().list_online();
            let users = state
                .user_repo
                .find_by_ids(&online_ids)
                .await?
                .into_iter()
                .map(|user| UserPresence {
                    id: user.id,
                    username: user.username,
                    online: true,
                    last_seen: user.last_seen,
                })
                .collect();
            push_or_log(handle, ServerEvent::OnlineUsersResponse { users });
        }
    }

    Ok(())
}

/// Push to this connection, downgrading failure to a log line.
fn push_or_log(handle: &ConnectionHandle, event: ServerEvent) {
    if let Err(e) = handle.push(event) {
        warn!(conn_id = %handle.id, error = %e, "Outbound event dropped");
    }
}
