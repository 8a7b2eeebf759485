//! Individual realtime connection handle.

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use uuid::Uuid;

use courier_core::error::AppError;
use courier_core::result::AppResult;
use courier_entity::UserId;

use crate::events::ServerEvent;

/// Unique connection identifier.
pub type ConnectionId = Uuid;

/// A handle to a single live connection.
///
/// The presence directory stores these as opaque capabilities: holding a
/// handle lets you push events at the connection and nothing more. The
/// transport's lifetime is owned elsewhere; once the socket is gone,
/// pushes fail and get dropped.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Unique connection ID; its string form doubles as the durable
    /// `socket_ref` mirror value.
    pub id: ConnectionId,
    /// User who owns this connection.
    pub user_id: UserId,
    /// Display name (cached for broadcasts).
    pub username: String,
    /// Sender feeding the connection's outbound forwarder.
    sender: mpsc::Sender<ServerEvent>,
    /// When the connection was established.
    pub connected_at: DateTime<Utc>,
}

impl ConnectionHandle {
    /// Create a new connection handle.
    pub fn new(user_id: UserId, username: String, sender: mpsc::Sender<ServerEvent>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            username,
            sender,
            connected_at: Utc::now(),
        }
    }

    /// Push an event at this connection without waiting.
    ///
    /// Fails with `PushFailed` when the client's buffer is full or its
    /// forwarder has shut down. Callers treat both as non-fatal: the event
    /// is lost, the durable record is not.
    pub fn push(&self, event: ServerEvent) -> AppResult<()> {
        match self.sender.try_send(event) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(_)) => Err(AppError::push_failed(format!(
                "Connection {} outbound buffer full",
                self.id
            ))),
            Err(mpsc::error::TrySendError::Closed(_)) => {
                Err(AppError::push_failed(format!("Connection {} closed", self.id)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_core::error::ErrorKind;

    #[test]
    fn test_push_reaches_receiver() {
        let (tx, mut rx) = mpsc::channel(4);
        let handle = ConnectionHandle::new(1, "alice".into(), tx);

        handle.push(ServerEvent::error("boom")).unwrap();

        let event = rx.try_recv().unwrap();
        assert!(matches!(event, ServerEvent::Error { .. }));
    }

    #[test]
    fn test_push_to_closed_channel_fails() {
        let (tx, rx) = mpsc::channel(4);
        drop(rx);
        let handle = ConnectionHandle::new(1, "alice".into(), tx);

        let err = handle.push(ServerEvent::error("boom")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::PushFailed);
    }

    #[test]
    fn test_push_to_full_buffer_fails_without_blocking() {
        let (tx, _rx) = mpsc::channel(1);
        let handle = ConnectionHandle::new(1, "alice".into(), tx);

        handle.push(ServerEvent::error("first")).unwrap();
        let err = handle.push(ServerEvent::error("second")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::PushFailed);
    }
}
