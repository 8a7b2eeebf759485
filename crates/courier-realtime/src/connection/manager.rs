//! Connection lifecycle: registration, deregistration, presence broadcasts.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{info, warn};

use courier_core::traits::DeliveryStore;
use courier_entity::UserId;

use crate::events::ServerEvent;
use crate::presence::PresenceDirectory;

use super::handle::ConnectionHandle;

/// Drives connection lifecycle around the presence directory.
///
/// Directory mutations stay short and synchronous; the mirror write and
/// the presence broadcast both happen after the map operation completes,
/// never under it.
pub struct ConnectionManager {
    directory: Arc<PresenceDirectory>,
    store: Arc<dyn DeliveryStore>,
    buffer_size: usize,
}

impl ConnectionManager {
    /// Creates a new connection manager.
    pub fn new(
        directory: Arc<PresenceDirectory>,
        store: Arc<dyn DeliveryStore>,
        buffer_size: usize,
    ) -> Self {
        Self {
            directory,
            store,
            buffer_size,
        }
    }

    /// Registers an authenticated identity.
    ///
    /// Creates the outbound channel and handle, installs the handle in
    /// the directory (displacing any previous session without closing its
    /// transport), mirrors the transition to the store, and broadcasts
    /// `user:online` to every other reachable identity. The returned
    /// receiver feeds the connection's outbound forwarder.
    pub async fn connect(
        &self,
        user_id: UserId,
        username: &str,
    ) -> (Arc<ConnectionHandle>, mpsc::Receiver<ServerEvent>) {
        let (tx, rx) = mpsc::channel(self.buffer_size);
        let handle = Arc::new(ConnectionHandle::new(user_id, username.to_string(), tx));

        if let Some(displaced) = self.directory.register(handle.clone()) {
            warn!(
                user_id,
                old_conn = %displaced.id,
                new_conn = %handle.id,
                "Existing session displaced by new registration"
            );
        }

        let socket_ref = handle.id.to_string();
        if let Err(e) = self
            .store
            .update_presence_mirror(user_id, true, Some(&socket_ref))
            .await
        {
            warn!(user_id, error = %e, "Failed to mirror online transition");
        }

        self.broadcast_except(user_id, ServerEvent::user_online(user_id, handle.username.clone()));

        info!(
            conn_id = %handle.id,
            user_id,
            username = %handle.username,
            "Connection registered"
        );

        (handle, rx)
    }

    /// Deregisters a connection.
    ///
    /// Only the connection that still owns the directory entry triggers
    /// the offline transition. A late disconnect from a displaced session
    /// is a no-op: no mirror write, no broadcast.
    pub async fn disconnect(&self, handle: &ConnectionHandle) {
        if !self.directory.unregister(handle.user_id, handle.id) {
            info!(
                conn_id = %handle.id,
                user_id = handle.user_id,
                "Stale disconnect ignored"
            );
            return;
        }

        if let Err(e) = self
            .store
            .update_presence_mirror(handle.user_id, false, None)
            .await
        {
            warn!(user_id = handle.user_id, error = %e, "Failed to mirror offline transition");
        }

        self.broadcast_except(
            handle.user_id,
            ServerEvent::user_offline(handle.user_id, handle.username.clone()),
        );

        info!(
            conn_id = %handle.id,
            user_id = handle.user_id,
            "Connection unregistered"
        );
    }

    /// Fire-and-forget push of `event` to every identity except `skip`.
    fn broadcast_except(&self, skip: UserId, event: ServerEvent) {
        for other in self.directory.handles() {
            if other.user_id == skip {
                continue;
            }
            if let Err(e) = other.push(event.clone()) {
                warn!(conn_id = %other.id, error = %e, "Presence broadcast dropped");
            }
        }
    }
}
