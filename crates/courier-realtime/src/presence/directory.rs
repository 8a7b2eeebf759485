//! Presence directory: the authoritative identity-to-connection mapping.

use std::sync::Arc;

use dashmap::DashMap;

use courier_entity::UserId;

use crate::connection::{ConnectionHandle, ConnectionId};

/// Thread-safe map of every reachable identity's current connection.
///
/// Holds at most one handle per identity (single-session policy). Every
/// operation is a short in-memory map access; nothing here calls into the
/// store or the transport, so no directory guard is ever held across a
/// suspension point. The directory is process-scoped and starts empty on
/// every restart.
#[derive(Debug, Default)]
pub struct PresenceDirectory {
    entries: DashMap<UserId, Arc<ConnectionHandle>>,
}

impl PresenceDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Insert or replace the entry for the handle's user.
    ///
    /// Returns the displaced handle when the user was already registered
    /// (duplicate login). The displaced transport is left running: the
    /// directory entry, not the underlying socket, defines the current
    /// session.
    pub fn register(&self, handle: Arc<ConnectionHandle>) -> Option<Arc<ConnectionHandle>> {
        self.entries.insert(handle.user_id, handle)
    }

    /// Remove the entry for `user_id` only if it still points at
    /// `conn_id`.
    ///
    /// The equality check keeps a stale disconnect from a superseded
    /// session from clobbering a newer registration. Returns whether an
    /// entry was actually removed.
    pub fn unregister(&self, user_id: UserId, conn_id: ConnectionId) -> bool {
        self.entries
            .remove_if(&user_id, |_, handle| handle.id == conn_id)
            .is_some()
    }

    /// Current handle for a user, if reachable.
    pub fn lookup(&self, user_id: UserId) -> Option<Arc<ConnectionHandle>> {
        self.entries.get(&user_id).map(|entry| entry.value().clone())
    }

    /// Whether a user is currently reachable.
    pub fn is_online(&self, user_id: UserId) -> bool {
        self.entries.contains_key(&user_id)
    }

    /// Snapshot of currently registered user ids. No ordering guarantee;
    /// may be immediately stale under concurrent churn.
    pub fn list_online(&self) -> Vec<UserId> {
        self.entries.iter().map(|entry| *entry.key()).collect()
    }

    /// Snapshot of all current handles.
    pub fn handles(&self) -> Vec<Arc<ConnectionHandle>> {
        self.entries.iter().map(|entry| entry.value().clone()).collect()
    }

    /// Number of reachable identities.
    pub fn online_count(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn handle(user_id: UserId) -> Arc<ConnectionHandle> {
        let (tx, _rx) = mpsc::channel(8);
        Arc::new(ConnectionHandle::new(user_id, format!("user{user_id}"), tx))
    }

    #[test]
    fn test_register_then_lookup_then_unregister() {
        let directory = PresenceDirectory::new();
        let h = handle(1);

        assert!(directory.register(h.clone()).is_none());
        assert_eq!(directory.lookup(1).unwrap().id, h.id);
        assert!(directory.is_online(1));

        assert!(directory.unregister(1, h.id));
        assert!(directory.lookup(1).is_none());
        assert!(!directory.is_online(1));
    }

    #[test]
    fn test_duplicate_login_displaces_previous_handle() {
        let directory = PresenceDirectory::new();
        let first = handle(1);
        let second = handle(1);

        assert!(directory.register(first.clone()).is_none());
        let displaced = directory.register(second.clone()).unwrap();

        assert_eq!(displaced.id, first.id);
        assert_eq!(directory.lookup(1).unwrap().id, second.id);
        assert_eq!(directory.online_count(), 1);
    }

    #[test]
    fn test_stale_unregister_does_not_clobber_newer_session() {
        let directory = PresenceDirectory::new();
        let old = handle(1);
        let new = handle(1);

        directory.register(old.clone());
        directory.register(new.clone());

        // The superseded session disconnects late.
        assert!(!directory.unregister(1, old.id));
        assert_eq!(directory.lookup(1).unwrap().id, new.id);

        assert!(directory.unregister(1, new.id));
        assert!(directory.lookup(1).is_none());
    }

    #[test]
    fn test_list_online_snapshots_registered_ids() {
        let directory = PresenceDirectory::new();
        directory.register(handle(1));
        directory.register(handle(2));
        directory.register(handle(3));

        let mut online = directory.list_online();
        online.sort_unstable();
        assert_eq!(online, vec![1, 2, 3]);
        assert_eq!(directory.online_count(), 3);
    }
}
