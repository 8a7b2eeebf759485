//! Realtime engine: wires the presence directory, connection lifecycle,
//! and delivery router over a shared store.

use std::sync::Arc;

use courier_core::config::realtime::RealtimeConfig;
use courier_core::traits::DeliveryStore;

use crate::connection::ConnectionManager;
use crate::delivery::DeliveryRouter;
use crate::presence::PresenceDirectory;

/// Aggregates the realtime components behind one constructor.
///
/// There is no ambient global: the engine owns the single directory
/// instance and hands explicit references to every component that needs
/// it.
#[derive(Clone)]
pub struct RealtimeEngine {
    directory: Arc<PresenceDirectory>,
    manager: Arc<ConnectionManager>,
    router: Arc<DeliveryRouter>,
}

impl RealtimeEngine {
    /// Builds the engine over a store.
    pub fn new(config: &RealtimeConfig, store: Arc<dyn DeliveryStore>) -> Self {
        let directory = Arc::new(PresenceDirectory::new());
        let manager = Arc::new(ConnectionManager::new(
            directory.clone(),
            store.clone(),
            config.channel_buffer_size,
        ));
        let router = Arc::new(DeliveryRouter::new(store, directory.clone()));

        Self {
            directory,
            manager,
            router,
        }
    }

    /// The presence directory.
    pub fn directory(&self) -> &Arc<PresenceDirectory> {
        &self.directory
    }

    /// The connection lifecycle manager.
    pub fn manager(&self) -> &Arc<ConnectionManager> {
        &self.manager
    }

    /// The message delivery router.
    pub fn router(&self) -> &Arc<DeliveryRouter> {
        &self.router
    }
}
