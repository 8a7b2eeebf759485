//! # courier-realtime
//!
//! The presence-and-delivery core: connection authentication and
//! lifecycle, the online-identity directory, conversation resolution, and
//! the message delivery router. Everything here reaches persistence only
//! through the [`DeliveryStore`](courier_core::traits::DeliveryStore)
//! trait, so the core carries no database dependency.

pub mod connection;
pub mod delivery;
pub mod engine;
pub mod events;
pub mod presence;

pub use connection::{
    AuthenticatedClient, ConnectionAuthenticator, ConnectionHandle, ConnectionId,
    ConnectionManager,
};
pub use delivery::{ConversationResolver, DeliveryOutcome, DeliveryRouter};
pub use engine::RealtimeEngine;
pub use events::{ClientEvent, ServerEvent, UserPresence};
pub use presence::PresenceDirectory;
