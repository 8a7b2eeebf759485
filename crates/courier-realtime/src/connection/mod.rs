//! Connection lifecycle: handles, authentication, registration.

pub mod authenticator;
pub mod handle;
pub mod manager;

pub use authenticator::{AuthenticatedClient, ConnectionAuthenticator};
pub use handle::{ConnectionHandle, ConnectionId};
pub use manager::ConnectionManager;
