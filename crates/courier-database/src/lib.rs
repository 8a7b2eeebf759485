//! # courier-database
//!
//! PostgreSQL connection management, repository implementations, and the
//! concrete [`DeliveryStore`](courier_core::traits::DeliveryStore) backing
//! the delivery core.

pub mod connection;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use store::PgDeliveryStore;
