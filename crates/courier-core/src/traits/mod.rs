//! Trait seams between the delivery core and its collaborators.

pub mod store;

pub use store::DeliveryStore;
