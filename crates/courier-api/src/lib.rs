//! # courier-api
//!
//! HTTP and WebSocket surface for Courier, built on Axum.
//!
//! This crate wires the realtime engine and repositories into routable
//! handlers: REST endpoints for identity bootstrap, history, and read
//! receipts, plus the `/ws` upgrade that feeds the presence directory.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use router::build_router;
pub use state::AppState;
