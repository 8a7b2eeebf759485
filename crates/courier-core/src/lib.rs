//! # courier-core
//!
//! Core crate for Courier. Contains the unified error system, the shared
//! result alias, configuration schemas, and the durable-store trait the
//! delivery core is written against.
//!
//! The only internal dependency is `courier-entity`.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
