//! HTTP and WebSocket request handlers.

pub mod conversation;
pub mod health;
pub mod message;
pub mod user;
pub mod ws;
