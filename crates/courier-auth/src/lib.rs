//! # courier-auth
//!
//! Identity token issuance and verification. Tokens are HS256 JWTs issued
//! once at identity bootstrap and presented on every REST request and
//! realtime handshake.

pub mod jwt;

pub use jwt::claims::Claims;
pub use jwt::decoder::JwtDecoder;
pub use jwt::encoder::{IssuedToken, JwtEncoder};
