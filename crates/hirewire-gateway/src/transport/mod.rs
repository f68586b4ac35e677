//! Transport layer (WebSocket).
//!
//! Exposes the auth-gated upgrade handler, the frame codec, keepalive timing
//! and the per-connection read/write pumps.

pub mod codec;
pub mod connection;
pub mod keepalive;
pub mod ws;

pub use connection::{Connection, ConnectionCtx};
pub use keepalive::KeepAlive;
