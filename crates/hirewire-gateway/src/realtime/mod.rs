//! Realtime delivery engine.
//!
//! One hub actor owns the connection registry; connections hold only their
//! outbox receiver. Everything that changes membership or pushes an event
//! goes through [`HubHandle`].

pub mod core;
pub mod types;

pub use self::core::{ConnectionRegistry, FanOut, Hub, HubHandle, HubSnapshot, HubStats};
pub use types::{ConnState, ConnectionHandle, ConnectionId, Lifecycle, Outbound};
