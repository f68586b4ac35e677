//! hirewire gateway library entry.
//!
//! This crate wires the auth-gated WebSocket transport, the hub actor that
//! owns the connection registry, and the persist-then-broadcast relays for
//! chat messages and notifications. It is consumed by the binary
//! (`main.rs`) and by integration tests.

pub mod api;
pub mod app_state;
pub mod config;
pub mod error;
pub mod infra;
pub mod ops;
pub mod realtime;
pub mod router;
pub mod services;
pub mod transport;
