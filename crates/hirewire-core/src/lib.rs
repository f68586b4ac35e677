//! hirewire core: identities, domain events, wire envelopes and the error
//! surface shared by the gateway and its collaborators.
//!
//! This crate carries no transport or runtime dependencies. Everything that
//! crosses the socket (inbound frames, outbound envelopes) and everything that
//! crosses a collaborator boundary (chat messages, notification previews) is
//! defined here so both sides agree on one serde representation.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Malformed input surfaces as `HirewireError`, never as a crash.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod identity;
pub mod model;
pub mod protocol;

/// Shared result type.
pub use error::{HirewireError, Result};
pub use identity::{IdentityKey, Role};
