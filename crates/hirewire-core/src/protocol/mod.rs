//! Wire formats of the live channel.
//!
//! - Inbound: client → server text frames. Only chat sends are actionable.
//! - Outbound: server → client envelopes (`message` | `notification`).
//!
//! Decoding is panic-free: malformed input is reported as `HirewireError`
//! and the caller decides whether to ignore it.

pub mod inbound;
pub mod outbound;

pub use inbound::InboundFrame;
pub use outbound::Envelope;
