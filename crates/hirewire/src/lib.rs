//! Top-level facade crate for hirewire.
//!
//! Re-exports core types and the gateway library so users can depend on a single crate.

pub mod core {
    pub use hirewire_core::*;
}

pub mod gateway {
    pub use hirewire_gateway::*;
}
