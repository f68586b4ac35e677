//! Realtime core components: the connection registry and the hub actor that
//! exclusively owns it.

mod hub;
mod registry;

pub use hub::{Hub, HubHandle, HubSnapshot, HubStats};
pub use registry::{ConnectionRegistry, FanOut};
