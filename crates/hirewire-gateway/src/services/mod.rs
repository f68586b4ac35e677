//! Persist-then-broadcast pipelines.
//!
//! Nothing reaches the hub before the owning collaborator has stored it.

pub mod chat;
pub mod notification;

pub use chat::ChatRelay;
pub use notification::NotificationRelay;
