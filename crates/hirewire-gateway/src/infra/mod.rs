//! Collaborator seams.
//!
//! The delivery core never owns durable state. Sessions, chats, profiles and
//! notifications live behind these traits; production wires database-backed
//! implementations, local runs and tests use [`memory::MemoryDirectory`].

pub mod memory;

use async_trait::async_trait;

use hirewire_core::error::Result;
use hirewire_core::identity::IdentityKey;
use hirewire_core::model::{Chat, Notification, NotificationPreview, StoredMessage};

pub use memory::MemoryDirectory;

/// Auth collaborator: opaque session token -> identity.
#[async_trait]
pub trait SessionResolver: Send + Sync {
    /// `Unauthorized` for unknown tokens, `Forbidden` for an unusable role.
    async fn resolve(&self, token: &str) -> Result<IdentityKey>;
}

/// Chat collaborator: chat lookup and durable message insert.
#[async_trait]
pub trait ChatStore: Send + Sync {
    async fn chat(&self, chat_id: i64) -> Result<Chat>;

    async fn create_message(
        &self,
        chat_id: i64,
        sender_id: i64,
        from_applicant: bool,
        payload: &str,
    ) -> Result<StoredMessage>;
}

/// Profile collaborator: applicant avatar path or employer logo path.
#[async_trait]
pub trait ProfileDirectory: Send + Sync {
    async fn avatar(&self, key: IdentityKey) -> Result<String>;
}

/// Notification collaborator: persists and enriches a notification.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn create(&self, notification: &Notification) -> Result<NotificationPreview>;
}
