//! Server → client envelopes.

use serde::{Deserialize, Serialize};

use crate::error::{HirewireError, Result};
use crate::model::{ChatMessage, NotificationPreview};

/// Everything the live channel can push, as a closed sum type.
///
/// Serialized adjacently tagged:
/// `{"type":"message","payload":{..}}` / `{"type":"notification","payload":{..}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Envelope {
    #[serde(rename = "message")]
    Chat(ChatMessage),
    #[serde(rename = "notification")]
    Notification(NotificationPreview),
}

impl Envelope {
    pub fn kind(&self) -> &'static str {
        match self {
            Envelope::Chat(_) => "message",
            Envelope::Notification(_) => "notification",
        }
    }

    /// Serialize to the text frame body.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| HirewireError::Internal(format!("envelope encode failed: {e}")))
    }
}
