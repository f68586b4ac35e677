//! Client → server frames.

use serde::Deserialize;

use crate::error::{HirewireError, Result};

/// A decoded inbound text frame.
///
/// Frames with an unknown `type` decode to [`InboundFrame::Ignored`]; the live
/// channel is push-oriented and does not carry a general request protocol.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type")]
pub enum InboundFrame {
    /// `{"type":"message","chat_id":1,"payload":"hi"}`
    #[serde(rename = "message")]
    ChatSend { chat_id: i64, payload: String },
    #[serde(other)]
    Ignored,
}

impl InboundFrame {
    pub fn decode(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| HirewireError::BadRequest(format!("invalid inbound frame: {e}")))
    }
}
