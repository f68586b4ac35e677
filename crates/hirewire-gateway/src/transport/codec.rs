//! Decode-once codec for the transport layer.
//!
//! - Text frames => `InboundFrame` (size checked before parsing)
//! - Binary frames => ignored; the live channel is text-only
//! - Ping/Pong/Close are surfaced for lifecycle management

use axum::extract::ws::Message;
use hirewire_core::{
    error::{HirewireError, Result},
    protocol::{Envelope, InboundFrame},
};

#[derive(Debug)]
pub enum Inbound {
    Frame(InboundFrame),
    Binary { bytes_len: usize },
    Ping,
    Pong,
    Close,
}

pub fn decode(msg: Message, max_frame_bytes: usize) -> Result<Inbound> {
    match msg {
        Message::Text(s) => {
            if s.len() > max_frame_bytes {
                return Err(HirewireError::BadRequest(format!(
                    "frame of {} bytes exceeds limit of {max_frame_bytes}",
                    s.len()
                )));
            }
            Ok(Inbound::Frame(InboundFrame::decode(&s)?))
        }
        Message::Binary(b) => Ok(Inbound::Binary { bytes_len: b.len() }),
        Message::Ping(_) => Ok(Inbound::Ping),
        Message::Pong(_) => Ok(Inbound::Pong),
        Message::Close(_) => Ok(Inbound::Close),
    }
}

/// Serialize an envelope into a text frame.
pub fn encode(env: &Envelope) -> Result<Message> {
    Ok(Message::Text(env.to_json()?))
}
