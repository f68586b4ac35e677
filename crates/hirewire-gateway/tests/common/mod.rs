//! Shared fixtures for gateway integration tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(dead_code)]

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use hirewire_core::identity::IdentityKey;
use hirewire_core::model::{ChatMessage, NotificationKind, NotificationPreview};
use hirewire_core::protocol::Envelope;
use hirewire_gateway::realtime::{ConnectionHandle, Outbound};

/// A registry entry plus the receiving end a write pump would own.
pub fn handle(key: IdentityKey, capacity: usize) -> (ConnectionHandle, mpsc::Receiver<Outbound>) {
    let (tx, rx) = mpsc::channel(capacity);
    (ConnectionHandle::new(key, tx, CancellationToken::new()), rx)
}

pub fn notification(kind: NotificationKind, receiver_id: i64) -> NotificationPreview {
    NotificationPreview {
        id: 1,
        kind,
        sender_id: 99,
        receiver_id,
        object_id: 10,
        resume_id: 20,
        applicant_name: String::new(),
        employer_name: String::new(),
        title: "Rust developer".into(),
        is_viewed: false,
        created_at: Utc::now(),
    }
}

pub fn chat_message(sender_id: i64, receiver_id: i64, from_applicant: bool) -> ChatMessage {
    ChatMessage {
        id: 1,
        chat_id: 1,
        sender_id,
        receiver_id,
        avatar: String::new(),
        from_applicant,
        payload: "hi".into(),
        sent_at: Utc::now(),
    }
}

pub fn envelope(receiver_id: i64) -> Arc<Envelope> {
    Arc::new(Envelope::Notification(notification(NotificationKind::Apply, receiver_id)))
}

/// Everything currently queued in an outbox.
pub fn drain(rx: &mut mpsc::Receiver<Outbound>) -> Vec<Outbound> {
    let mut out = Vec::new();
    while let Ok(env) = rx.try_recv() {
        out.push(env);
    }
    out
}
