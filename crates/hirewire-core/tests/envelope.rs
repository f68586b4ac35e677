//! Outbound envelope shape and identity derivation.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use chrono::{TimeZone, Utc};
use serde_json::Value;

use hirewire_core::model::{
    Chat, ChatMessage, NotificationKind, NotificationPreview, StoredMessage,
};
use hirewire_core::protocol::Envelope;
use hirewire_core::{IdentityKey, Role};

fn stored(from_applicant: bool) -> StoredMessage {
    StoredMessage {
        id: 11,
        chat_id: 4,
        sender_id: 21,
        from_applicant,
        payload: "hello".into(),
        sent_at: Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap(),
    }
}

fn preview(kind: NotificationKind) -> NotificationPreview {
    NotificationPreview {
        id: 1,
        kind,
        sender_id: 5,
        receiver_id: 6,
        object_id: 100,
        resume_id: 200,
        applicant_name: "Ann".into(),
        employer_name: "Acme".into(),
        title: "Backend engineer".into(),
        is_viewed: false,
        created_at: Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap(),
    }
}

#[test]
fn chat_envelope_wire_shape() {
    let msg = ChatMessage::from_stored(stored(true), 31, "/static/a.png".into());
    let v: Value = serde_json::from_str(&Envelope::Chat(msg).to_json().unwrap()).unwrap();

    assert_eq!(v["type"], "message");
    assert_eq!(v["payload"]["chat_id"], 4);
    assert_eq!(v["payload"]["receiver_id"], 31);
    assert_eq!(v["payload"]["avatar"], "/static/a.png");
    assert_eq!(v["payload"]["from_applicant"], true);
    assert_eq!(v["payload"]["sent_at"], "2025-05-01T12:00:00Z");
}

#[test]
fn notification_envelope_wire_shape() {
    let env = Envelope::Notification(preview(NotificationKind::DownloadResume));
    assert_eq!(env.kind(), "notification");
    let v: Value = serde_json::from_str(&env.to_json().unwrap()).unwrap();

    assert_eq!(v["type"], "notification");
    assert_eq!(v["payload"]["type"], "download_resume");
    assert_eq!(v["payload"]["resume_id"], 200);
    assert_eq!(v["payload"]["is_viewed"], false);
}

#[test]
fn envelope_decodes_back_for_clients() {
    let env = Envelope::Notification(preview(NotificationKind::Apply));
    let back: Envelope = serde_json::from_str(&env.to_json().unwrap()).unwrap();
    assert_eq!(back, env);
}

#[test]
fn chat_keys_follow_author_flag() {
    let from_applicant = ChatMessage::from_stored(stored(true), 31, String::new());
    assert_eq!(from_applicant.sender_key(), IdentityKey::applicant(21));
    assert_eq!(from_applicant.receiver_key(), IdentityKey::employer(31));

    let from_employer = ChatMessage::from_stored(stored(false), 31, String::new());
    assert_eq!(from_employer.sender_key(), IdentityKey::employer(21));
    assert_eq!(from_employer.receiver_key(), IdentityKey::applicant(31));
}

#[test]
fn notification_recipient_role_by_kind() {
    assert_eq!(
        preview(NotificationKind::Apply).recipient_key(),
        IdentityKey::employer(6)
    );
    assert_eq!(
        preview(NotificationKind::DownloadResume).recipient_key(),
        IdentityKey::applicant(6)
    );
}

#[test]
fn chat_participants() {
    let chat = Chat { id: 1, vacancy_id: 9, applicant_id: 2, employer_id: 3 };
    assert!(chat.has_participant(&IdentityKey::applicant(2)));
    assert!(chat.has_participant(&IdentityKey::employer(3)));
    assert!(!chat.has_participant(&IdentityKey::employer(2)));
    assert_eq!(chat.counterpart_of(Role::Employer), IdentityKey::applicant(2));
}

#[test]
fn role_parsing() {
    assert_eq!("employer".parse::<Role>().unwrap(), Role::Employer);
    let err = "admin".parse::<Role>().unwrap_err();
    assert_eq!(err.client_code().as_str(), "FORBIDDEN");
    assert_eq!(IdentityKey::applicant(7).to_string(), "applicant:7");
}
