//! Domain records exchanged with the chat and notification collaborators.
//!
//! Field names follow the JSON the job-board frontend already consumes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::{IdentityKey, Role, UserId};

/// A chat between one applicant and one employer about one vacancy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    #[serde(default)]
    pub vacancy_id: i64,
    pub applicant_id: UserId,
    pub employer_id: UserId,
}

impl Chat {
    /// Whether `key` is one of the two participants.
    pub fn has_participant(&self, key: &IdentityKey) -> bool {
        match key.role {
            Role::Applicant => key.user_id == self.applicant_id,
            Role::Employer => key.user_id == self.employer_id,
        }
    }

    /// The participant on the other side of a message written by `author`.
    pub fn counterpart_of(&self, author: Role) -> IdentityKey {
        match author {
            Role::Applicant => IdentityKey::employer(self.employer_id),
            Role::Employer => IdentityKey::applicant(self.applicant_id),
        }
    }
}

/// A message row as returned by the chat store after a successful insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMessage {
    pub id: i64,
    pub chat_id: i64,
    pub sender_id: UserId,
    pub from_applicant: bool,
    pub payload: String,
    pub sent_at: DateTime<Utc>,
}

/// The enriched, persisted chat message pushed to both participants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    pub chat_id: i64,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub avatar: String,
    pub from_applicant: bool,
    pub payload: String,
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn from_stored(stored: StoredMessage, receiver_id: UserId, avatar: String) -> Self {
        Self {
            id: stored.id,
            chat_id: stored.chat_id,
            sender_id: stored.sender_id,
            receiver_id,
            avatar,
            from_applicant: stored.from_applicant,
            payload: stored.payload,
            sent_at: stored.sent_at,
        }
    }

    pub fn sender_key(&self) -> IdentityKey {
        IdentityKey::new(self.sender_id, Role::of_author(self.from_applicant))
    }

    pub fn receiver_key(&self) -> IdentityKey {
        IdentityKey::new(
            self.receiver_id,
            Role::of_author(self.from_applicant).counterpart(),
        )
    }
}

/// Notification kinds. Each kind has exactly one recipient role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// An applicant applied to an employer's vacancy.
    Apply,
    /// An employer downloaded an applicant's resume.
    DownloadResume,
}

impl NotificationKind {
    pub fn recipient_role(self) -> Role {
        match self {
            NotificationKind::Apply => Role::Employer,
            NotificationKind::DownloadResume => Role::Applicant,
        }
    }
}

/// A notification as produced by the business handlers, before persistence.
///
/// The sender is always an authenticated identity; the recipient role is
/// implied by `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub sender_id: UserId,
    pub sender_role: Role,
    pub receiver_id: UserId,
    pub object_id: i64,
    #[serde(default)]
    pub resume_id: i64,
}

impl Notification {
    pub fn sender_key(&self) -> IdentityKey {
        IdentityKey::new(self.sender_id, self.sender_role)
    }

    pub fn recipient_key(&self) -> IdentityKey {
        IdentityKey::new(self.receiver_id, self.kind.recipient_role())
    }

    /// Sender and recipient are the same account in the same role.
    pub fn is_self_addressed(&self) -> bool {
        self.sender_key() == self.recipient_key()
    }
}

/// The persisted, enriched notification pushed to its recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPreview {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub object_id: i64,
    pub resume_id: i64,
    #[serde(default)]
    pub applicant_name: String,
    #[serde(default)]
    pub employer_name: String,
    #[serde(default)]
    pub title: String,
    pub is_viewed: bool,
    pub created_at: DateTime<Utc>,
}

impl NotificationPreview {
    pub fn recipient_key(&self) -> IdentityKey {
        IdentityKey::new(self.receiver_id, self.kind.recipient_role())
    }
}
