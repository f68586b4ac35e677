use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use hirewire_core::error::{HirewireError, Result};
use hirewire_core::identity::{IdentityKey, Role, UserId};
use hirewire_core::model::{Chat, Notification, NotificationPreview, StoredMessage};

use crate::config::DevSeed;
use super::{ChatStore, NotificationStore, ProfileDirectory, SessionResolver};

/// In-memory stand-in for every collaborator.
pub struct MemoryDirectory {
    sessions: DashMap<String, (UserId, String)>,
    chats: DashMap<i64, Chat>,
    messages: DashMap<i64, Vec<StoredMessage>>,
    avatars: DashMap<IdentityKey, String>,
    notifications: DashMap<i64, NotificationPreview>,
    seq: AtomicI64,
}

impl Default for MemoryDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
            chats: DashMap::new(),
            messages: DashMap::new(),
            avatars: DashMap::new(),
            notifications: DashMap::new(),
            seq: AtomicI64::new(1),
        }
    }

    pub fn from_seed(seed: &DevSeed) -> Self {
        let this = Self::new();
        for s in &seed.sessions {
            this.insert_session(s.token.clone(), s.user_id, s.role.clone());
        }
        for c in &seed.chats {
            this.insert_chat(Chat {
                id: c.id,
                vacancy_id: c.vacancy_id,
                applicant_id: c.applicant_id,
                employer_id: c.employer_id,
            });
        }
        for p in &seed.profiles {
            this.set_avatar(IdentityKey::new(p.user_id, p.role), p.avatar.clone());
        }
        this
    }

    pub fn insert_session(&self, token: impl Into<String>, user_id: UserId, role: impl Into<String>) {
        self.sessions.insert(token.into(), (user_id, role.into()));
    }

    pub fn insert_chat(&self, chat: Chat) {
        self.chats.insert(chat.id, chat);
    }

    pub fn set_avatar(&self, key: IdentityKey, avatar: impl Into<String>) {
        self.avatars.insert(key, avatar.into());
    }

    /// Messages stored for a chat, oldest first.
    pub fn messages(&self, chat_id: i64) -> Vec<StoredMessage> {
        self.messages
            .get(&chat_id)
            .map(|m| m.value().clone())
            .unwrap_or_default()
    }

    pub fn notification(&self, id: i64) -> Option<NotificationPreview> {
        self.notifications.get(&id).map(|n| n.value().clone())
    }

    fn next_id(&self) -> i64 {
        self.seq.fetch_add(1, Ordering::Relaxed)
    }
}

#[async_trait]
impl SessionResolver for MemoryDirectory {
    async fn resolve(&self, token: &str) -> Result<IdentityKey> {
        let (user_id, role) = self
            .sessions
            .get(token)
            .map(|e| e.value().clone())
            .ok_or(HirewireError::Unauthorized)?;
        Ok(IdentityKey::new(user_id, role.parse::<Role>()?))
    }
}

#[async_trait]
impl ChatStore for MemoryDirectory {
    async fn chat(&self, chat_id: i64) -> Result<Chat> {
        self.chats
            .get(&chat_id)
            .map(|c| c.value().clone())
            .ok_or_else(|| HirewireError::NotFound(format!("chat {chat_id}")))
    }

    async fn create_message(
        &self,
        chat_id: i64,
        sender_id: i64,
        from_applicant: bool,
        payload: &str,
    ) -> Result<StoredMessage> {
        if !self.chats.contains_key(&chat_id) {
            return Err(HirewireError::Persistence(format!("chat {chat_id} does not exist")));
        }
        let stored = StoredMessage {
            id: self.next_id(),
            chat_id,
            sender_id,
            from_applicant,
            payload: payload.to_string(),
            sent_at: Utc::now(),
        };
        self.messages.entry(chat_id).or_default().push(stored.clone());
        Ok(stored)
    }
}

#[async_trait]
impl ProfileDirectory for MemoryDirectory {
    async fn avatar(&self, key: IdentityKey) -> Result<String> {
        Ok(self
            .avatars
            .get(&key)
            .map(|a| a.value().clone())
            .unwrap_or_default())
    }
}

#[async_trait]
impl NotificationStore for MemoryDirectory {
    async fn create(&self, notification: &Notification) -> Result<NotificationPreview> {
        let preview = NotificationPreview {
            id: self.next_id(),
            kind: notification.kind,
            sender_id: notification.sender_id,
            receiver_id: notification.receiver_id,
            object_id: notification.object_id,
            resume_id: notification.resume_id,
            applicant_name: String::new(),
            employer_name: String::new(),
            title: String::new(),
            is_viewed: false,
            created_at: Utc::now(),
        };
        self.notifications.insert(preview.id, preview.clone());
        Ok(preview)
    }
}
