use std::collections::HashSet;
use std::sync::Arc;

use ammonia::Builder;
use hirewire_core::error::{HirewireError, Result};
use hirewire_core::identity::IdentityKey;
use hirewire_core::model::ChatMessage;

use crate::infra::{ChatStore, ProfileDirectory};
use crate::realtime::HubHandle;

/// Chat send path: validate, persist, enrich, then fan out.
pub struct ChatRelay {
    chats: Arc<dyn ChatStore>,
    profiles: Arc<dyn ProfileDirectory>,
    hub: HubHandle,
    max_message_chars: usize,
}

impl ChatRelay {
    pub fn new(
        chats: Arc<dyn ChatStore>,
        profiles: Arc<dyn ProfileDirectory>,
        hub: HubHandle,
        max_message_chars: usize,
    ) -> Self {
        Self { chats, profiles, hub, max_message_chars }
    }

    /// Send `payload` into `chat_id` as `sender`.
    ///
    /// The receiver and every live session of the sender get the stored
    /// message. On any failure nothing is broadcast; the error is logged here
    /// and returned, but the socket protocol has no error frame for it.
    pub async fn send_message(
        &self,
        chat_id: i64,
        sender: IdentityKey,
        payload: &str,
    ) -> Result<ChatMessage> {
        let message = match self.persist(chat_id, sender, payload).await {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!(chat_id, user_id = sender.user_id, role = %sender.role, error = %e, "chat message not sent");
                return Err(e);
            }
        };

        self.hub.deliver_chat(message.clone()).await;
        tracing::debug!(chat_id, message_id = message.id, receiver_id = message.receiver_id, "chat message delivered to hub");
        Ok(message)
    }

    async fn persist(&self, chat_id: i64, sender: IdentityKey, payload: &str) -> Result<ChatMessage> {
        if payload.chars().count() > self.max_message_chars {
            return Err(HirewireError::BadRequest(format!(
                "message longer than {} characters",
                self.max_message_chars
            )));
        }
        let payload = sanitize(payload);
        if payload.trim().is_empty() {
            return Err(HirewireError::BadRequest("empty message".into()));
        }

        let chat = self.chats.chat(chat_id).await?;
        if !chat.has_participant(&sender) {
            return Err(HirewireError::NotAllowed(format!("{sender} is not a participant of chat {chat_id}")));
        }

        let stored = self
            .chats
            .create_message(chat_id, sender.user_id, sender.is_applicant(), &payload)
            .await?;

        let avatar = self.profiles.avatar(sender).await?;
        let receiver = chat.counterpart_of(sender.role);

        Ok(ChatMessage::from_stored(stored, receiver.user_id, avatar))
    }
}

/// Strip every tag. Script and style bodies are dropped with their tags; the
/// remaining text comes back HTML-escaped.
pub fn sanitize(payload: &str) -> String {
    Builder::empty()
        .clean_content_tags(HashSet::from(["script", "style"]))
        .clean(payload)
        .to_string()
}
