use std::sync::Arc;

use hirewire_core::error::Result;
use hirewire_core::model::{Notification, NotificationPreview};

use crate::infra::NotificationStore;
use crate::realtime::HubHandle;

/// Notification push path. Previews are routed only, never built here.
pub struct NotificationRelay {
    store: Arc<dyn NotificationStore>,
    hub: HubHandle,
}

impl NotificationRelay {
    pub fn new(store: Arc<dyn NotificationStore>, hub: HubHandle) -> Self {
        Self { store, hub }
    }

    /// Persist through the notification collaborator, then push to the recipient.
    ///
    /// Anonymous (`sender_id == 0`) and self-addressed notifications are
    /// skipped: nothing is stored or pushed and `Ok(None)` is returned.
    pub async fn notify(&self, notification: &Notification) -> Result<Option<NotificationPreview>> {
        if notification.sender_id == 0 || notification.is_self_addressed() {
            tracing::debug!(kind = ?notification.kind, sender = %notification.sender_key(), "notification skipped");
            return Ok(None);
        }

        let preview = self.store.create(notification).await.map_err(|e| {
            tracing::warn!(kind = ?notification.kind, receiver_id = notification.receiver_id, error = %e, "notification not stored");
            e
        })?;
        self.publish(preview.clone()).await;
        Ok(Some(preview))
    }

    /// Route a preview the collaborator has already persisted.
    pub async fn publish(&self, preview: NotificationPreview) {
        tracing::debug!(notification_id = preview.id, kind = ?preview.kind, receiver_id = preview.receiver_id, "pushing notification");
        self.hub.push_notification(preview).await;
    }
}
