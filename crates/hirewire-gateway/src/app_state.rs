//! Shared application state for the hirewire gateway.
//!
//! Wires the collaborators, the hub actor and the two relays together.
//! `AppState::new` spawns the hub, so it must be called inside a tokio runtime.

use std::sync::Arc;

use hirewire_core::error::Result;

use crate::config::GatewayConfig;
use crate::infra::{ChatStore, MemoryDirectory, NotificationStore, ProfileDirectory, SessionResolver};
use crate::realtime::{Hub, HubHandle};
use crate::services::{ChatRelay, NotificationRelay};
use crate::transport::{ConnectionCtx, KeepAlive};

/// The external collaborators the gateway depends on.
#[derive(Clone)]
pub struct Collaborators {
    pub sessions: Arc<dyn SessionResolver>,
    pub chats: Arc<dyn ChatStore>,
    pub profiles: Arc<dyn ProfileDirectory>,
    pub notifications: Arc<dyn NotificationStore>,
}

impl Collaborators {
    /// Back every collaborator with one in-memory directory.
    pub fn in_memory(dir: Arc<MemoryDirectory>) -> Self {
        Self {
            sessions: dir.clone(),
            chats: dir.clone(),
            profiles: dir.clone(),
            notifications: dir,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: GatewayConfig,
    sessions: Arc<dyn SessionResolver>,
    hub: HubHandle,
    chat: Arc<ChatRelay>,
    notifications: Arc<NotificationRelay>,
    keepalive: KeepAlive,
}

impl AppState {
    /// Build application state from a validated config.
    pub fn new(cfg: GatewayConfig, collab: Collaborators) -> Result<Self> {
        cfg.validate()?;

        let hub = Hub::spawn(cfg.gateway.hub_capacity);
        let chat = Arc::new(ChatRelay::new(
            collab.chats,
            collab.profiles,
            hub.clone(),
            cfg.limits.max_message_chars,
        ));
        let notifications = Arc::new(NotificationRelay::new(collab.notifications, hub.clone()));
        let keepalive = KeepAlive::from_config(&cfg.gateway);

        tracing::debug!(
            ping_interval_ms = cfg.gateway.ping_interval_ms,
            pong_wait_ms = cfg.gateway.pong_wait_ms,
            outbox_capacity = cfg.gateway.outbox_capacity,
            "app state ready"
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                sessions: collab.sessions,
                hub,
                chat,
                notifications,
                keepalive,
            }),
        })
    }

    pub fn cfg(&self) -> &GatewayConfig {
        &self.inner.cfg
    }

    pub fn sessions(&self) -> Arc<dyn SessionResolver> {
        Arc::clone(&self.inner.sessions)
    }

    pub fn hub(&self) -> HubHandle {
        self.inner.hub.clone()
    }

    pub fn chat(&self) -> Arc<ChatRelay> {
        Arc::clone(&self.inner.chat)
    }

    pub fn notifications(&self) -> Arc<NotificationRelay> {
        Arc::clone(&self.inner.notifications)
    }

    pub fn connection_ctx(&self) -> ConnectionCtx {
        ConnectionCtx {
            hub: self.hub(),
            chat: self.chat(),
            keepalive: self.inner.keepalive,
            outbox_capacity: self.inner.cfg.gateway.outbox_capacity,
            max_frame_bytes: self.inner.cfg.limits.max_frame_bytes,
        }
    }
}
