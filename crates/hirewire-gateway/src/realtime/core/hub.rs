use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{mpsc, oneshot};

use hirewire_core::error::{HirewireError, Result};
use hirewire_core::identity::IdentityKey;
use hirewire_core::model::{ChatMessage, NotificationPreview};
use hirewire_core::protocol::Envelope;

use super::registry::ConnectionRegistry;
use crate::realtime::types::{ConnectionHandle, ConnectionId, Outbound};

enum HubCommand {
    Register(ConnectionHandle),
    Unregister { key: IdentityKey, id: ConnectionId },
    /// One envelope, fanned out to each target in order.
    Broadcast { targets: Vec<IdentityKey>, envelope: Outbound },
    Snapshot(oneshot::Sender<HubSnapshot>),
}

/// Delivery counters, owned by the hub task.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HubStats {
    pub registered: u64,
    pub unregistered: u64,
    pub delivered: u64,
    pub dropped_no_target: u64,
    pub slow_consumers: u64,
    pub stale_removed: u64,
}

/// Point-in-time view of the registry plus counters.
#[derive(Debug, Clone)]
pub struct HubSnapshot {
    pub members: BTreeMap<IdentityKey, Vec<ConnectionId>>,
    pub stats: HubStats,
}

impl HubSnapshot {
    pub fn connections(&self) -> usize {
        self.members.values().map(Vec::len).sum()
    }

    pub fn connections_of(&self, key: &IdentityKey) -> &[ConnectionId] {
        self.members.get(key).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// The message router: a single task draining one command channel.
///
/// Register, unregister and broadcast are applied strictly in arrival order,
/// so a fan-out always sees a consistent membership set.
pub struct Hub {
    rx: mpsc::Receiver<HubCommand>,
    registry: ConnectionRegistry,
    stats: HubStats,
}

/// Cheap, cloneable sender side of the hub.
#[derive(Clone)]
pub struct HubHandle {
    tx: mpsc::Sender<HubCommand>,
}

impl Hub {
    pub fn new(capacity: usize) -> (Self, HubHandle) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let hub = Self {
            rx,
            registry: ConnectionRegistry::new(),
            stats: HubStats::default(),
        };
        (hub, HubHandle { tx })
    }

    /// Spawn the hub on the current runtime. It stops once every handle is dropped.
    pub fn spawn(capacity: usize) -> HubHandle {
        let (hub, handle) = Self::new(capacity);
        tokio::spawn(hub.run());
        handle
    }

    pub async fn run(mut self) {
        tracing::debug!("hub started");
        while let Some(cmd) = self.rx.recv().await {
            self.apply(cmd);
        }
        let open = self.registry.connections();
        self.registry.clear();
        tracing::info!(open, "hub stopped; remaining connections closed");
    }

    fn apply(&mut self, cmd: HubCommand) {
        match cmd {
            HubCommand::Register(conn) => {
                tracing::info!(conn_id = %conn.id, user_id = conn.key.user_id, role = %conn.key.role, "connection registered");
                self.registry.register(conn);
                self.stats.registered += 1;
            }
            HubCommand::Unregister { key, id } => {
                if self.registry.unregister(&key, id).is_some() {
                    self.stats.unregistered += 1;
                    tracing::info!(conn_id = %id, user_id = key.user_id, role = %key.role, "connection unregistered");
                }
            }
            HubCommand::Broadcast { targets, envelope } => {
                for target in &targets {
                    self.fan_out(target, &envelope);
                }
            }
            HubCommand::Snapshot(reply) => {
                let _ = reply.send(HubSnapshot {
                    members: self.registry.members(),
                    stats: self.stats,
                });
            }
        }
    }

    fn fan_out(&mut self, target: &IdentityKey, envelope: &Outbound) {
        let out = self.registry.broadcast(target, envelope);

        if out.delivered == 0 && out.slow.is_empty() && out.stale.is_empty() {
            // Best-effort: offline users pick the event up on their next fetch.
            self.stats.dropped_no_target += 1;
            tracing::debug!(user_id = target.user_id, role = %target.role, kind = envelope.kind(), "no live connection; event dropped");
            return;
        }

        self.stats.delivered += out.delivered as u64;
        self.stats.stale_removed += out.stale.len() as u64;
        for id in &out.slow {
            self.stats.slow_consumers += 1;
            tracing::warn!(conn_id = %id, user_id = target.user_id, role = %target.role, "outbox full; disconnecting slow consumer");
        }
    }
}

impl HubHandle {
    /// Add a connection. Fails only if the hub has stopped.
    pub async fn register(&self, conn: ConnectionHandle) -> Result<()> {
        self.tx
            .send(HubCommand::Register(conn))
            .await
            .map_err(|_| HirewireError::Internal("hub stopped".into()))
    }

    /// Remove a connection. Idempotent; safe to call from every teardown path.
    pub async fn unregister(&self, key: IdentityKey, id: ConnectionId) {
        if self.tx.send(HubCommand::Unregister { key, id }).await.is_err() {
            tracing::debug!(conn_id = %id, "hub stopped before unregister");
        }
    }

    /// Fan `envelope` out to every connection of `target`. Never fails.
    pub async fn broadcast(&self, target: IdentityKey, envelope: Envelope) {
        self.broadcast_many(vec![target], envelope).await;
    }

    async fn broadcast_many(&self, targets: Vec<IdentityKey>, envelope: Envelope) {
        let envelope = Arc::new(envelope);
        if self
            .tx
            .send(HubCommand::Broadcast { targets, envelope })
            .await
            .is_err()
        {
            tracing::debug!("hub stopped; broadcast dropped");
        }
    }

    /// Push a persisted chat message to the receiver, then echo it to every
    /// live session of the sender.
    pub async fn deliver_chat(&self, message: ChatMessage) {
        let targets = vec![message.receiver_key(), message.sender_key()];
        self.broadcast_many(targets, Envelope::Chat(message)).await;
    }

    /// Push a persisted notification to its recipient (role derived from its type).
    pub async fn push_notification(&self, preview: NotificationPreview) {
        let target = preview.recipient_key();
        self.broadcast(target, Envelope::Notification(preview)).await;
    }

    pub async fn snapshot(&self) -> Result<HubSnapshot> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(HubCommand::Snapshot(reply))
            .await
            .map_err(|_| HirewireError::Internal("hub stopped".into()))?;
        rx.await
            .map_err(|_| HirewireError::Internal("hub stopped".into()))
    }
}
