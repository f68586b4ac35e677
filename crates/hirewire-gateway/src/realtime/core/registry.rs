use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tokio::sync::mpsc::error::TrySendError;

use hirewire_core::identity::IdentityKey;
use hirewire_core::protocol::Envelope;

use crate::realtime::types::{ConnectionHandle, ConnectionId};

/// Result of one fan-out to one identity.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FanOut {
    /// Connections that accepted the envelope into their outbox.
    pub delivered: usize,
    /// Slow consumers (outbox full) disconnected by this fan-out.
    pub slow: Vec<ConnectionId>,
    /// Connections whose pumps were already gone; removed.
    pub stale: Vec<ConnectionId>,
}

/// Connection registry:
/// - `identity -> {connection id -> handle}`
///
/// Not synchronized. The hub actor owns the only instance, which is what
/// makes register / unregister / broadcast linearizable.
#[derive(Default)]
pub struct ConnectionRegistry {
    by_key: HashMap<IdentityKey, HashMap<ConnectionId, ConnectionHandle>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self { by_key: HashMap::new() }
    }

    pub fn register(&mut self, conn: ConnectionHandle) {
        self.by_key.entry(conn.key).or_default().insert(conn.id, conn);
    }

    /// Remove one connection. Absent connection (already removed, or a
    /// different id under the same key) is a no-op.
    pub fn unregister(&mut self, key: &IdentityKey, id: ConnectionId) -> Option<ConnectionHandle> {
        let set = self.by_key.get_mut(key)?;
        let removed = set.remove(&id);
        if set.is_empty() {
            self.by_key.remove(key);
        }
        removed
    }

    /// Enqueue `env` on every connection of `target` without blocking.
    ///
    /// A full outbox means the write pump cannot keep up: the connection is
    /// removed and told to close instead of buffering without bound.
    pub fn broadcast(&mut self, target: &IdentityKey, env: &Arc<Envelope>) -> FanOut {
        let mut out = FanOut::default();
        let Some(set) = self.by_key.get(target) else {
            return out;
        };

        for (id, conn) in set {
            match conn.outbox.try_send(Arc::clone(env)) {
                Ok(()) => out.delivered += 1,
                Err(TrySendError::Full(_)) => out.slow.push(*id),
                Err(TrySendError::Closed(_)) => out.stale.push(*id),
            }
        }

        for id in out.slow.iter().chain(out.stale.iter()) {
            if let Some(conn) = self.unregister(target, *id) {
                conn.closer.cancel();
            }
        }
        out
    }

    pub fn contains(&self, key: &IdentityKey, id: ConnectionId) -> bool {
        self.by_key.get(key).is_some_and(|set| set.contains_key(&id))
    }

    pub fn count_for(&self, key: &IdentityKey) -> usize {
        self.by_key.get(key).map(HashMap::len).unwrap_or(0)
    }

    /// Number of identities with at least one connection.
    pub fn identities(&self) -> usize {
        self.by_key.len()
    }

    pub fn connections(&self) -> usize {
        self.by_key.values().map(HashMap::len).sum()
    }

    /// Sorted membership view.
    pub fn members(&self) -> BTreeMap<IdentityKey, Vec<ConnectionId>> {
        self.by_key
            .iter()
            .map(|(k, set)| {
                let mut ids: Vec<ConnectionId> = set.keys().copied().collect();
                ids.sort();
                (*k, ids)
            })
            .collect()
    }

    /// Drop every connection (hub shutdown). Outboxes close with the handles.
    pub fn clear(&mut self) {
        for (_, set) in self.by_key.drain() {
            for conn in set.into_values() {
                conn.closer.cancel();
            }
        }
    }
}
