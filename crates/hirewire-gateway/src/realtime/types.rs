use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use hirewire_core::identity::IdentityKey;
use hirewire_core::protocol::Envelope;

/// Outbox item. One `Arc` per broadcast, shared by every target connection.
pub type Outbound = Arc<Envelope>;

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique connection id. Many connections may share one `IdentityKey`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn next() -> Self {
        Self(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// What the registry keeps for one live connection.
#[derive(Clone)]
pub struct ConnectionHandle {
    pub id: ConnectionId,
    pub key: IdentityKey,
    pub outbox: mpsc::Sender<Outbound>,
    /// Cancelled when the connection must stop (either pump, or the hub).
    pub closer: CancellationToken,
}

impl ConnectionHandle {
    pub fn new(key: IdentityKey, outbox: mpsc::Sender<Outbound>, closer: CancellationToken) -> Self {
        Self { id: ConnectionId::next(), key, outbox, closer }
    }
}

impl fmt::Debug for ConnectionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionHandle")
            .field("id", &self.id)
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

/// Per-connection lifecycle: `Connecting -> Active -> Closing -> Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ConnState {
    Connecting = 0,
    Active = 1,
    Closing = 2,
    Closed = 3,
}

impl ConnState {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => ConnState::Connecting,
            1 => ConnState::Active,
            2 => ConnState::Closing,
            _ => ConnState::Closed,
        }
    }
}

/// Atomic lifecycle cell shared by both pumps.
#[derive(Debug)]
pub struct Lifecycle(AtomicU8);

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        Self(AtomicU8::new(ConnState::Connecting as u8))
    }

    pub fn state(&self) -> ConnState {
        ConnState::from_u8(self.0.load(Ordering::Acquire))
    }

    /// `Connecting -> Active`. False if teardown already started.
    pub fn activate(&self) -> bool {
        self.0
            .compare_exchange(
                ConnState::Connecting as u8,
                ConnState::Active as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    /// Enter `Closing`. Returns true for exactly one caller.
    pub fn begin_closing(&self) -> bool {
        let mut cur = self.0.load(Ordering::Acquire);
        loop {
            if cur >= ConnState::Closing as u8 {
                return false;
            }
            match self.0.compare_exchange_weak(
                cur,
                ConnState::Closing as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(actual) => cur = actual,
            }
        }
    }

    pub fn finish(&self) {
        self.0.store(ConnState::Closed as u8, Ordering::Release);
    }
}
