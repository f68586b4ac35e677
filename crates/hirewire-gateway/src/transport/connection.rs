//! One live connection: registration, the two pumps, teardown.
//!
//! - Write pump: sole writer. Drains the outbox, pings on a fixed interval,
//!   closes the transport exactly once.
//! - Read pump: sole reader. Feeds chat sends to the relay, ignores anything
//!   else, and stops on read error, close frame or keepalive timeout.
//!
//! Either pump stopping cancels the shared token, which stops the other one.
//! A full outbox is handled by the hub, which cancels the same token: slow
//! consumers are disconnected, never buffered indefinitely.

use std::fmt;
use std::sync::Arc;

use axum::extract::ws::Message;
use futures_util::{Sink, SinkExt, Stream};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use hirewire_core::identity::IdentityKey;
use hirewire_core::protocol::InboundFrame;

use crate::realtime::{ConnState, ConnectionHandle, ConnectionId, HubHandle, Lifecycle, Outbound};
use crate::services::ChatRelay;
use crate::transport::codec::{self, Inbound};
use crate::transport::keepalive::KeepAlive;

/// Everything a connection needs from the rest of the gateway.
#[derive(Clone)]
pub struct ConnectionCtx {
    pub hub: HubHandle,
    pub chat: Arc<ChatRelay>,
    pub keepalive: KeepAlive,
    pub outbox_capacity: usize,
    pub max_frame_bytes: usize,
}

/// Why a pump stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    PeerClosed,
    ReadError,
    KeepAliveTimeout,
    WriteError,
    /// The hub dropped the outbox (slow consumer, shutdown).
    OutboxClosed,
    /// The other pump (or the hub) cancelled the connection.
    Cancelled,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StopReason::PeerClosed => "peer_closed",
            StopReason::ReadError => "read_error",
            StopReason::KeepAliveTimeout => "keepalive_timeout",
            StopReason::WriteError => "write_error",
            StopReason::OutboxClosed => "outbox_closed",
            StopReason::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

pub struct Connection {
    handle: ConnectionHandle,
    outbox: mpsc::Receiver<Outbound>,
    lifecycle: Arc<Lifecycle>,
}

impl Connection {
    /// Create a connection for an already authenticated identity.
    pub fn new(key: IdentityKey, outbox_capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(outbox_capacity.max(1));
        Self {
            handle: ConnectionHandle::new(key, tx, CancellationToken::new()),
            outbox: rx,
            lifecycle: Arc::new(Lifecycle::new()),
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.handle.id
    }

    pub fn key(&self) -> IdentityKey {
        self.handle.key
    }

    pub fn lifecycle(&self) -> Arc<Lifecycle> {
        Arc::clone(&self.lifecycle)
    }

    /// Register, run both pumps until either stops, then unregister.
    pub async fn run<W, R, E>(self, sink: W, stream: R, ctx: ConnectionCtx)
    where
        W: Sink<Message> + Unpin + Send + 'static,
        W::Error: fmt::Display + Send,
        R: Stream<Item = Result<Message, E>> + Unpin,
        E: fmt::Display,
    {
        let Connection { handle, outbox, lifecycle } = self;
        let (id, key, closer) = (handle.id, handle.key, handle.closer.clone());

        // The registry keeps the only outbox sender: dropping it closes the write pump.
        if let Err(e) = ctx.hub.register(handle).await {
            tracing::warn!(error = %e, "register failed; closing connection");
            lifecycle.finish();
            return;
        }
        lifecycle.activate();
        tracing::debug!(state = ?ConnState::Active, "connection active");

        let writer = tokio::spawn(write_pump(
            sink,
            outbox,
            ctx.keepalive,
            closer.clone(),
            Arc::clone(&lifecycle),
        ));

        let read_reason = read_pump(stream, key, &ctx, &closer).await;
        if lifecycle.begin_closing() {
            tracing::debug!(reason = %read_reason, "read pump stopped first");
        }
        closer.cancel();
        ctx.hub.unregister(key, id).await;

        let write_reason = match writer.await {
            Ok(reason) => reason,
            Err(e) => {
                tracing::warn!(error = %e, "write pump task failed");
                StopReason::WriteError
            }
        };
        lifecycle.finish();
        tracing::info!(read = %read_reason, write = %write_reason, "connection closed");
    }
}

async fn read_pump<R, E>(
    mut stream: R,
    key: IdentityKey,
    ctx: &ConnectionCtx,
    closer: &CancellationToken,
) -> StopReason
where
    R: Stream<Item = Result<Message, E>> + Unpin,
    E: fmt::Display,
{
    loop {
        tokio::select! {
            _ = closer.cancelled() => return StopReason::Cancelled,
            next = ctx.keepalive.read_next(&mut stream) => {
                let msg = match next {
                    Err(_) => {
                        tracing::info!(pong_wait_ms = ctx.keepalive.pong_wait.as_millis() as u64, "no frame within read deadline");
                        return StopReason::KeepAliveTimeout;
                    }
                    Ok(None) => return StopReason::PeerClosed,
                    Ok(Some(Err(e))) => {
                        tracing::debug!(error = %e, "read failed");
                        return StopReason::ReadError;
                    }
                    Ok(Some(Ok(msg))) => msg,
                };

                match codec::decode(msg, ctx.max_frame_bytes) {
                    Ok(Inbound::Frame(InboundFrame::ChatSend { chat_id, payload })) => {
                        // Failures are logged by the relay; the client gets no error frame.
                        tokio::select! {
                            _ = closer.cancelled() => {
                                tracing::debug!(chat_id, "connection cancelled during chat send");
                                return StopReason::Cancelled;
                            }
                            _ = ctx.chat.send_message(chat_id, key, &payload) => {}
                        }
                    }
                    Ok(Inbound::Frame(InboundFrame::Ignored)) => {
                        tracing::debug!("ignoring inbound frame of unsupported type");
                    }
                    Ok(Inbound::Binary { bytes_len }) => {
                        tracing::debug!(bytes_len, "ignoring binary frame");
                    }
                    // Pings are answered by the websocket layer; both only re-arm the deadline.
                    Ok(Inbound::Ping | Inbound::Pong) => {}
                    Ok(Inbound::Close) => return StopReason::PeerClosed,
                    Err(e) => {
                        tracing::debug!(error = %e, "ignoring undecodable frame");
                    }
                }
            }
        }
    }
}

async fn write_pump<W>(
    mut sink: W,
    mut outbox: mpsc::Receiver<Outbound>,
    keepalive: KeepAlive,
    closer: CancellationToken,
    lifecycle: Arc<Lifecycle>,
) -> StopReason
where
    W: Sink<Message> + Unpin,
    W::Error: fmt::Display,
{
    let mut ping = keepalive.ticker();

    let reason = loop {
        tokio::select! {
            biased;

            _ = closer.cancelled() => break StopReason::Cancelled,
            next = outbox.recv() => {
                let Some(env) = next else { break StopReason::OutboxClosed; };
                let frame = match codec::encode(&env) {
                    Ok(frame) => frame,
                    Err(e) => {
                        tracing::error!(error = %e, kind = env.kind(), "dropping unencodable envelope");
                        continue;
                    }
                };
                if let Err(e) = keepalive.write(&mut sink, frame).await {
                    tracing::debug!(error = %e, "write failed");
                    break StopReason::WriteError;
                }
            }
            _ = ping.tick() => {
                if let Err(e) = keepalive.write(&mut sink, Message::Ping(Vec::new())).await {
                    tracing::debug!(error = %e, "ping failed");
                    break StopReason::WriteError;
                }
            }
        }
    };

    if lifecycle.begin_closing() {
        tracing::debug!(%reason, "write pump stopped first");
    }
    closer.cancel();

    if reason != StopReason::WriteError {
        let _ = keepalive.write(&mut sink, Message::Close(None)).await;
    }
    if let Err(e) = sink.close().await {
        tracing::debug!(error = %e, "transport close failed");
    }
    reason
}
