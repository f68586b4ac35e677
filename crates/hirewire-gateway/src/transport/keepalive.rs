//! Keepalive discipline: ping ticker, read deadline, write deadline.
//!
//! The read deadline is re-armed by every inbound frame (pongs included). A
//! peer that stays silent for `pong_wait` fails its read with a timeout, and
//! the connection is torn down exactly like on any other read error.

use std::fmt;

use futures_util::{Sink, SinkExt, Stream, StreamExt};
use tokio::time::{self, error::Elapsed, Duration, Instant, Interval, MissedTickBehavior};

use hirewire_core::error::{HirewireError, Result};

use crate::config::GatewaySection;

#[derive(Debug, Clone, Copy)]
pub struct KeepAlive {
    pub ping_interval: Duration,
    pub pong_wait: Duration,
    pub write_timeout: Duration,
}

impl KeepAlive {
    pub fn from_config(gw: &GatewaySection) -> Self {
        Self {
            ping_interval: gw.ping_interval(),
            pong_wait: gw.pong_wait(),
            write_timeout: gw.write_timeout(),
        }
    }

    /// Ping ticker. First tick one interval from now, not immediately.
    pub fn ticker(&self) -> Interval {
        let mut tick = time::interval_at(Instant::now() + self.ping_interval, self.ping_interval);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tick
    }

    /// Next inbound item, or `Elapsed` if the peer went quiet for `pong_wait`.
    pub async fn read_next<S>(&self, stream: &mut S) -> std::result::Result<Option<S::Item>, Elapsed>
    where
        S: Stream + Unpin,
    {
        time::timeout(self.pong_wait, stream.next()).await
    }

    /// Write one frame within `write_timeout`.
    pub async fn write<S, M>(&self, sink: &mut S, msg: M) -> Result<()>
    where
        S: Sink<M> + Unpin,
        S::Error: fmt::Display,
    {
        match time::timeout(self.write_timeout, sink.send(msg)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(HirewireError::Transport(format!("write failed: {e}"))),
            Err(_) => Err(HirewireError::Transport("write timed out".into())),
        }
    }
}
