//! Pump and keepalive behaviour against in-process transports.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

mod common;

use std::sync::Arc;

use axum::extract::ws::Message;
use futures_util::stream::{self, StreamExt};
use tokio::sync::mpsc;
use tokio::time::{timeout, Duration, Instant};
use tokio_util::sync::PollSender;

use async_trait::async_trait;

use hirewire_core::error::Result as HwResult;
use hirewire_core::identity::IdentityKey;
use hirewire_core::model::{Chat, NotificationKind, StoredMessage};
use hirewire_core::protocol::Envelope;
use hirewire_gateway::infra::{ChatStore, MemoryDirectory};
use hirewire_gateway::realtime::{ConnState, Hub, HubHandle};
use hirewire_gateway::services::ChatRelay;
use hirewire_gateway::transport::{Connection, ConnectionCtx, KeepAlive};

use common::{drain, handle, notification};

type Inbound = Result<Message, std::io::Error>;

fn keepalive() -> KeepAlive {
    KeepAlive {
        ping_interval: Duration::from_secs(1),
        pong_wait: Duration::from_secs(3),
        write_timeout: Duration::from_millis(500),
    }
}

fn ctx(hub: &HubHandle, outbox_capacity: usize) -> ConnectionCtx {
    let dir = Arc::new(MemoryDirectory::new());
    dir.insert_chat(Chat { id: 1, vacancy_id: 0, applicant_id: 10, employer_id: 20 });
    ConnectionCtx {
        hub: hub.clone(),
        chat: Arc::new(ChatRelay::new(dir.clone(), dir, hub.clone(), 100)),
        keepalive: keepalive(),
        outbox_capacity,
        max_frame_bytes: 4096,
    }
}

#[tokio::test(start_paused = true)]
async fn silent_peer_is_torn_down_after_read_deadline() {
    let hub = Hub::spawn(64);
    let (wire_tx, mut wire_rx) = mpsc::channel::<Message>(64);
    let conn = Connection::new(IdentityKey::applicant(10), 8);
    let lifecycle = conn.lifecycle();
    let started = Instant::now();

    let task = tokio::spawn(conn.run(
        PollSender::new(wire_tx),
        stream::pending::<Inbound>(),
        ctx(&hub, 8),
    ));

    timeout(Duration::from_secs(30), task).await.expect("must not hang").unwrap();
    let elapsed = started.elapsed();

    assert!(elapsed >= keepalive().pong_wait, "{elapsed:?}");
    assert!(elapsed < keepalive().pong_wait * 2, "{elapsed:?}");
    assert_eq!(lifecycle.state(), ConnState::Closed);

    let snap = hub.snapshot().await.unwrap();
    assert_eq!(snap.connections(), 0);
    assert_eq!(snap.stats.registered, 1);
    assert_eq!(snap.stats.unregistered, 1);

    // pings went out while waiting, then a close frame
    let mut pings = 0;
    let mut closed = false;
    while let Ok(msg) = wire_rx.try_recv() {
        match msg {
            Message::Ping(_) => pings += 1,
            Message::Close(_) => closed = true,
            _ => {}
        }
    }
    assert!(pings >= 2, "pings={pings}");
    assert!(closed);
}

#[tokio::test(start_paused = true)]
async fn pongs_keep_a_connection_alive() {
    let hub = Hub::spawn(64);
    let (wire_tx, _wire_rx) = mpsc::channel::<Message>(64);

    // a pong every two seconds for ten seconds, then silence
    let pongs = stream::iter(0..5).then(|_| async {
        tokio::time::sleep(Duration::from_secs(2)).await;
        Ok::<_, std::io::Error>(Message::Pong(Vec::new()))
    });
    let inbound = pongs.chain(stream::pending());
    let started = Instant::now();

    let conn = Connection::new(IdentityKey::employer(20), 8);
    tokio::spawn(conn.run(PollSender::new(wire_tx), Box::pin(inbound), ctx(&hub, 8)))
        .await
        .unwrap();

    // 10s of pongs plus one full deadline window
    assert!(started.elapsed() >= Duration::from_secs(13));
    assert_eq!(hub.snapshot().await.unwrap().connections(), 0);
}

#[tokio::test(start_paused = true)]
async fn inbound_chat_is_persisted_and_echoed() {
    let hub = Hub::spawn(64);
    let (wire_tx, _wire_rx) = mpsc::channel::<Message>(64);
    let (receiver, mut rx_receiver) = handle(IdentityKey::employer(20), 8);
    hub.register(receiver).await.unwrap();

    let frames: Vec<Inbound> = vec![
        Ok(Message::Text(r#"{"type":"typing","chat_id":1}"#.into())),
        Ok(Message::Text("not json".into())),
        Ok(Message::Binary(vec![1, 2, 3])),
        Ok(Message::Text(r#"{"type":"message","chat_id":1,"payload":"hello"}"#.into())),
        Ok(Message::Close(None)),
    ];
    let conn = Connection::new(IdentityKey::applicant(10), 8);
    let task = tokio::spawn(conn.run(
        PollSender::new(wire_tx),
        stream::iter(frames),
        ctx(&hub, 8),
    ));
    timeout(Duration::from_secs(5), task).await.expect("must not hang").unwrap();
    hub.snapshot().await.unwrap();

    let to_receiver = drain(&mut rx_receiver);
    assert_eq!(to_receiver.len(), 1);
    match to_receiver[0].as_ref() {
        Envelope::Chat(m) => {
            assert_eq!(m.payload, "hello");
            assert_eq!(m.sender_id, 10);
            assert_eq!(m.receiver_id, 20);
        }
        other => panic!("unexpected envelope {other:?}"),
    }

}

#[tokio::test(start_paused = true)]
async fn outbox_is_written_in_order() {
    let hub = Hub::spawn(64);
    let (wire_tx, mut wire_rx) = mpsc::channel::<Message>(64);
    let key = IdentityKey::employer(20);

    let conn = Connection::new(key, 8);
    let (close_tx, close_rx) = tokio::sync::oneshot::channel::<()>();
    let inbound = stream::once(async move {
        let _ = close_rx.await;
        Ok::<_, std::io::Error>(Message::Close(None))
    });
    let task = tokio::spawn(conn.run(PollSender::new(wire_tx), Box::pin(inbound), ctx(&hub, 8)));

    // wait for registration
    while hub.snapshot().await.unwrap().connections() == 0 {
        tokio::task::yield_now().await;
    }
    for id in 1..=3 {
        let mut n = notification(NotificationKind::Apply, 20);
        n.id = id;
        hub.push_notification(n).await;
    }
    hub.snapshot().await.unwrap();

    let mut seen = Vec::new();
    while seen.len() < 3 {
        match timeout(Duration::from_secs(1), wire_rx.recv()).await.unwrap().unwrap() {
            Message::Text(s) => {
                let v: serde_json::Value = serde_json::from_str(&s).unwrap();
                assert_eq!(v["type"], "notification");
                seen.push(v["payload"]["id"].as_i64().unwrap());
            }
            Message::Ping(_) => {}
            other => panic!("unexpected frame {other:?}"),
        }
    }
    assert_eq!(seen, vec![1, 2, 3]);

    close_tx.send(()).unwrap();
    timeout(Duration::from_secs(5), task).await.expect("must not hang").unwrap();
    assert_eq!(hub.snapshot().await.unwrap().connections(), 0);
}

#[tokio::test(start_paused = true)]
async fn stalled_writer_is_disconnected_as_slow_consumer() {
    let hub = Hub::spawn(64);
    // wire never drained: the write pump stalls after one frame
    let (wire_tx, _wire_rx) = mpsc::channel::<Message>(1);
    let key = IdentityKey::employer(20);

    let conn = Connection::new(key, 1);
    let task = tokio::spawn(conn.run(
        PollSender::new(wire_tx),
        stream::pending::<Inbound>(),
        ctx(&hub, 1),
    ));
    while hub.snapshot().await.unwrap().connections() == 0 {
        tokio::task::yield_now().await;
    }

    for _ in 0..10 {
        hub.push_notification(notification(NotificationKind::Apply, 20)).await;
        tokio::task::yield_now().await;
    }

    timeout(Duration::from_secs(5), task).await.expect("must not hang").unwrap();

    let snap = hub.snapshot().await.unwrap();
    assert_eq!(snap.stats.slow_consumers, 1);
    assert_eq!(snap.connections(), 0);
}

#[tokio::test]
async fn stopped_hub_refuses_registration() {
    let (hub, hub_handle) = Hub::new(4);
    drop(hub);
    let (wire_tx, _wire_rx) = mpsc::channel::<Message>(4);

    let conn = Connection::new(IdentityKey::applicant(1), 4);
    let lifecycle = conn.lifecycle();
    conn.run(PollSender::new(wire_tx), stream::pending::<Inbound>(), ctx(&hub_handle, 4))
        .await;

    assert_eq!(lifecycle.state(), ConnState::Closed);
}

/// Chat store whose inserts never complete.
struct StalledStore(Arc<MemoryDirectory>);

#[async_trait]
impl ChatStore for StalledStore {
    async fn chat(&self, chat_id: i64) -> HwResult<Chat> {
        self.0.chat(chat_id).await
    }

    async fn create_message(&self, _: i64, _: i64, _: bool, _: &str) -> HwResult<StoredMessage> {
        std::future::pending().await
    }
}

#[tokio::test(start_paused = true)]
async fn cancellation_interrupts_a_pending_chat_send() {
    let hub = Hub::spawn(64);
    let dir = Arc::new(MemoryDirectory::new());
    dir.insert_chat(Chat { id: 1, vacancy_id: 0, applicant_id: 10, employer_id: 20 });
    let mut ctx = ctx(&hub, 8);
    ctx.chat = Arc::new(ChatRelay::new(Arc::new(StalledStore(dir.clone())), dir, hub.clone(), 100));

    // peer gone: the first ping fails the write pump, which cancels the connection
    let (wire_tx, wire_rx) = mpsc::channel::<Message>(8);
    drop(wire_rx);

    let frames: Vec<Inbound> =
        vec![Ok(Message::Text(r#"{"type":"message","chat_id":1,"payload":"hello"}"#.into()))];
    let inbound = stream::iter(frames).chain(stream::pending());

    let conn = Connection::new(IdentityKey::applicant(10), 8);
    let lifecycle = conn.lifecycle();
    let started = Instant::now();
    let task = tokio::spawn(conn.run(PollSender::new(wire_tx), inbound, ctx));

    timeout(Duration::from_secs(30), task).await.expect("must not hang").unwrap();

    // stopped by the failed ping, well before the read deadline
    assert!(started.elapsed() < keepalive().pong_wait, "{:?}", started.elapsed());
    assert_eq!(lifecycle.state(), ConnState::Closed);
    assert_eq!(hub.snapshot().await.unwrap().connections(), 0);
}
