//! Inbound frame vector tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]


use hirewire_core::protocol::InboundFrame;

#[test]
fn inbound_vectors() {
    for v in vector_loader::load("inbound.json") {
        let got = InboundFrame::decode(&v.frame);
        match (&v.expect_error, got) {
            (Some(want), Err(e)) => {
                assert_eq!(e.client_code().as_str(), want.code, "{}", v.description);
            }
            (Some(_), Ok(frame)) => panic!("{}: expected error, got {frame:?}", v.description),
            (None, Err(e)) => panic!("{}: unexpected error {e}", v.description),
            (None, Ok(frame)) => match (v.expect.as_ref(), frame) {
                (Some(serde_json::Value::Null) | None, InboundFrame::Ignored) => {}
                (Some(want), InboundFrame::ChatSend { chat_id, payload }) => {
                    assert_eq!(want["chat_id"].as_i64(), Some(chat_id), "{}", v.description);
                    assert_eq!(want["payload"].as_str(), Some(payload.as_str()), "{}", v.description);
                }
                (want, frame) => panic!("{}: want {want:?}, got {frame:?}", v.description),
            },
        }
    }
}
