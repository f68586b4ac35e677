//! Upgrade/Auth gate.
//!
//! Responsibilities:
//! - Read the session cookie and resolve it before any upgrade (401 / 403)
//! - Upgrade HTTP -> WS (500 when the upgrade request is unusable)
//! - Hand the socket to a `Connection` inside a per-connection span
//!
//! No `Connection` is ever created for a failed auth.

use axum::{
    extract::{
        ws::{rejection::WebSocketUpgradeRejection, WebSocketUpgrade},
        State,
    },
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
};
use futures_util::StreamExt;
use tracing::Instrument;

use hirewire_core::error::{HirewireError, Result};
use hirewire_core::identity::IdentityKey;

use crate::app_state::AppState;
use crate::error::ApiError;
use crate::transport::connection::Connection;

/// Extract a cookie value from every `Cookie` header.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Resolve the request's session to an identity.
pub async fn authenticate(app: &AppState, headers: &HeaderMap) -> Result<IdentityKey> {
    let token = cookie_value(headers, &app.cfg().gateway.session_cookie)
        .ok_or(HirewireError::Unauthorized)?;

    match app.sessions().resolve(&token).await {
        Ok(key) => Ok(key),
        Err(e @ HirewireError::Forbidden(_)) => Err(e),
        Err(e) => {
            tracing::debug!(error = %e, "session resolve failed");
            Err(HirewireError::Unauthorized)
        }
    }
}

// --------------------
// Entry
// --------------------
pub async fn ws_connect(
    State(app): State<AppState>,
    headers: HeaderMap,
    ws: std::result::Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    let key = match authenticate(&app, &headers).await {
        Ok(key) => key,
        Err(e) => return ApiError(e).into_response(),
    };

    let ws = match ws {
        Ok(ws) => ws,
        Err(rejection) => {
            tracing::error!(user_id = key.user_id, role = %key.role, error = %rejection.body_text(), "websocket upgrade failed");
            return ApiError(HirewireError::Transport(rejection.body_text())).into_response();
        }
    };

    let ctx = app.connection_ctx();
    ws.on_failed_upgrade(move |e| {
        tracing::warn!(user_id = key.user_id, role = %key.role, error = %e, "websocket handshake failed after response");
    })
    .on_upgrade(move |socket| {
        let conn = Connection::new(key, ctx.outbox_capacity);
        let span = tracing::info_span!("ws_conn", conn_id = %conn.id(), user_id = key.user_id, role = %key.role);
        async move {
            let (sink, stream) = socket.split();
            conn.run(sink, stream, ctx).await;
        }
        .instrument(span)
    })
}
