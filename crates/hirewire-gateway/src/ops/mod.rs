//! Operational HTTP endpoints.
//!
//! - `/healthz`   : liveness
//! - `/v1/stats`  : live connection counts and delivery counters

use axum::{extract::State, http::StatusCode, response::{IntoResponse, Response}, Json};
use serde_json::json;

use crate::app_state::AppState;
use crate::error::ApiError;

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub async fn stats(State(state): State<AppState>) -> Response {
    let snap = match state.hub().snapshot().await {
        Ok(snap) => snap,
        Err(e) => return ApiError(e).into_response(),
    };

    let identities: Vec<_> = snap
        .members
        .iter()
        .map(|(key, ids)| json!({ "user_id": key.user_id, "role": key.role, "connections": ids.len() }))
        .collect();

    Json(json!({
        "connections": snap.connections(),
        "identities": identities,
        "counters": snap.stats,
    }))
    .into_response()
}
