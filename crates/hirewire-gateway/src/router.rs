//! Axum router wiring (HTTP -> WS upgrade).

use axum::{
    routing::{get, post},
    Router,
};

use crate::{api, app_state::AppState, ops, transport};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/ws/connect", get(transport::ws::ws_connect))
        .route("/v1/notifications", post(api::publish_notification))
        .route("/v1/stats", get(ops::stats))
        .route("/healthz", get(ops::healthz))
        .with_state(state)
}
