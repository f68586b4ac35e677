//! Authenticated HTTP surface for publishing notifications.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use hirewire_core::error::HirewireError;
use hirewire_core::model::{Notification, NotificationKind};

use crate::app_state::AppState;
use crate::error::ApiError;
use crate::transport::ws::authenticate;

/// Request body of `POST /v1/notifications`. The sender is never taken from
/// the body; unknown fields (a forged `sender_id`) are ignored.
#[derive(Debug, Deserialize)]
pub struct NotificationRequest {
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub receiver_id: i64,
    pub object_id: i64,
    #[serde(default)]
    pub resume_id: i64,
}

/// `POST /v1/notifications`: persist a notification from the session's
/// identity and push it live.
///
/// 401/403 exactly like the websocket gate, 201 with the preview, 204 when
/// the notification was skipped (self-addressed).
pub async fn publish_notification(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<NotificationRequest>, JsonRejection>,
) -> Response {
    let sender = match authenticate(&state, &headers).await {
        Ok(key) => key,
        Err(e) => return ApiError(e).into_response(),
    };
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => {
            return ApiError(HirewireError::BadRequest(rejection.body_text())).into_response()
        }
    };

    let notification = Notification {
        kind: req.kind,
        sender_id: sender.user_id,
        sender_role: sender.role,
        receiver_id: req.receiver_id,
        object_id: req.object_id,
        resume_id: req.resume_id,
    };

    match state.notifications().notify(&notification).await {
        Ok(Some(preview)) => (StatusCode::CREATED, Json(preview)).into_response(),
        Ok(None) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}
