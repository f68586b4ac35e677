//! HTTP polish for the shared error type.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use hirewire_core::error::{ClientCode, HirewireError};

/// `HirewireError` rendered as a JSON HTTP response.
#[derive(Debug)]
pub struct ApiError(pub HirewireError);

impl From<HirewireError> for ApiError {
    fn from(e: HirewireError) -> Self {
        Self(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0.client_code() {
            ClientCode::BadRequest | ClientCode::UnsupportedVersion => StatusCode::BAD_REQUEST,
            ClientCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ClientCode::Forbidden | ClientCode::NotAllowed => StatusCode::FORBIDDEN,
            ClientCode::NotFound => StatusCode::NOT_FOUND,
            ClientCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({
            "error": self.0.client_code().as_str(),
            "message": self.0.public_message(),
        }));
        (status, body).into_response()
    }
}
