//! Shared error type across hirewire crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input / malformed message.
    BadRequest,
    /// Missing or unknown session.
    Unauthorized,
    /// Authenticated, but the identity cannot use this surface.
    Forbidden,
    /// Referenced entity does not exist.
    NotFound,
    /// Not allowed for this identity (e.g. not a chat participant).
    NotAllowed,
    /// Unsupported config/protocol version.
    UnsupportedVersion,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::Unauthorized => "UNAUTHORIZED",
            ClientCode::Forbidden => "FORBIDDEN",
            ClientCode::NotFound => "NOT_FOUND",
            ClientCode::NotAllowed => "NOT_ALLOWED",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, HirewireError>;

/// Unified error type used by core, gateway and collaborators.
#[derive(Debug, Error)]
pub enum HirewireError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("not allowed: {0}")]
    NotAllowed(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("persistence: {0}")]
    Persistence(String),
    #[error("transport: {0}")]
    Transport(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl HirewireError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            HirewireError::BadRequest(_) => ClientCode::BadRequest,
            HirewireError::Unauthorized => ClientCode::Unauthorized,
            HirewireError::Forbidden(_) => ClientCode::Forbidden,
            HirewireError::NotFound(_) => ClientCode::NotFound,
            HirewireError::NotAllowed(_) => ClientCode::NotAllowed,
            HirewireError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            HirewireError::Persistence(_)
            | HirewireError::Transport(_)
            | HirewireError::Internal(_) => ClientCode::Internal,
        }
    }

    /// Message safe to show a client. Storage and transport details stay in logs.
    pub fn public_message(&self) -> String {
        match self {
            HirewireError::Persistence(_)
            | HirewireError::Transport(_)
            | HirewireError::Internal(_) => "internal error".to_string(),
            other => other.to_string(),
        }
    }
}
