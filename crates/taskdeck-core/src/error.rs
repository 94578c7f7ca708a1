//! Shared error type across taskdeck crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input / malformed request.
    BadRequest,
    /// Malformed document id.
    InvalidId,
    /// Persistence backend failure.
    StoreUnavailable,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::InvalidId => "INVALID_ID",
            ClientCode::StoreUnavailable => "STORE_UNAVAILABLE",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, TaskdeckError>;

/// Unified error type used by core and server.
#[derive(Debug, Error)]
pub enum TaskdeckError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("invalid id: {0}")]
    InvalidId(String),
    #[error("store: {0}")]
    Store(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl TaskdeckError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            TaskdeckError::BadRequest(_) => ClientCode::BadRequest,
            TaskdeckError::InvalidId(_) => ClientCode::InvalidId,
            TaskdeckError::Store(_) => ClientCode::StoreUnavailable,
            TaskdeckError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            TaskdeckError::Internal(_) => ClientCode::Internal,
        }
    }
}
