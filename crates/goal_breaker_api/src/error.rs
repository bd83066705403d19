//! Error types for the Goal Breaker API server.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use goal_breaker_decomposer::DecomposerError;
use goal_breaker_store::StoreError;
use serde::Serialize;
use thiserror::Error;

/// A specialized `Result` type for API operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Every failure a request can end in.
#[derive(Debug, Error)]
pub enum Error {
    /// A request field was missing or malformed.
    #[error("{0}")]
    InvalidInput(String),

    /// The referenced goal or subtask does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The text-generation service failed or was unreachable.
    #[error("{0}")]
    DecompositionFailed(String),

    /// The database rejected an operation.
    #[error("Storage error: {0}")]
    Storage(String),

    /// The server could not be configured.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An unexpected internal server error.
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// JSON body returned for every failed request.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable message.
    pub error: String,
    /// Machine-readable code.
    pub code: String,
}

impl Error {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::DecompositionFailed(_)
            | Error::Storage(_)
            | Error::Config(_)
            | Error::Internal(_)
            | Error::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns a machine-readable error code string for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::InvalidInput(_) => "INVALID_INPUT",
            Error::NotFound(_) => "NOT_FOUND",
            Error::DecompositionFailed(_) => "DECOMPOSITION_FAILED",
            Error::Storage(_) => "STORAGE_ERROR",
            Error::Config(_) => "CONFIG_ERROR",
            Error::Internal(_) => "INTERNAL_ERROR",
            Error::Io(_) => "IO_ERROR",
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        }

        let body = ErrorResponse {
            error: self.to_string(),
            code: self.error_code().to_string(),
        };
        (status, axum::Json(body)).into_response()
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(msg) => Error::NotFound(msg),
            StoreError::InvalidInput(msg) => Error::InvalidInput(msg),
            StoreError::Sqlite(e) => Error::Storage(e.to_string()),
        }
    }
}

impl From<DecomposerError> for Error {
    fn from(err: DecomposerError) -> Self {
        match err {
            DecomposerError::InvalidInput(msg) => Error::InvalidInput(msg),
            e @ DecomposerError::DecompositionFailed(_) => Error::DecompositionFailed(e.to_string()),
            DecomposerError::Config(msg) => Error::Config(msg),
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidInput(rejection.body_text())
    }
}

// Routes only match integer ids.
impl From<PathRejection> for Error {
    fn from(_: PathRejection) -> Self {
        Error::NotFound("Resource not found".to_string())
    }
}
