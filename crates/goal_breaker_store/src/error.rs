//! Error types for the goal store.

use thiserror::Error;

/// A specialized `Result` type for goal store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors produced by the goal store and the data model.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The referenced goal or subtask does not exist.
    #[error("{0}")]
    NotFound(String),

    /// A caller supplied a value the model does not accept.
    #[error("{0}")]
    InvalidInput(String),

    /// An error from the underlying SQLite database.
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl StoreError {
    /// Returns `true` if the error was caused by the caller rather than the backend.
    pub fn is_client_error(&self) -> bool {
        matches!(self, StoreError::NotFound(_) | StoreError::InvalidInput(_))
    }
}
