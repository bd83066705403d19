//! Error types for goal decomposition.

use thiserror::Error;

/// A specialized `Result` type for decomposition operations.
pub type Result<T> = std::result::Result<T, DecomposerError>;

/// Errors raised while turning a goal into subtasks.
#[derive(Debug, Error)]
pub enum DecomposerError {
    /// The goal text was blank; callers should reject it before decomposing.
    #[error("{0}")]
    InvalidInput(String),

    /// The text-generation service could not produce an answer.
    #[error("Decomposition failed: {0}")]
    DecompositionFailed(String),

    /// The client could not be built from its configuration.
    #[error("Invalid generator configuration: {0}")]
    Config(String),
}

impl From<reqwest::Error> for DecomposerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DecomposerError::DecompositionFailed(format!("request timed out: {}", err))
        } else {
            DecomposerError::DecompositionFailed(err.to_string())
        }
    }
}
