//! # Goal Breaker Decomposer
//!
//! Turns a free-text goal into an ordered list of actionable subtask
//! titles by asking a text-generation model for a numbered list and
//! parsing its answer line by line.
//!
//! The model sits behind the [`TextGenerator`] trait. [`GroqClient`] is
//! the production implementation; tests plug in their own.
//!
//! ```rust,ignore
//! use goal_breaker_decomposer::{GoalDecomposer, GroqClient, GroqConfig};
//! use std::sync::Arc;
//!
//! let client = GroqClient::new(GroqConfig::from_env())?;
//! let decomposer = GoalDecomposer::new(Arc::new(client));
//! let titles = decomposer.decompose("Learn guitar").await?;
//! ```

pub mod client;
pub mod decomposer;
pub mod error;
pub mod parse;

use async_trait::async_trait;

pub use client::{GroqClient, GroqConfig};
pub use decomposer::{build_prompt, GoalDecomposer, SYSTEM_PROMPT};
pub use error::{DecomposerError, Result};
pub use parse::{parse_line, parse_subtasks};

/// A source of free text for a system + user message pair.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Produce the model's answer to `user_prompt` under `system_prompt`.
    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;
}
