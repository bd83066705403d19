//! The goal decomposition pipeline.

use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{DecomposerError, Result};
use crate::parse::parse_subtasks;
use crate::TextGenerator;

/// System message sent with every decomposition request.
pub const SYSTEM_PROMPT: &str = "You are a helpful productivity assistant.";

/// Build the user prompt embedding the goal text.
pub fn build_prompt(goal_text: &str) -> String {
    format!(
        "You are an AI productivity assistant.\n\
         Break the following goal into 7-10 small daily actionable tasks.\n\
         Return output as a numbered list only.\n\
         \n\
         Goal: {}\n",
        goal_text
    )
}

/// Turns free-text goals into ordered subtask titles.
///
/// One generator call per goal. Failures are returned to the caller as
/// [`DecomposerError::DecompositionFailed`] and never retried here.
#[derive(Clone)]
pub struct GoalDecomposer {
    generator: Arc<dyn TextGenerator>,
}

impl GoalDecomposer {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Decompose `goal_text` into subtask titles in the order the model gave them.
    ///
    /// An answer with no usable lines yields an empty list, not an error.
    pub async fn decompose(&self, goal_text: &str) -> Result<Vec<String>> {
        if goal_text.trim().is_empty() {
            return Err(DecomposerError::InvalidInput("Goal is required".to_string()));
        }

        let raw = self
            .generator
            .generate(SYSTEM_PROMPT, &build_prompt(goal_text))
            .await?;
        debug!(bytes = raw.len(), "model answered");

        let titles = parse_subtasks(&raw);
        info!(count = titles.len(), "goal decomposed");
        Ok(titles)
    }
}

impl std::fmt::Debug for GoalDecomposer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoalDecomposer").finish_non_exhaustive()
    }
}
