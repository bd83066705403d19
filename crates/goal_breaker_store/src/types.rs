//! Goal and subtask data model.
//!
//! A [`Goal`] owns an ordered set of [`Subtask`]s. The goal's
//! [`GoalStatus`] and its progress percentage are never set by clients;
//! both are derived from the multiset of subtask statuses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::StoreError;

/// Identifier of a persisted goal.
pub type GoalId = i64;

/// Identifier of a persisted subtask.
pub type SubtaskId = i64;

/// How hard a goal is expected to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl FromStr for Difficulty {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(StoreError::InvalidInput(format!(
                "Invalid difficulty value: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Completion state of a single subtask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubtaskStatus {
    #[default]
    Pending,
    Completed,
}

impl SubtaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubtaskStatus::Pending => "pending",
            SubtaskStatus::Completed => "completed",
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, SubtaskStatus::Completed)
    }
}

impl FromStr for SubtaskStatus {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(SubtaskStatus::Pending),
            "completed" => Ok(SubtaskStatus::Completed),
            _ => Err(StoreError::InvalidInput("Invalid status value".to_string())),
        }
    }
}

impl fmt::Display for SubtaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate state of a goal, derived from its subtasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalStatus::Pending => "pending",
            GoalStatus::InProgress => "in_progress",
            GoalStatus::Completed => "completed",
        }
    }

    /// Derives the goal status from subtask counts.
    ///
    /// - non-empty and every subtask completed: `Completed`
    /// - at least one, but not every, subtask completed: `InProgress`
    /// - nothing completed (including no subtasks at all): `Pending`
    pub fn derive(completed: usize, total: usize) -> Self {
        if total > 0 && completed == total {
            GoalStatus::Completed
        } else if completed > 0 {
            GoalStatus::InProgress
        } else {
            GoalStatus::Pending
        }
    }

    /// Derives the goal status from a full scan of subtask statuses.
    pub fn from_subtasks<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = SubtaskStatus>,
    {
        let (completed, total) = statuses
            .into_iter()
            .fold((0, 0), |(completed, total), status| {
                (completed + usize::from(status.is_completed()), total + 1)
            });
        Self::derive(completed, total)
    }
}

impl FromStr for GoalStatus {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(GoalStatus::Pending),
            "in_progress" => Ok(GoalStatus::InProgress),
            "completed" => Ok(GoalStatus::Completed),
            other => Err(StoreError::InvalidInput(format!(
                "Invalid goal status value: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Percentage of completed subtasks, rounded to two decimals.
///
/// Ties round to even, so `1/32` gives `3.12`. An empty subtask set is `0.0`.
pub fn progress_percentage(completed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = 100.0 * completed as f64 / total as f64;
    (raw * 100.0).round_ties_even() / 100.0
}

/// A user-submitted objective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: GoalId,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub status: GoalStatus,
    pub created_at: DateTime<Utc>,
}

/// One actionable unit of a goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: SubtaskId,
    pub goal_id: GoalId,
    pub title: String,
    pub status: SubtaskStatus,
    pub created_at: DateTime<Utc>,
}

/// A goal together with progress computed from its live subtasks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalSummary {
    pub goal: Goal,
    pub total_subtasks: usize,
    pub completed_subtasks: usize,
    pub progress_percentage: f64,
}

/// A goal with its subtasks in insertion order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalDetail {
    pub goal: Goal,
    pub progress_percentage: f64,
    pub subtasks: Vec<Subtask>,
}

/// Result of changing one subtask's status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusChange {
    pub subtask: Subtask,
    pub goal_status: GoalStatus,
}

/// Fields to change on a goal; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoalUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl GoalUpdate {
    /// Builds an update where empty strings count as "not provided".
    pub fn non_empty(title: Option<String>, description: Option<String>) -> Self {
        Self {
            title: title.filter(|t| !t.is_empty()),
            description: description.filter(|d| !d.is_empty()),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none()
    }
}
