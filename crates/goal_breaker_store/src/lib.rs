//! # Goal Breaker Store
//!
//! Persistence for goals and the ordered subtasks they are broken into.
//!
//! A goal's status is never written by clients. It is a pure function of
//! its subtasks' statuses, recomputed from a full rescan whenever a
//! subtask changes:
//!
//! | Subtasks                     | Goal status   |
//! |------------------------------|---------------|
//! | none, or none completed      | `pending`     |
//! | some, but not all, completed | `in_progress` |
//! | all completed                | `completed`   |
//!
//! ## Quick Start
//!
//! ```rust
//! use goal_breaker_store::{Difficulty, GoalStore, SubtaskStatus};
//!
//! # fn main() -> goal_breaker_store::Result<()> {
//! let mut store = GoalStore::memory()?;
//! let goal = store.create_goal("Learn guitar", "Learn guitar", Difficulty::Medium)?;
//! let subtasks = store.add_subtasks(goal.id, ["Buy a guitar", "Learn basic chords"])?;
//!
//! let change = store.set_subtask_status(subtasks[0].id, SubtaskStatus::Completed)?;
//! assert_eq!(change.goal_status.as_str(), "in_progress");
//!
//! let detail = store.get_subtasks(goal.id)?;
//! assert_eq!(detail.progress_percentage, 50.0);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod store;
pub mod types;

pub use config::StoreConfig;
pub use error::{Result, StoreError};
pub use store::GoalStore;
pub use types::{
    progress_percentage, Difficulty, Goal, GoalDetail, GoalId, GoalStatus, GoalSummary,
    GoalUpdate, StatusChange, Subtask, SubtaskId, SubtaskStatus,
};
