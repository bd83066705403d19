//! REST endpoints for the Goal Breaker API.
//!
//! ## Endpoints
//!
//! - `GET    /` - Liveness message
//! - `GET    /health` - Store reachability
//! - `POST   /create-goal` - Submit a goal and decompose it into subtasks
//! - `GET    /goals` - List goals with derived status and progress
//! - `PATCH  /task/{id}` - Edit a goal's title or description
//! - `DELETE /task/{id}` - Delete a goal and its subtasks
//! - `GET    /tasks/{id}/subtasks` - A goal's subtasks and progress
//! - `PATCH  /subtask/{id}` - Set a subtask's status

mod goals;
mod health;
mod subtasks;

pub use goals::*;
pub use health::*;
pub use subtasks::*;

use crate::state::AppState;
use axum::{
    routing::{get, patch, post},
    Router,
};

/// Create REST API router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(health::home))
        .route("/health", get(health::health_check))
        // Goals
        .route("/create-goal", post(goals::create_goal))
        .route("/goals", get(goals::list_goals))
        .route(
            "/task/{id}",
            patch(goals::update_goal).delete(goals::delete_goal),
        )
        // Subtasks
        .route("/tasks/{id}/subtasks", get(subtasks::get_subtasks))
        .route("/subtask/{id}", patch(subtasks::update_subtask_status))
}
