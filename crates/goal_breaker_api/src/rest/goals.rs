//! Goal submission and goal CRUD endpoints

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use goal_breaker_store::{Difficulty, GoalId, GoalStatus, GoalSummary, GoalUpdate};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::state::AppState;

/// Request to submit a new goal
#[derive(Debug, Deserialize)]
pub struct CreateGoalRequest {
    /// Free-text goal; also used as the initial title and description
    #[serde(default)]
    pub goal: Option<String>,
    /// `easy`, `medium` or `hard`; `medium` when absent
    #[serde(default)]
    pub difficulty: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateGoalResponse {
    pub message: String,
    pub task_id: GoalId,
    /// Subtask titles in the order they were stored
    pub subtasks: Vec<String>,
}

/// One goal in the list view
#[derive(Debug, Serialize)]
pub struct GoalResponse {
    pub task_id: GoalId,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub status: GoalStatus,
    pub progress_percentage: f64,
    pub created_at: DateTime<Utc>,
}

impl From<GoalSummary> for GoalResponse {
    fn from(summary: GoalSummary) -> Self {
        let goal = summary.goal;
        Self {
            task_id: goal.id,
            title: goal.title,
            description: goal.description,
            difficulty: goal.difficulty,
            status: goal.status,
            progress_percentage: summary.progress_percentage,
            created_at: goal.created_at,
        }
    }
}

/// Request to edit a goal; empty strings count as absent
#[derive(Debug, Deserialize)]
pub struct UpdateGoalRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UpdateGoalResponse {
    pub message: String,
    pub task_id: GoalId,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteGoalResponse {
    pub message: String,
    pub task_id: GoalId,
}

/// Submit a goal and break it into subtasks
///
/// POST /create-goal
///
/// The goal row is written before the model is called and is kept if the
/// call fails, leaving a goal with no subtasks.
pub async fn create_goal(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateGoalRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateGoalResponse>)> {
    let Json(req) = payload?;

    let goal_text = req
        .goal
        .filter(|g| !g.trim().is_empty())
        .ok_or_else(|| Error::InvalidInput("Goal is required".to_string()))?;
    let difficulty = match req.difficulty.as_deref() {
        Some(d) if !d.is_empty() => d.parse::<Difficulty>()?,
        _ => Difficulty::default(),
    };

    let goal = {
        let store = state.store.lock().await;
        store.create_goal(&goal_text, &goal_text, difficulty)?
    };
    info!(goal_id = goal.id, %difficulty, "goal submitted");

    let titles = state
        .decomposer
        .decompose(&goal_text)
        .await
        .inspect_err(|e| warn!(goal_id = goal.id, error = %e, "goal kept without subtasks"))?;

    {
        let mut store = state.store.lock().await;
        store.add_subtasks(goal.id, &titles)?;
    }

    Ok((
        StatusCode::CREATED,
        Json(CreateGoalResponse {
            message: "Goal created successfully".to_string(),
            task_id: goal.id,
            subtasks: titles,
        }),
    ))
}

/// List every goal with its derived status and progress
///
/// GET /goals
pub async fn list_goals(State(state): State<AppState>) -> Result<Json<Vec<GoalResponse>>> {
    let summaries = state.store.lock().await.list_goals()?;
    Ok(Json(summaries.into_iter().map(GoalResponse::from).collect()))
}

/// Edit a goal's title and/or description
///
/// PATCH /task/{id}
pub async fn update_goal(
    State(state): State<AppState>,
    path: std::result::Result<Path<GoalId>, PathRejection>,
    payload: std::result::Result<Json<UpdateGoalRequest>, JsonRejection>,
) -> Result<Json<UpdateGoalResponse>> {
    let Path(goal_id) = path?;
    let Json(req) = payload?;

    let update = GoalUpdate::non_empty(req.title, req.description);
    let goal = state.store.lock().await.update_goal(goal_id, update)?;

    Ok(Json(UpdateGoalResponse {
        message: "Task updated successfully".to_string(),
        task_id: goal.id,
        title: goal.title,
        description: goal.description,
    }))
}

/// Delete a goal and all of its subtasks
///
/// DELETE /task/{id}
pub async fn delete_goal(
    State(state): State<AppState>,
    path: std::result::Result<Path<GoalId>, PathRejection>,
) -> Result<Json<DeleteGoalResponse>> {
    let Path(goal_id) = path?;

    state.store.lock().await.delete_goal(goal_id)?;
    info!(goal_id, "goal deleted");

    Ok(Json(DeleteGoalResponse {
        message: "Task and its subtasks deleted successfully".to_string(),
        task_id: goal_id,
    }))
}
