//! Subtask endpoints

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::Json;
use goal_breaker_store::{GoalId, GoalStatus, Subtask, SubtaskId, SubtaskStatus};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SubtaskDto {
    pub subtask_id: SubtaskId,
    pub title: String,
    pub status: SubtaskStatus,
}

impl From<Subtask> for SubtaskDto {
    fn from(subtask: Subtask) -> Self {
        Self {
            subtask_id: subtask.id,
            title: subtask.title,
            status: subtask.status,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubtasksResponse {
    pub task_id: GoalId,
    pub task_title: String,
    pub progress_percentage: f64,
    pub subtasks: Vec<SubtaskDto>,
}

/// Request to change a subtask's status
#[derive(Debug, Deserialize)]
pub struct UpdateSubtaskRequest {
    /// `pending` or `completed`
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UpdateSubtaskResponse {
    pub message: String,
    pub subtask_id: SubtaskId,
    pub new_status: SubtaskStatus,
    pub task_status: GoalStatus,
}

/// Get a goal's subtasks in creation order
///
/// GET /tasks/{id}/subtasks
pub async fn get_subtasks(
    State(state): State<AppState>,
    path: std::result::Result<Path<GoalId>, PathRejection>,
) -> Result<Json<SubtasksResponse>> {
    let Path(goal_id) = path?;
    let detail = state.store.lock().await.get_subtasks(goal_id)?;

    Ok(Json(SubtasksResponse {
        task_id: detail.goal.id,
        task_title: detail.goal.title,
        progress_percentage: detail.progress_percentage,
        subtasks: detail.subtasks.into_iter().map(SubtaskDto::from).collect(),
    }))
}

/// Set a subtask's status and recompute its goal's status
///
/// PATCH /subtask/{id}
///
/// The status value is checked before the subtask is looked up.
pub async fn update_subtask_status(
    State(state): State<AppState>,
    path: std::result::Result<Path<SubtaskId>, PathRejection>,
    payload: std::result::Result<Json<UpdateSubtaskRequest>, JsonRejection>,
) -> Result<Json<UpdateSubtaskResponse>> {
    let Path(subtask_id) = path?;
    let Json(req) = payload?;

    let status: SubtaskStatus = req.status.as_deref().unwrap_or_default().parse()?;
    let change = state
        .store
        .lock()
        .await
        .set_subtask_status(subtask_id, status)?;

    Ok(Json(UpdateSubtaskResponse {
        message: "Subtask updated successfully".to_string(),
        subtask_id: change.subtask.id,
        new_status: change.subtask.status,
        task_status: change.goal_status,
    }))
}
