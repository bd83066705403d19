//! HTTP API tests driven through the router with `oneshot`.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use goal_breaker_api::{build_router, AppState, ServerConfig};
use goal_breaker_decomposer::{DecomposerError, GoalDecomposer, TextGenerator};
use goal_breaker_store::GoalStore;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

const GUITAR_ANSWER: &str = "1. Buy a guitar\n2. Learn basic chords\n";

struct FixedAnswer {
    answer: String,
    calls: AtomicUsize,
}

#[async_trait]
impl TextGenerator for FixedAnswer {
    async fn generate(&self, _: &str, _: &str) -> goal_breaker_decomposer::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.answer.clone())
    }
}

struct Offline;

#[async_trait]
impl TextGenerator for Offline {
    async fn generate(&self, _: &str, _: &str) -> goal_breaker_decomposer::Result<String> {
        Err(DecomposerError::DecompositionFailed(
            "connection refused".to_string(),
        ))
    }
}

fn app_with(generator: Arc<dyn TextGenerator>) -> Router {
    let store = GoalStore::memory().unwrap();
    let state = AppState::new(store, GoalDecomposer::new(generator));
    build_router(state, &ServerConfig::default())
}

fn app() -> Router {
    app_with(Arc::new(FixedAnswer {
        answer: GUITAR_ANSWER.to_string(),
        calls: AtomicUsize::new(0),
    }))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create(app: &Router, goal: &str) -> Value {
    let (status, body) = send(app, "POST", "/create-goal", Some(json!({ "goal": goal }))).await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

async fn subtask_ids(app: &Router, task_id: i64) -> Vec<i64> {
    let (_, body) = send(app, "GET", &format!("/tasks/{}/subtasks", task_id), None).await;
    body["subtasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["subtask_id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_home() {
    let (status, body) = send(&app(), "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "AI Smart Goal Breaker API is running");
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(&app(), "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store"]["status"], "healthy");
}

#[tokio::test]
async fn test_create_goal_returns_parsed_subtasks() {
    let app = app();
    let body = create(&app, "Learn guitar").await;

    assert_eq!(body["message"], "Goal created successfully");
    assert_eq!(body["subtasks"], json!(["Buy a guitar", "Learn basic chords"]));
    let task_id = body["task_id"].as_i64().unwrap();

    let (status, detail) = send(&app, "GET", &format!("/tasks/{}/subtasks", task_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["task_id"], task_id);
    assert_eq!(detail["task_title"], "Learn guitar");
    assert_eq!(detail["progress_percentage"], 0.0);
    let subtasks = detail["subtasks"].as_array().unwrap();
    assert_eq!(subtasks.len(), 2);
    assert_eq!(subtasks[0]["title"], "Buy a guitar");
    assert_eq!(subtasks[0]["status"], "pending");
    assert_eq!(subtasks[1]["title"], "Learn basic chords");
}

#[tokio::test]
async fn test_create_goal_requires_goal() {
    let generator = Arc::new(FixedAnswer {
        answer: GUITAR_ANSWER.to_string(),
        calls: AtomicUsize::new(0),
    });
    let app = app_with(generator.clone());

    for body in [json!({}), json!({ "goal": "" }), json!({ "goal": "   " })] {
        let (status, err) = send(&app, "POST", "/create-goal", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(err["error"], "Goal is required");
        assert_eq!(err["code"], "INVALID_INPUT");
    }

    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    let (_, goals) = send(&app, "GET", "/goals", None).await;
    assert_eq!(goals, json!([]));
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = app();
    let request = Request::builder()
        .method("POST")
        .uri("/create-goal")
        .header("content-type", "application/json")
        .body(Body::from("{\"goal\": "))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_goal_with_difficulty() {
    let app = app();
    let (status, _) = send(
        &app,
        "POST",
        "/create-goal",
        Some(json!({ "goal": "Run a marathon", "difficulty": "hard" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, err) = send(
        &app,
        "POST",
        "/create-goal",
        Some(json!({ "goal": "Run a marathon", "difficulty": "extreme" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], "INVALID_INPUT");

    let (_, goals) = send(&app, "GET", "/goals", None).await;
    let goals = goals.as_array().unwrap();
    assert_eq!(goals.len(), 1);
    assert_eq!(goals[0]["difficulty"], "hard");
}

#[tokio::test]
async fn test_decomposition_failure_keeps_goal() {
    let app = app_with(Arc::new(Offline));

    let (status, err) = send(&app, "POST", "/create-goal", Some(json!({ "goal": "Learn guitar" }))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(err["code"], "DECOMPOSITION_FAILED");

    let (_, goals) = send(&app, "GET", "/goals", None).await;
    let goals = goals.as_array().unwrap();
    assert_eq!(goals.len(), 1);
    assert_eq!(goals[0]["title"], "Learn guitar");
    assert_eq!(goals[0]["status"], "pending");
    assert_eq!(goals[0]["progress_percentage"], 0.0);

    let task_id = goals[0]["task_id"].as_i64().unwrap();
    assert!(subtask_ids(&app, task_id).await.is_empty());
}

#[tokio::test]
async fn test_list_goals_fields() {
    let app = app();
    let task_id = create(&app, "Learn guitar").await["task_id"].as_i64().unwrap();

    let (status, goals) = send(&app, "GET", "/goals", None).await;
    assert_eq!(status, StatusCode::OK);
    let goal = &goals[0];
    assert_eq!(goal["task_id"], task_id);
    assert_eq!(goal["title"], "Learn guitar");
    assert_eq!(goal["description"], "Learn guitar");
    assert_eq!(goal["difficulty"], "medium");
    assert_eq!(goal["status"], "pending");
    assert!(goal["created_at"].is_string());
}

#[tokio::test]
async fn test_subtask_status_drives_goal_status() {
    let app = app();
    let task_id = create(&app, "Learn guitar").await["task_id"].as_i64().unwrap();
    let ids = subtask_ids(&app, task_id).await;

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/subtask/{}", ids[0]),
        Some(json!({ "status": "completed" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Subtask updated successfully");
    assert_eq!(body["subtask_id"], ids[0]);
    assert_eq!(body["new_status"], "completed");
    assert_eq!(body["task_status"], "in_progress");

    let (_, goals) = send(&app, "GET", "/goals", None).await;
    assert_eq!(goals[0]["status"], "in_progress");
    assert_eq!(goals[0]["progress_percentage"], 50.0);

    let (_, body) = send(
        &app,
        "PATCH",
        &format!("/subtask/{}", ids[1]),
        Some(json!({ "status": "completed" })),
    )
    .await;
    assert_eq!(body["task_status"], "completed");

    let (_, detail) = send(&app, "GET", &format!("/tasks/{}/subtasks", task_id), None).await;
    assert_eq!(detail["progress_percentage"], 100.0);
}

#[tokio::test]
async fn test_repeated_status_is_idempotent() {
    let app = app();
    let task_id = create(&app, "Learn guitar").await["task_id"].as_i64().unwrap();
    let ids = subtask_ids(&app, task_id).await;
    let uri = format!("/subtask/{}", ids[0]);

    let (_, first) = send(&app, "PATCH", &uri, Some(json!({ "status": "completed" }))).await;
    let (_, second) = send(&app, "PATCH", &uri, Some(json!({ "status": "completed" }))).await;
    assert_eq!(first["task_status"], second["task_status"]);
}

#[tokio::test]
async fn test_invalid_subtask_status_changes_nothing() {
    let app = app();
    let task_id = create(&app, "Learn guitar").await["task_id"].as_i64().unwrap();
    let ids = subtask_ids(&app, task_id).await;

    let (status, err) = send(
        &app,
        "PATCH",
        &format!("/subtask/{}", ids[0]),
        Some(json!({ "status": "bogus" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"], "Invalid status value");

    let (status, _) = send(&app, "PATCH", &format!("/subtask/{}", ids[0]), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, detail) = send(&app, "GET", &format!("/tasks/{}/subtasks", task_id), None).await;
    assert_eq!(detail["subtasks"][0]["status"], "pending");
    let (_, goals) = send(&app, "GET", "/goals", None).await;
    assert_eq!(goals[0]["status"], "pending");
}

#[tokio::test]
async fn test_unknown_subtask_is_not_found() {
    let (status, err) = send(
        &app(),
        "PATCH",
        "/subtask/999",
        Some(json!({ "status": "completed" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["error"], "Subtask not found");
}

#[tokio::test]
async fn test_unknown_task_subtasks_is_not_found() {
    let (status, err) = send(&app(), "GET", "/tasks/42/subtasks", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["error"], "Task not found");
    assert_eq!(err["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_non_integer_id_is_not_found() {
    let app = app();
    let (status, _) = send(&app, "GET", "/tasks/abc/subtasks", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "DELETE", "/task/abc", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_goal_cascades() {
    let app = app();
    let task_id = create(&app, "Learn guitar").await["task_id"].as_i64().unwrap();
    let ids = subtask_ids(&app, task_id).await;

    let (status, body) = send(&app, "DELETE", &format!("/task/{}", task_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Task and its subtasks deleted successfully");
    assert_eq!(body["task_id"], task_id);

    let (status, _) = send(&app, "GET", &format!("/tasks/{}/subtasks", task_id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/subtask/{}", ids[0]),
        Some(json!({ "status": "completed" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_unknown_goal_is_not_found() {
    let app = app();
    let task_id = create(&app, "Learn guitar").await["task_id"].as_i64().unwrap();

    let (status, err) = send(&app, "DELETE", "/task/9999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["error"], "Task not found");

    let (_, goals) = send(&app, "GET", "/goals", None).await;
    assert_eq!(goals.as_array().unwrap().len(), 1);
    assert_eq!(subtask_ids(&app, task_id).await.len(), 2);
}

#[tokio::test]
async fn test_update_goal() {
    let app = app();
    let task_id = create(&app, "Learn guitar").await["task_id"].as_i64().unwrap();
    let uri = format!("/task/{}", task_id);

    let (status, body) = send(&app, "PATCH", &uri, Some(json!({ "title": "Play guitar" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Task updated successfully");
    assert_eq!(body["task_id"], task_id);
    assert_eq!(body["title"], "Play guitar");
    assert_eq!(body["description"], "Learn guitar");

    // An empty title leaves the title alone.
    let (status, body) = send(
        &app,
        "PATCH",
        &uri,
        Some(json!({ "title": "", "description": "Thirty minutes a day" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Play guitar");
    assert_eq!(body["description"], "Thirty minutes a day");
}

#[tokio::test]
async fn test_update_goal_needs_a_field() {
    let app = app();
    let task_id = create(&app, "Learn guitar").await["task_id"].as_i64().unwrap();

    for body in [json!({}), json!({ "title": "", "description": "" })] {
        let (status, err) = send(&app, "PATCH", &format!("/task/{}", task_id), Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(err["error"], "Nothing to update");
    }

    let (status, _) = send(&app, "PATCH", "/task/9999", Some(json!({ "title": "x" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
