//! The shared application state for the Goal Breaker API server.

use goal_breaker_decomposer::GoalDecomposer;
use goal_breaker_store::GoalStore;
use std::sync::Arc;
use tokio::sync::Mutex;

/// State shared by all handlers.
///
/// The store sits behind a `Mutex` because a SQLite connection serves one
/// caller at a time. Handlers hold the lock only for the store call itself,
/// never across the model request.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<GoalStore>>,
    pub decomposer: Arc<GoalDecomposer>,
}

impl AppState {
    pub fn new(store: GoalStore, decomposer: GoalDecomposer) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            decomposer: Arc::new(decomposer),
        }
    }
}
