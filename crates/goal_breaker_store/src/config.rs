//! Configuration for the goal store.

use std::path::PathBuf;

/// Environment variable holding the SQLite database path.
pub const ENV_DATABASE_PATH: &str = "GOAL_BREAKER_DB";

/// In-memory database marker understood by SQLite.
pub const MEMORY_DATABASE: &str = ":memory:";

/// Configuration for opening a [`GoalStore`](crate::GoalStore).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Path of the SQLite database file, or `:memory:`.
    pub db_path: PathBuf,
    /// How long a writer waits on a locked database before failing, in milliseconds.
    pub busy_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("goal_breaker.db"),
            busy_timeout_ms: 5000,
        }
    }
}

impl StoreConfig {
    /// Returns a configuration for a private in-memory database.
    pub fn memory() -> Self {
        Self {
            db_path: PathBuf::from(MEMORY_DATABASE),
            ..Default::default()
        }
    }

    /// Loads the configuration from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(path) = std::env::var(ENV_DATABASE_PATH) {
            if !path.trim().is_empty() {
                config.db_path = PathBuf::from(path);
            }
        }
        config
    }

    pub fn with_db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.db_path = path.into();
        self
    }

    pub fn is_memory(&self) -> bool {
        self.db_path.as_os_str() == MEMORY_DATABASE
    }
}
