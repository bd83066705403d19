//! SQLite-backed goal store.
//!
//! Goals live in the `tasks` table and subtasks in `subtasks`, linked by a
//! cascading foreign key. Multi-row operations run inside a single
//! `IMMEDIATE` transaction so a reader never sees a goal status that
//! disagrees with its subtasks.

use chrono::Utc;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use std::time::Duration;
use tracing::{debug, info};

use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use crate::types::{
    progress_percentage, Difficulty, Goal, GoalDetail, GoalId, GoalStatus, GoalSummary,
    GoalUpdate, StatusChange, Subtask, SubtaskId, SubtaskStatus,
};

const TASK_NOT_FOUND: &str = "Task not found";
const SUBTASK_NOT_FOUND: &str = "Subtask not found";

const GOAL_COLUMNS: &str = "id, title, description, difficulty, status, created_at";
const SUBTASK_COLUMNS: &str = "id, task_id, title, status, created_at";

// ============================================================================
// Goal Store
// ============================================================================

/// Persistent store for goals and their subtasks.
pub struct GoalStore {
    conn: Connection,
    config: StoreConfig,
}

impl GoalStore {
    /// Open or create the database described by `config`.
    pub fn open(config: StoreConfig) -> Result<Self> {
        let conn = if config.is_memory() {
            Connection::open_in_memory()?
        } else {
            Connection::open(&config.db_path)?
        };
        conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))?;

        let store = Self { conn, config };
        store.init_schema()?;

        info!(path = %store.config.db_path.display(), "goal store opened");
        Ok(store)
    }

    /// Open a private in-memory store (for testing)
    pub fn memory() -> Result<Self> {
        Self::open(StoreConfig::memory())
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS tasks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                difficulty TEXT NOT NULL DEFAULT 'medium'
                    CHECK (difficulty IN ('easy', 'medium', 'hard')),
                status TEXT NOT NULL DEFAULT 'pending'
                    CHECK (status IN ('pending', 'in_progress', 'completed')),
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS subtasks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                task_id INTEGER NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
                title TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'pending'
                    CHECK (status IN ('pending', 'completed')),
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_subtasks_task ON subtasks(task_id);
            "#,
        )?;
        Ok(())
    }

    /// Cheap round-trip used by health checks.
    pub fn ping(&self) -> Result<()> {
        self.conn.query_row("SELECT 1", [], |_| Ok(()))?;
        Ok(())
    }

    // ========================================================================
    // Goals
    // ========================================================================

    /// Create a pending goal with no subtasks.
    pub fn create_goal(
        &self,
        title: &str,
        description: &str,
        difficulty: Difficulty,
    ) -> Result<Goal> {
        let created_at = Utc::now();
        self.conn.execute(
            "INSERT INTO tasks (title, description, difficulty, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![title, description, difficulty, GoalStatus::Pending, created_at],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!(goal_id = id, "goal created");

        Ok(Goal {
            id,
            title: title.to_string(),
            description: description.to_string(),
            difficulty,
            status: GoalStatus::Pending,
            created_at,
        })
    }

    pub fn get_goal(&self, goal_id: GoalId) -> Result<Goal> {
        fetch_goal(&self.conn, goal_id)?.ok_or_else(|| StoreError::NotFound(TASK_NOT_FOUND.into()))
    }

    /// List every goal with status and progress derived from its live subtasks.
    pub fn list_goals(&self) -> Result<Vec<GoalSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT t.id, t.title, t.description, t.difficulty, t.status, t.created_at,
                    COUNT(s.id), COALESCE(SUM(s.status = 'completed'), 0)
             FROM tasks t
             LEFT JOIN subtasks s ON s.task_id = t.id
             GROUP BY t.id
             ORDER BY t.id",
        )?;

        let rows = stmt.query_map([], |row| {
            let goal = goal_from_row(row)?;
            let total: i64 = row.get(6)?;
            let completed: i64 = row.get(7)?;
            Ok((goal, total as usize, completed as usize))
        })?;

        let mut summaries = Vec::new();
        for row in rows {
            let (mut goal, total, completed) = row?;
            goal.status = GoalStatus::derive(completed, total);
            summaries.push(GoalSummary {
                goal,
                total_subtasks: total,
                completed_subtasks: completed,
                progress_percentage: progress_percentage(completed, total),
            });
        }
        Ok(summaries)
    }

    /// Change a goal's title and/or description.
    ///
    /// Fails with `InvalidInput` when the update carries no field.
    pub fn update_goal(&self, goal_id: GoalId, update: GoalUpdate) -> Result<Goal> {
        if update.is_empty() {
            return Err(StoreError::InvalidInput("Nothing to update".into()));
        }

        let changed = self.conn.execute(
            "UPDATE tasks
             SET title = COALESCE(?1, title),
                 description = COALESCE(?2, description)
             WHERE id = ?3",
            params![update.title, update.description, goal_id],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(TASK_NOT_FOUND.into()));
        }
        debug!(goal_id, "goal updated");

        self.get_goal(goal_id)
    }

    /// Delete a goal together with all of its subtasks.
    pub fn delete_goal(&mut self, goal_id: GoalId) -> Result<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let subtasks = tx.execute("DELETE FROM subtasks WHERE task_id = ?1", params![goal_id])?;
        let goals = tx.execute("DELETE FROM tasks WHERE id = ?1", params![goal_id])?;
        if goals == 0 {
            // dropping `tx` rolls back
            return Err(StoreError::NotFound(TASK_NOT_FOUND.into()));
        }

        tx.commit()?;
        info!(goal_id, subtasks, "goal deleted");
        Ok(())
    }

    // ========================================================================
    // Subtasks
    // ========================================================================

    /// Append pending subtasks to a goal, preserving the order of `titles`.
    ///
    /// The whole batch is inserted in one transaction and the goal status is
    /// recomputed before commit.
    pub fn add_subtasks<I, S>(&mut self, goal_id: GoalId, titles: I) -> Result<Vec<Subtask>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        if fetch_goal(&tx, goal_id)?.is_none() {
            return Err(StoreError::NotFound(TASK_NOT_FOUND.into()));
        }

        let created_at = Utc::now();
        let mut subtasks = Vec::new();
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO subtasks (task_id, title, status, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for title in titles {
                let title = title.as_ref();
                stmt.execute(params![goal_id, title, SubtaskStatus::Pending, created_at])?;
                subtasks.push(Subtask {
                    id: tx.last_insert_rowid(),
                    goal_id,
                    title: title.to_string(),
                    status: SubtaskStatus::Pending,
                    created_at,
                });
            }
        }

        recompute_goal_status(&tx, goal_id)?;
        tx.commit()?;

        debug!(goal_id, count = subtasks.len(), "subtasks added");
        Ok(subtasks)
    }

    /// Return a goal, its progress, and its subtasks in insertion order.
    pub fn get_subtasks(&self, goal_id: GoalId) -> Result<GoalDetail> {
        let mut goal = self.get_goal(goal_id)?;
        let subtasks = fetch_subtasks(&self.conn, goal_id)?;

        let completed = subtasks.iter().filter(|s| s.status.is_completed()).count();
        goal.status = GoalStatus::derive(completed, subtasks.len());

        Ok(GoalDetail {
            progress_percentage: progress_percentage(completed, subtasks.len()),
            goal,
            subtasks,
        })
    }

    /// Set one subtask's status and recompute its parent goal's status.
    ///
    /// Both rows are written in the same transaction.
    pub fn set_subtask_status(
        &mut self,
        subtask_id: SubtaskId,
        status: SubtaskStatus,
    ) -> Result<StatusChange> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let mut subtask = tx
            .query_row(
                &format!("SELECT {SUBTASK_COLUMNS} FROM subtasks WHERE id = ?1"),
                params![subtask_id],
                subtask_from_row,
            )
            .optional()?
            .ok_or_else(|| StoreError::NotFound(SUBTASK_NOT_FOUND.into()))?;

        tx.execute(
            "UPDATE subtasks SET status = ?1 WHERE id = ?2",
            params![status, subtask_id],
        )?;
        subtask.status = status;

        let goal_status = recompute_goal_status(&tx, subtask.goal_id)?;
        tx.commit()?;

        debug!(subtask_id, %status, goal_id = subtask.goal_id, %goal_status, "subtask status set");
        Ok(StatusChange {
            subtask,
            goal_status,
        })
    }
}

// ============================================================================
// Row helpers
// ============================================================================

fn goal_from_row(row: &Row<'_>) -> rusqlite::Result<Goal> {
    Ok(Goal {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        difficulty: row.get(3)?,
        status: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn subtask_from_row(row: &Row<'_>) -> rusqlite::Result<Subtask> {
    Ok(Subtask {
        id: row.get(0)?,
        goal_id: row.get(1)?,
        title: row.get(2)?,
        status: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn fetch_goal(conn: &Connection, goal_id: GoalId) -> Result<Option<Goal>> {
    let goal = conn
        .query_row(
            &format!("SELECT {GOAL_COLUMNS} FROM tasks WHERE id = ?1"),
            params![goal_id],
            goal_from_row,
        )
        .optional()?;
    Ok(goal)
}

fn fetch_subtasks(conn: &Connection, goal_id: GoalId) -> Result<Vec<Subtask>> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {SUBTASK_COLUMNS} FROM subtasks WHERE task_id = ?1 ORDER BY id"
    ))?;
    let rows = stmt.query_map(params![goal_id], subtask_from_row)?;

    let mut subtasks = Vec::new();
    for row in rows {
        subtasks.push(row?);
    }
    Ok(subtasks)
}

/// Rescan a goal's subtasks and persist the derived status.
fn recompute_goal_status(conn: &Connection, goal_id: GoalId) -> Result<GoalStatus> {
    let statuses = fetch_subtasks(conn, goal_id)?
        .into_iter()
        .map(|s| s.status);
    let status = GoalStatus::from_subtasks(statuses);

    conn.execute(
        "UPDATE tasks SET status = ?1 WHERE id = ?2",
        params![status, goal_id],
    )?;
    Ok(status)
}

// ============================================================================
// SQL conversions
// ============================================================================

macro_rules! text_enum_sql {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ToSql for $ty {
                fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                    Ok(ToSqlOutput::from(self.as_str()))
                }
            }

            impl FromSql for $ty {
                fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                    value
                        .as_str()?
                        .parse()
                        .map_err(|e: StoreError| FromSqlError::Other(Box::new(e)))
                }
            }
        )*
    };
}

text_enum_sql!(Difficulty, GoalStatus, SubtaskStatus);
