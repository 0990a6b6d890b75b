//! Dashboard statistics.
//!
//! Counts are recomputed from storage on every call. Overdue is evaluated
//! against the instant the call is made, so a task moves in and out of the
//! overdue count as time passes or as its status changes, without any stored
//! flag.
//!
//! ```rust,no_run
//! use haatkhata::db::tasks::Tasks;
//! use haatkhata::libs::config::Config;
//! use haatkhata::libs::stats::dashboard_stats;
//!
//! let config = Config::load()?;
//! let mut tasks = Tasks::new(&config.database)?;
//! let stats = tasks.read(|store| dashboard_stats(store, 1))?;
//! println!("{} open, {} overdue", stats.open(), stats.overdue);
//! # Ok::<(), haatkhata::libs::error::AppError>(())
//! ```

use super::error::Result;
use super::store::TaskStore;
use super::task::{now, Task, TaskStatus};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Per-user task tally. Every field is zero for a user with no tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStats {
    pub total: u32,
    pub pending: u32,
    pub in_progress: u32,
    pub completed: u32,
    /// Due date in the past and not completed
    pub overdue: u32,
}

impl TaskStats {
    /// Folds a task list into a tally in one pass.
    pub fn tally<'a, I>(tasks: I, now: NaiveDateTime) -> Self
    where
        I: IntoIterator<Item = &'a Task>,
    {
        tasks.into_iter().fold(TaskStats::default(), |mut stats, task| {
            stats.total += 1;
            match task.status {
                TaskStatus::Pending => stats.pending += 1,
                TaskStatus::InProgress => stats.in_progress += 1,
                TaskStatus::Completed => stats.completed += 1,
            }
            if task.is_overdue(now) {
                stats.overdue += 1;
            }
            stats
        })
    }

    /// Tasks that are not completed yet.
    pub fn open(&self) -> u32 {
        self.pending + self.in_progress
    }

    /// Share of tasks completed, in percent. Zero when there are no tasks.
    pub fn completion_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        f64::from(self.completed) * 100.0 / f64::from(self.total)
    }
}

/// Statistics for `user_id` evaluated at the current instant.
pub fn dashboard_stats<S: TaskStore + ?Sized>(store: &S, user_id: i64) -> Result<TaskStats> {
    dashboard_stats_at(store, user_id, now())
}

/// Statistics for `user_id` with overdue evaluated at `now`.
pub fn dashboard_stats_at<S: TaskStore + ?Sized>(store: &S, user_id: i64, now: NaiveDateTime) -> Result<TaskStats> {
    let stats = store.count_by_status_and_overdue(user_id, now)?;
    debug!(user_id, ?stats, "dashboard stats");
    Ok(stats)
}
