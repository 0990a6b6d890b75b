//! The read interface the filter and stats engines run against.

use super::error::Result;
use super::stats::TaskStats;
use super::task::{Task, TaskFilter};
use crate::db::categories::Category;
use chrono::NaiveDateTime;

/// Read access to a user's tasks and the shared categories.
///
/// Implementations are expected to answer all calls made on one value from
/// the same consistent view of storage. The SQLite implementation is
/// [`TaskSnapshot`](crate::db::tasks::TaskSnapshot).
pub trait TaskStore {
    /// Tasks owned by `user_id` matching every criterion in `filter`, newest first.
    fn find_tasks(&self, user_id: i64, filter: &TaskFilter) -> Result<Vec<Task>>;

    /// Status and overdue counts for `user_id`, with overdue evaluated at `now`.
    fn count_by_status_and_overdue(&self, user_id: i64, now: NaiveDateTime) -> Result<TaskStats>;

    fn get_category(&self, category_id: i64) -> Result<Option<Category>>;
}
