//! Task listing with optional criteria.
//!
//! Criteria arrive from the caller as raw strings ([`FilterArgs`]), are
//! validated into a [`TaskFilter`], and then pushed down to the store in one
//! query. All supplied criteria must hold (logical AND); an absent criterion
//! does not restrict the result.
//!
//! ## Rules
//!
//! - **Status / priority**: exact token match. A token outside the known set is
//!   a validation error, never an empty result.
//! - **Category**: exact id match. A non-numeric id is a validation error; an id
//!   with no matching category simply yields no tasks.
//! - **Search**: case-insensitive substring match on the title or the
//!   description. Case folding follows SQLite `LIKE`, which folds ASCII only.
//! - **Order**: newest first by creation time, then by id.
//!
//! ```rust,no_run
//! use haatkhata::db::tasks::Tasks;
//! use haatkhata::libs::config::Config;
//! use haatkhata::libs::filter::{list_tasks, FilterArgs};
//!
//! let config = Config::load()?;
//! let mut tasks = Tasks::new(&config.database)?;
//! let filter = FilterArgs {
//!     status: Some("pending".into()),
//!     search: Some("groceries".into()),
//!     ..Default::default()
//! }
//! .parse()?;
//! let views = tasks.read(|store| list_tasks(store, 1, &filter))?;
//! # Ok::<(), haatkhata::libs::error::AppError>(())
//! ```

use super::error::{AppError, Result};
use super::store::TaskStore;
use super::task::{now, Task, TaskFilter, TaskPriority, TaskStatus};
use crate::db::categories::Category;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Unvalidated criteria as they come from a form or the command line.
///
/// Empty strings count as "not supplied". Surrounding whitespace is ignored
/// for status, category and priority; search text is used as given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterArgs {
    pub status: Option<String>,
    pub category: Option<String>,
    pub priority: Option<String>,
    pub search: Option<String>,
}

impl FilterArgs {
    pub fn parse(&self) -> Result<TaskFilter> {
        let status = token(&self.status).map(str::parse::<TaskStatus>).transpose()?;
        let priority = token(&self.priority).map(str::parse::<TaskPriority>).transpose()?;
        let category_id = token(&self.category)
            .map(|raw| raw.parse::<i64>().map_err(|_| AppError::InvalidCategoryId(raw.to_string())))
            .transpose()?;

        Ok(TaskFilter {
            status,
            category_id,
            priority,
            search: supplied(&self.search).map(str::to_string),
        })
    }
}

fn supplied(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn token(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Display fields of a task's category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBadge {
    pub name: String,
    pub color: String,
}

impl From<&Category> for CategoryBadge {
    fn from(category: &Category) -> Self {
        CategoryBadge {
            name: category.name.clone(),
            color: category.color.clone(),
        }
    }
}

/// A task enriched for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskView {
    pub task: Task,
    /// `None` when the task has no category
    pub category: Option<CategoryBadge>,
    pub overdue: bool,
}

/// Tasks of `user_id` matching `filter`, newest first, with overdue evaluated now.
pub fn list_tasks<S: TaskStore + ?Sized>(store: &S, user_id: i64, filter: &TaskFilter) -> Result<Vec<TaskView>> {
    list_tasks_at(store, user_id, filter, now())
}

/// Like [`list_tasks`] with overdue flags evaluated at `now`.
pub fn list_tasks_at<S: TaskStore + ?Sized>(
    store: &S,
    user_id: i64,
    filter: &TaskFilter,
    now: NaiveDateTime,
) -> Result<Vec<TaskView>> {
    let tasks = store.find_tasks(user_id, filter)?;
    debug!(user_id, ?filter, count = tasks.len(), "tasks listed");

    // Each category is looked up once per call
    let mut badges: HashMap<i64, Option<CategoryBadge>> = HashMap::new();
    let mut views = Vec::with_capacity(tasks.len());

    for task in tasks {
        let category = match task.category_id {
            Some(id) => match badges.get(&id) {
                Some(badge) => badge.clone(),
                None => {
                    let badge = store.get_category(id)?.as_ref().map(CategoryBadge::from);
                    badges.insert(id, badge.clone());
                    badge
                }
            },
            None => None,
        };
        let overdue = task.is_overdue(now);
        views.push(TaskView { task, category, overdue });
    }

    Ok(views)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::stats::TaskStats;
    use crate::libs::task::parse_due_date;
    use std::cell::Cell;

    fn args(status: &str, category: &str, priority: &str, search: &str) -> FilterArgs {
        FilterArgs {
            status: Some(status.to_string()),
            category: Some(category.to_string()),
            priority: Some(priority.to_string()),
            search: Some(search.to_string()),
        }
    }

    #[test]
    fn parses_all_criteria() {
        let filter = args("completed", "7", "high", "report").parse().unwrap();
        assert_eq!(
            filter,
            TaskFilter::default()
                .status(TaskStatus::Completed)
                .category(7)
                .priority(TaskPriority::High)
                .search("report")
        );
    }

    #[test]
    fn empty_strings_mean_no_restriction() {
        let filter = args("", "", "", "").parse().unwrap();
        assert!(filter.is_empty());
        assert!(FilterArgs::default().parse().unwrap().is_empty());
    }

    #[test]
    fn invalid_tokens_are_rejected() {
        let err = args("archived", "", "", "").parse().unwrap_err();
        assert!(matches!(err, AppError::InvalidStatus(_)));
        assert!(err.is_validation());

        let err = args("", "", "critical", "").parse().unwrap_err();
        assert!(matches!(err, AppError::InvalidPriority(_)));

        let err = args("", "work", "", "").parse().unwrap_err();
        assert!(matches!(err, AppError::InvalidCategoryId(ref raw) if raw == "work"));
    }

    struct FakeStore {
        tasks: Vec<Task>,
        lookups: Cell<usize>,
    }

    impl TaskStore for FakeStore {
        fn find_tasks(&self, _user_id: i64, _filter: &TaskFilter) -> Result<Vec<Task>> {
            Ok(self.tasks.clone())
        }

        fn count_by_status_and_overdue(&self, _user_id: i64, now: NaiveDateTime) -> Result<TaskStats> {
            Ok(TaskStats::tally(&self.tasks, now))
        }

        fn get_category(&self, category_id: i64) -> Result<Option<Category>> {
            self.lookups.set(self.lookups.get() + 1);
            Ok((category_id == 7).then(|| Category {
                id: 7,
                name: "Work".to_string(),
                description: None,
                color: "#007bff".to_string(),
                created_at: parse_due_date("2026-01-01").unwrap(),
            }))
        }
    }

    fn task(id: i64, category_id: Option<i64>) -> Task {
        let created = parse_due_date("2026-01-01").unwrap();
        Task {
            id,
            title: format!("Task {}", id),
            description: None,
            status: TaskStatus::Pending,
            priority: TaskPriority::Medium,
            due_date: Some(parse_due_date("2026-02-01").unwrap()),
            created_at: created,
            updated_at: created,
            user_id: 1,
            category_id,
        }
    }

    #[test]
    fn categories_are_looked_up_once_per_call() {
        let store = FakeStore {
            tasks: vec![task(3, Some(7)), task(2, Some(9)), task(1, Some(7)), task(0, None)],
            lookups: Cell::new(0),
        };
        let now = parse_due_date("2026-03-01").unwrap();

        let views = list_tasks_at(&store, 1, &TaskFilter::default(), now).unwrap();
        assert_eq!(store.lookups.get(), 2);
        assert_eq!(views[0].category.as_ref().map(|b| b.name.as_str()), Some("Work"));
        // a dangling category id renders as no category
        assert_eq!(views[1].category, None);
        assert_eq!(views[2].category, views[0].category);
        assert_eq!(views[3].category, None);
        assert!(views.iter().all(|v| v.overdue));

        list_tasks_at(&store, 1, &TaskFilter::default(), now).unwrap();
        assert_eq!(store.lookups.get(), 4);
    }

    #[test]
    fn tokens_ignore_surrounding_whitespace() {
        let filter = args(" pending", " 7 ", "high\n", "").parse().unwrap();
        assert_eq!(
            filter,
            TaskFilter::default()
                .status(TaskStatus::Pending)
                .category(7)
                .priority(TaskPriority::High)
        );
        assert!(args("  ", " ", "\t", "").parse().unwrap().is_empty());
    }

    #[test]
    fn search_text_is_kept_verbatim() {
        let filter = args("", "", "", " buy milk ").parse().unwrap();
        assert_eq!(filter.search.as_deref(), Some(" buy milk "));
    }
}
