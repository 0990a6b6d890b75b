//! Task records and the value types used to create, change and query them.

use super::error::{AppError, Result};
use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const TITLE_MAX_LEN: usize = 100;

/// Current local wall-clock time, truncated to whole seconds to match stored precision.
///
/// Due dates are entered as local times, so every stored timestamp uses this clock too.
pub fn now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Pending, TaskStatus::InProgress, TaskStatus::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }
}

impl FromStr for TaskStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "in_progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            other => Err(AppError::InvalidStatus(other.to_string())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub const ALL: [TaskPriority; 3] = [TaskPriority::Low, TaskPriority::Medium, TaskPriority::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }
}

impl FromStr for TaskPriority {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            other => Err(AppError::InvalidPriority(other.to_string())),
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Both enums are stored as their snake_case tokens.
macro_rules! sql_token {
    ($ty:ty) => {
        impl ToSql for $ty {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.as_str()))
            }
        }

        impl FromSql for $ty {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                value.as_str()?.parse().map_err(|e: AppError| FromSqlError::Other(Box::new(e)))
            }
        }
    };
}

sql_token!(TaskStatus);
sql_token!(TaskPriority);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub user_id: i64,
    pub category_id: Option<i64>,
}

impl Task {
    /// A task is overdue when it has a due date strictly before `now` and is not completed.
    pub fn is_overdue(&self, now: NaiveDateTime) -> bool {
        match self.due_date {
            Some(due) => self.status != TaskStatus::Completed && due < now,
            None => false,
        }
    }
}

/// Fields supplied when creating a task.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<NaiveDateTime>,
    pub category_id: Option<i64>,
}

impl NewTask {
    pub fn new(user_id: i64, title: &str) -> Self {
        NewTask {
            user_id,
            title: title.to_string(),
            description: None,
            status: TaskStatus::default(),
            priority: TaskPriority::default(),
            due_date: None,
            category_id: None,
        }
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn due(mut self, due_date: NaiveDateTime) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn category(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_title(&self.title)
    }
}

/// Changes to apply to an existing task.
///
/// `None` leaves a field untouched. For nullable columns the inner option
/// distinguishes "set to this value" from "clear".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub category_id: Option<Option<i64>>,
    pub due_date: Option<Option<NaiveDateTime>>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.category_id.is_none()
            && self.due_date.is_none()
    }

    pub fn validate(&self) -> Result<()> {
        match &self.title {
            Some(title) => validate_title(title),
            None => Ok(()),
        }
    }
}

fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(AppError::invalid("title", "must not be empty"));
    }
    if title.chars().count() > TITLE_MAX_LEN {
        return Err(AppError::invalid("title", format!("must be at most {} characters", TITLE_MAX_LEN)));
    }
    Ok(())
}

/// Validated criteria for narrowing a user's task list.
///
/// Every field is optional; an absent field does not restrict the result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub category_id: Option<i64>,
    pub priority: Option<TaskPriority>,
    pub search: Option<String>,
}

impl TaskFilter {
    pub fn status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn category(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn search(mut self, text: &str) -> Self {
        self.search = Some(text.to_string());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.category_id.is_none() && self.priority.is_none() && self.search.is_none()
    }
}

/// Parses a due date given as `YYYY-MM-DD` (midnight) or `YYYY-MM-DD HH:MM[:SS]`.
pub fn parse_due_date(input: &str) -> Result<NaiveDateTime> {
    let input = input.trim();
    if let Ok(date_time) = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S") {
        return Ok(date_time);
    }
    if let Ok(date_time) = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M") {
        return Ok(date_time);
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| AppError::InvalidDueDate(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn task(status: TaskStatus, due_date: Option<NaiveDateTime>) -> Task {
        let created = parse_due_date("2026-01-01").unwrap();
        Task {
            id: 1,
            title: "Water plants".to_string(),
            description: None,
            status,
            priority: TaskPriority::Medium,
            due_date,
            created_at: created,
            updated_at: created,
            user_id: 1,
            category_id: None,
        }
    }

    #[test]
    fn status_tokens_parse() {
        assert_eq!("in_progress".parse::<TaskStatus>().unwrap(), TaskStatus::InProgress);
        assert!(matches!("done".parse::<TaskStatus>(), Err(AppError::InvalidStatus(t)) if t == "done"));
        // tokens are exact
        assert!("Pending".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn priority_tokens_parse() {
        assert_eq!("high".parse::<TaskPriority>().unwrap(), TaskPriority::High);
        assert!(matches!("urgent".parse::<TaskPriority>(), Err(AppError::InvalidPriority(_))));
    }

    #[test]
    fn defaults_are_pending_and_medium() {
        let new_task = NewTask::new(3, "Call mom");
        assert_eq!(new_task.status, TaskStatus::Pending);
        assert_eq!(new_task.priority, TaskPriority::Medium);
    }

    #[test]
    fn overdue_requires_past_due_date_and_open_status() {
        let now = parse_due_date("2026-03-10 12:00").unwrap();
        let yesterday = now - Duration::days(1);
        let tomorrow = now + Duration::days(1);

        assert!(task(TaskStatus::Pending, Some(yesterday)).is_overdue(now));
        assert!(task(TaskStatus::InProgress, Some(yesterday)).is_overdue(now));
        assert!(!task(TaskStatus::Completed, Some(yesterday)).is_overdue(now));
        assert!(!task(TaskStatus::Pending, Some(tomorrow)).is_overdue(now));
        assert!(!task(TaskStatus::Pending, None).is_overdue(now));
        // strictly earlier
        assert!(!task(TaskStatus::Pending, Some(now)).is_overdue(now));
    }

    #[test]
    fn due_date_formats() {
        assert_eq!(parse_due_date("2026-05-01").unwrap().to_string(), "2026-05-01 00:00:00");
        assert_eq!(parse_due_date("2026-05-01 17:30").unwrap().to_string(), "2026-05-01 17:30:00");
        assert_eq!(parse_due_date("2026-05-01 17:30:15").unwrap().to_string(), "2026-05-01 17:30:15");
        assert!(matches!(parse_due_date("May 1st"), Err(AppError::InvalidDueDate(_))));
    }

    #[test]
    fn title_validation() {
        assert!(NewTask::new(1, "   ").validate().is_err());
        assert!(NewTask::new(1, &"x".repeat(TITLE_MAX_LEN + 1)).validate().is_err());
        assert!(NewTask::new(1, &"x".repeat(TITLE_MAX_LEN)).validate().is_ok());
        assert!(TaskPatch::default().validate().is_ok());
        assert!(TaskPatch::default().is_empty());
    }
}
