use super::categories::{get_category, Category};
use super::db::Db;
use crate::libs::config::DatabaseConfig;
use crate::libs::error::{AppError, Result};
use crate::libs::stats::TaskStats;
use crate::libs::store::TaskStore;
use crate::libs::task::{now, NewTask, Task, TaskFilter, TaskPatch};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Row, ToSql, Transaction};
use tracing::debug;

const TASK_COLUMNS: &str = "id, title, description, status, priority, due_date, created_at, updated_at, user_id, category_id";
const INSERT_TASK: &str = "INSERT INTO tasks (title, description, status, priority, due_date, created_at, updated_at, user_id, category_id)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6, ?7, ?8)";
const DELETE_TASK: &str = "DELETE FROM tasks WHERE id = ?1 AND user_id = ?2";
const USER_EXISTS: &str = "SELECT 1 FROM users WHERE id = ?1";
const SELECT_STATS: &str = "SELECT
    COUNT(*),
    COALESCE(SUM(CASE WHEN status = 'pending' THEN 1 ELSE 0 END), 0),
    COALESCE(SUM(CASE WHEN status = 'in_progress' THEN 1 ELSE 0 END), 0),
    COALESCE(SUM(CASE WHEN status = 'completed' THEN 1 ELSE 0 END), 0),
    COALESCE(SUM(CASE WHEN due_date IS NOT NULL AND due_date < ?2 AND status != 'completed' THEN 1 ELSE 0 END), 0)
FROM tasks
WHERE user_id = ?1";

/// Storage representation of a timestamp, comparable as text.
pub(crate) fn db_timestamp(value: &NaiveDateTime) -> String {
    value.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Escapes `LIKE` wildcards so the search text matches literally.
fn like_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn task_from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        status: row.get(3)?,
        priority: row.get(4)?,
        due_date: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
        user_id: row.get(8)?,
        category_id: row.get(9)?,
    })
}

fn get_task(conn: &Connection, id: i64) -> Result<Option<Task>> {
    conn.query_row(&format!("SELECT {} FROM tasks WHERE id = ?1", TASK_COLUMNS), params![id], task_from_row)
        .optional()
        .map_err(Into::into)
}

fn ensure_category(conn: &Connection, category_id: Option<i64>) -> Result<()> {
    match category_id {
        Some(id) if get_category(conn, id)?.is_none() => Err(AppError::CategoryNotFound(id)),
        _ => Ok(()),
    }
}

pub struct Tasks {
    conn: Connection,
}

impl Tasks {
    pub fn new(config: &DatabaseConfig) -> Result<Tasks> {
        let db = Db::new(config)?;
        Ok(Tasks { conn: db.conn })
    }

    pub fn insert(&mut self, task: &NewTask) -> Result<Task> {
        task.validate()?;

        let exists = self.conn.query_row(USER_EXISTS, params![task.user_id], |_| Ok(())).optional()?;
        if exists.is_none() {
            return Err(AppError::UserNotFound(task.user_id.to_string()));
        }
        ensure_category(&self.conn, task.category_id)?;

        let created_at = db_timestamp(&now());
        self.conn.execute(
            INSERT_TASK,
            params![
                task.title,
                task.description,
                task.status,
                task.priority,
                task.due_date.as_ref().map(db_timestamp),
                created_at,
                task.user_id,
                task.category_id,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        get_task(&self.conn, id)?.ok_or(AppError::TaskNotFound(id))
    }

    pub fn get_by_id(&mut self, id: i64) -> Result<Option<Task>> {
        get_task(&self.conn, id)
    }

    /// Returns the task only if `user_id` owns it.
    pub fn get_owned(&mut self, id: i64, user_id: i64) -> Result<Task> {
        match get_task(&self.conn, id)? {
            Some(task) if task.user_id == user_id => Ok(task),
            _ => Err(AppError::TaskNotFound(id)),
        }
    }

    /// Applies `patch` to a task owned by `user_id`.
    ///
    /// Any change refreshes `updated_at`. An empty patch leaves the row untouched.
    pub fn update(&mut self, id: i64, user_id: i64, patch: &TaskPatch) -> Result<Task> {
        patch.validate()?;
        let current = self.get_owned(id, user_id)?;
        if patch.is_empty() {
            return Ok(current);
        }
        if let Some(category_id) = patch.category_id {
            ensure_category(&self.conn, category_id)?;
        }

        let mut sets: Vec<&str> = Vec::new();
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(title) = &patch.title {
            sets.push("title = ?");
            values.push(Box::new(title.clone()));
        }
        if let Some(description) = &patch.description {
            sets.push("description = ?");
            values.push(Box::new(description.clone()));
        }
        if let Some(status) = patch.status {
            sets.push("status = ?");
            values.push(Box::new(status));
        }
        if let Some(priority) = patch.priority {
            sets.push("priority = ?");
            values.push(Box::new(priority));
        }
        if let Some(category_id) = patch.category_id {
            sets.push("category_id = ?");
            values.push(Box::new(category_id));
        }
        if let Some(due_date) = &patch.due_date {
            sets.push("due_date = ?");
            values.push(Box::new(due_date.as_ref().map(db_timestamp)));
        }

        sets.push("updated_at = ?");
        values.push(Box::new(db_timestamp(&now())));
        values.push(Box::new(id));
        values.push(Box::new(user_id));

        let sql = format!("UPDATE tasks SET {} WHERE id = ? AND user_id = ?", sets.join(", "));
        let params_refs: Vec<&dyn ToSql> = values.iter().map(AsRef::as_ref).collect();
        if self.conn.execute(&sql, params_refs.as_slice())? == 0 {
            return Err(AppError::TaskNotFound(id));
        }

        get_task(&self.conn, id)?.ok_or(AppError::TaskNotFound(id))
    }

    pub fn delete(&mut self, id: i64, user_id: i64) -> Result<()> {
        let affected = self.conn.execute(DELETE_TASK, params![id, user_id])?;
        if affected == 0 {
            return Err(AppError::TaskNotFound(id));
        }
        Ok(())
    }

    /// Opens a read transaction. Every query made through the snapshot sees the same data.
    pub fn snapshot(&mut self) -> Result<TaskSnapshot<'_>> {
        Ok(TaskSnapshot {
            tx: self.conn.transaction()?,
        })
    }

    /// Runs `f` against a single consistent snapshot and closes it afterwards.
    pub fn read<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&TaskSnapshot<'_>) -> Result<T>,
    {
        let snapshot = self.snapshot()?;
        let result = f(&snapshot)?;
        snapshot.finish()?;
        Ok(result)
    }
}

/// A read-only view of the task store backed by one SQLite transaction.
pub struct TaskSnapshot<'conn> {
    tx: Transaction<'conn>,
}

impl TaskSnapshot<'_> {
    /// Ends the read transaction.
    pub fn finish(self) -> Result<()> {
        self.tx.commit()?;
        Ok(())
    }
}

impl TaskStore for TaskSnapshot<'_> {
    fn find_tasks(&self, user_id: i64, filter: &TaskFilter) -> Result<Vec<Task>> {
        let mut conditions: Vec<&str> = vec!["user_id = ?"];
        let mut values: Vec<Box<dyn ToSql>> = vec![Box::new(user_id)];

        if let Some(status) = filter.status {
            conditions.push("status = ?");
            values.push(Box::new(status));
        }
        if let Some(category_id) = filter.category_id {
            conditions.push("category_id = ?");
            values.push(Box::new(category_id));
        }
        if let Some(priority) = filter.priority {
            conditions.push("priority = ?");
            values.push(Box::new(priority));
        }
        if let Some(search) = &filter.search {
            conditions.push("(title LIKE ? ESCAPE '\\' OR description LIKE ? ESCAPE '\\')");
            let pattern = like_pattern(search);
            values.push(Box::new(pattern.clone()));
            values.push(Box::new(pattern));
        }

        let sql = format!(
            "SELECT {} FROM tasks WHERE {} ORDER BY created_at DESC, id DESC",
            TASK_COLUMNS,
            conditions.join(" AND ")
        );
        debug!(%sql, user_id, "find_tasks");

        let params_refs: Vec<&dyn ToSql> = values.iter().map(AsRef::as_ref).collect();
        let mut stmt = self.tx.prepare(&sql)?;
        let tasks = stmt
            .query_map(params_refs.as_slice(), task_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(tasks)
    }

    fn count_by_status_and_overdue(&self, user_id: i64, now: NaiveDateTime) -> Result<TaskStats> {
        let stats = self.tx.query_row(SELECT_STATS, params![user_id, db_timestamp(&now)], |row| {
            Ok(TaskStats {
                total: row.get(0)?,
                pending: row.get(1)?,
                in_progress: row.get(2)?,
                completed: row.get(3)?,
                overdue: row.get(4)?,
            })
        })?;

        Ok(stats)
    }

    fn get_category(&self, category_id: i64) -> Result<Option<Category>> {
        get_category(&self.tx, category_id)
    }
}

#[cfg(test)]
mod tests {
    use super::like_pattern;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("milk"), "%milk%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }
}
