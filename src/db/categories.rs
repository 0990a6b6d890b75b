//! Shared task categories.
//!
//! Categories are global: every user sees the same list. Deleting a category
//! never deletes tasks; the foreign key detaches them instead.

use crate::db::db::Db;
use crate::db::tasks::db_timestamp;
use crate::libs::config::DatabaseConfig;
use crate::libs::error::{AppError, Result};
use crate::libs::task::now;
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

pub const DEFAULT_COLOR: &str = "#007bff";
pub const NAME_MAX_LEN: usize = 50;

/// Seeded by `init` when the table is empty.
pub const DEFAULT_CATEGORIES: &[(&str, &str, &str)] = &[
    ("Work", "Work-related tasks", "#007bff"),
    ("Personal", "Personal tasks and activities", "#28a745"),
    ("Shopping", "Shopping lists and errands", "#ffc107"),
    ("Health", "Health and fitness goals", "#dc3545"),
    ("Learning", "Educational and skill development", "#6f42c1"),
];

const CATEGORY_COLUMNS: &str = "id, name, description, color, created_at";
const INSERT_CATEGORY: &str = "INSERT INTO categories (name, description, color, created_at) VALUES (?1, ?2, ?3, ?4)";
const DELETE_CATEGORY: &str = "DELETE FROM categories WHERE id = ?1";
const COUNT_CATEGORIES: &str = "SELECT COUNT(*) FROM categories";
const COUNT_TASKS_IN_CATEGORY: &str = "SELECT COUNT(*) FROM tasks WHERE category_id = ?1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub color: String,
    pub created_at: NaiveDateTime,
}

impl Category {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Category {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            color: row.get(3)?,
            created_at: row.get(4)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
    pub color: String,
}

impl NewCategory {
    pub fn new(name: &str) -> Self {
        NewCategory {
            name: name.to_string(),
            description: None,
            color: DEFAULT_COLOR.to_string(),
        }
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn color(mut self, color: &str) -> Self {
        self.color = color.to_string();
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)?;
        validate_color(&self.color)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub color: Option<String>,
}

impl CategoryPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.color.is_none()
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(color) = &self.color {
            validate_color(color)?;
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(AppError::invalid("name", "must not be empty"));
    }
    if name.chars().count() > NAME_MAX_LEN {
        return Err(AppError::invalid("name", format!("must be at most {} characters", NAME_MAX_LEN)));
    }
    Ok(())
}

/// Accepts `#rrggbb` hex colors.
pub fn validate_color(color: &str) -> Result<()> {
    let hex = color.strip_prefix('#').unwrap_or("");
    if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(())
    } else {
        Err(AppError::InvalidColor(color.to_string()))
    }
}

pub struct Categories {
    conn: Connection,
}

impl Categories {
    pub fn new(config: &DatabaseConfig) -> Result<Self> {
        let db = Db::new(config)?;
        Ok(Self { conn: db.conn })
    }

    pub fn create(&mut self, category: &NewCategory) -> Result<Category> {
        category.validate()?;
        self.conn
            .execute(
                INSERT_CATEGORY,
                params![category.name, category.description, category.color, db_timestamp(&now())],
            )?;
        let id = self.conn.last_insert_rowid();
        self.get_by_id(id)?.ok_or(AppError::CategoryNotFound(id))
    }

    pub fn get_by_id(&mut self, id: i64) -> Result<Option<Category>> {
        get_category(&self.conn, id)
    }

    /// All categories ordered by name.
    pub fn list(&mut self) -> Result<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM categories ORDER BY name, id", CATEGORY_COLUMNS))?;
        let categories = stmt
            .query_map([], Category::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(categories)
    }

    pub fn update(&mut self, id: i64, patch: &CategoryPatch) -> Result<Category> {
        patch.validate()?;

        let mut sets: Vec<&str> = Vec::new();
        let mut values: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(name) = &patch.name {
            sets.push("name = ?");
            values.push(Box::new(name.clone()));
        }
        if let Some(description) = &patch.description {
            sets.push("description = ?");
            values.push(Box::new(description.clone()));
        }
        if let Some(color) = &patch.color {
            sets.push("color = ?");
            values.push(Box::new(color.clone()));
        }

        if !sets.is_empty() {
            values.push(Box::new(id));
            let sql = format!("UPDATE categories SET {} WHERE id = ?", sets.join(", "));
            let params_refs: Vec<&dyn rusqlite::ToSql> = values.iter().map(AsRef::as_ref).collect();
            if self.conn.execute(&sql, params_refs.as_slice())? == 0 {
                return Err(AppError::CategoryNotFound(id));
            }
        }

        self.get_by_id(id)?.ok_or(AppError::CategoryNotFound(id))
    }

    /// Deletes a category. Tasks that referenced it keep existing with no category.
    pub fn delete(&mut self, id: i64) -> Result<()> {
        let affected = self.conn.execute(DELETE_CATEGORY, params![id])?;
        if affected == 0 {
            return Err(AppError::CategoryNotFound(id));
        }
        Ok(())
    }

    /// Number of tasks, across all users, attached to the category.
    pub fn task_count(&mut self, id: i64) -> Result<usize> {
        let count: i64 = self.conn.query_row(COUNT_TASKS_IN_CATEGORY, params![id], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Inserts [`DEFAULT_CATEGORIES`] when no category exists yet. Returns how many were added.
    pub fn seed_defaults(&mut self) -> Result<usize> {
        let existing: i64 = self.conn.query_row(COUNT_CATEGORIES, [], |row| row.get(0))?;
        if existing > 0 {
            return Ok(0);
        }

        let created_at = db_timestamp(&now());
        let tx = self.conn.transaction()?;
        for (name, description, color) in DEFAULT_CATEGORIES {
            tx.execute(INSERT_CATEGORY, params![name, description, color, created_at])?;
        }
        tx.commit()?;

        Ok(DEFAULT_CATEGORIES.len())
    }
}

pub(crate) fn get_category(conn: &Connection, id: i64) -> Result<Option<Category>> {
    conn.query_row(
        &format!("SELECT {} FROM categories WHERE id = ?1", CATEGORY_COLUMNS),
        params![id],
        Category::from_row,
    )
    .optional()
    .map_err(Into::into)
}
