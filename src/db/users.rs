//! Registered users.
//!
//! Usernames and emails are unique. Passwords never touch the database in
//! plaintext; only the argon2 hash is stored. Deleting a user cascades to
//! their tasks through the foreign key.

use crate::db::db::Db;
use crate::db::tasks::db_timestamp;
use crate::libs::config::DatabaseConfig;
use crate::libs::error::{AppError, Result};
use crate::libs::password::{hash_password, verify_password};
use crate::libs::task::now;
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Row, ToSql};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const USERNAME_MAX_LEN: usize = 80;
pub const EMAIL_MAX_LEN: usize = 120;
pub const NAME_MAX_LEN: usize = 50;

const USER_COLUMNS: &str = "id, username, email, password_hash, first_name, last_name, created_at";
const INSERT_USER: &str =
    "INSERT INTO users (username, email, password_hash, first_name, last_name, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)";
const DELETE_USER: &str = "DELETE FROM users WHERE id = ?1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: NaiveDateTime,
}

impl User {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(User {
            id: row.get(0)?,
            username: row.get(1)?,
            email: row.get(2)?,
            password_hash: row.get(3)?,
            first_name: row.get(4)?,
            last_name: row.get(5)?,
            created_at: row.get(6)?,
        })
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Registration form. `password` is plaintext and is hashed on insert.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

impl NewUser {
    pub fn validate(&self) -> Result<()> {
        validate_text("username", &self.username, USERNAME_MAX_LEN)?;
        validate_email(&self.email)?;
        if self.password.is_empty() {
            return Err(AppError::invalid("password", "must not be empty"));
        }
        validate_text("first_name", &self.first_name, NAME_MAX_LEN)?;
        validate_text("last_name", &self.last_name, NAME_MAX_LEN)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPatch {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.first_name.is_none() && self.last_name.is_none()
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        if let Some(first_name) = &self.first_name {
            validate_text("first_name", first_name, NAME_MAX_LEN)?;
        }
        if let Some(last_name) = &self.last_name {
            validate_text("last_name", last_name, NAME_MAX_LEN)?;
        }
        Ok(())
    }
}

fn validate_text(field: &'static str, value: &str, max_len: usize) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AppError::invalid(field, "must not be empty"));
    }
    if value.chars().count() > max_len {
        return Err(AppError::invalid(field, format!("must be at most {} characters", max_len)));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<()> {
    validate_text("email", email, EMAIL_MAX_LEN)?;
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') && !domain.starts_with('.') => Ok(()),
        _ => Err(AppError::invalid("email", "must look like name@example.com")),
    }
}

pub struct Users {
    conn: Connection,
}

impl Users {
    pub fn new(config: &DatabaseConfig) -> Result<Self> {
        let db = Db::new(config)?;
        Ok(Self { conn: db.conn })
    }

    pub fn register(&mut self, user: &NewUser) -> Result<User> {
        user.validate()?;

        if self.get_by_username(&user.username)?.is_some() {
            return Err(AppError::UsernameTaken(user.username.clone()));
        }
        if self.get_by_email(&user.email)?.is_some() {
            return Err(AppError::EmailTaken(user.email.clone()));
        }

        let password_hash = hash_password(&user.password)?;
        self.conn.execute(
            INSERT_USER,
            params![
                user.username,
                user.email,
                password_hash,
                user.first_name,
                user.last_name,
                db_timestamp(&now())
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        debug!(id, username = %user.username, "user registered");
        self.get_by_id(id)?.ok_or_else(|| AppError::UserNotFound(id.to_string()))
    }

    pub fn get_by_id(&mut self, id: i64) -> Result<Option<User>> {
        self.fetch_one("id", id)
    }

    pub fn get_by_username(&mut self, username: &str) -> Result<Option<User>> {
        self.fetch_one("username", username)
    }

    pub fn get_by_email(&mut self, email: &str) -> Result<Option<User>> {
        self.fetch_one("email", email)
    }

    /// Like [`Users::get_by_username`] but a missing user is an error.
    pub fn require(&mut self, username: &str) -> Result<User> {
        self.get_by_username(username)?
            .ok_or_else(|| AppError::UserNotFound(username.to_string()))
    }

    fn fetch_one(&self, column: &str, value: impl ToSql) -> Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE {} = ?1", USER_COLUMNS, column);
        self.conn
            .query_row(&sql, params![value], User::from_row)
            .optional()
            .map_err(Into::into)
    }

    /// Applies `patch` to the profile. The email may not belong to another user.
    pub fn update(&mut self, id: i64, patch: &UserPatch) -> Result<User> {
        patch.validate()?;
        let current = self
            .get_by_id(id)?
            .ok_or_else(|| AppError::UserNotFound(id.to_string()))?;
        if patch.is_empty() {
            return Ok(current);
        }

        if let Some(email) = &patch.email {
            if let Some(owner) = self.get_by_email(email)? {
                if owner.id != id {
                    return Err(AppError::EmailTaken(email.clone()));
                }
            }
        }

        let mut sets: Vec<&str> = Vec::new();
        let mut values: Vec<&dyn ToSql> = Vec::new();

        if let Some(email) = &patch.email {
            sets.push("email = ?");
            values.push(email);
        }
        if let Some(first_name) = &patch.first_name {
            sets.push("first_name = ?");
            values.push(first_name);
        }
        if let Some(last_name) = &patch.last_name {
            sets.push("last_name = ?");
            values.push(last_name);
        }
        values.push(&id);

        let sql = format!("UPDATE users SET {} WHERE id = ?", sets.join(", "));
        self.conn.execute(&sql, values.as_slice())?;

        self.get_by_id(id)?.ok_or_else(|| AppError::UserNotFound(id.to_string()))
    }

    /// Returns the user when `password` matches the stored hash, `None` otherwise.
    ///
    /// An unknown username is also `None`.
    pub fn verify_password(&mut self, username: &str, password: &str) -> Result<Option<User>> {
        match self.get_by_username(username)? {
            Some(user) if verify_password(password, &user.password_hash)? => Ok(Some(user)),
            _ => Ok(None),
        }
    }

    /// Deletes the user and, through the foreign key, all of their tasks.
    pub fn delete(&mut self, id: i64) -> Result<()> {
        let affected = self.conn.execute(DELETE_USER, params![id])?;
        if affected == 0 {
            return Err(AppError::UserNotFound(id.to_string()));
        }
        debug!(id, "user deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user() -> NewUser {
        NewUser {
            username: "rahim".to_string(),
            email: "rahim@example.com".to_string(),
            password: "secret".to_string(),
            first_name: "Rahim".to_string(),
            last_name: "Uddin".to_string(),
        }
    }

    #[test]
    fn registration_form_validation() {
        assert!(new_user().validate().is_ok());

        let mut user = new_user();
        user.username = "u".repeat(USERNAME_MAX_LEN + 1);
        assert!(user.validate().unwrap_err().is_validation());

        let mut user = new_user();
        user.email = "not-an-email".to_string();
        assert!(matches!(user.validate(), Err(AppError::InvalidField { field: "email", .. })));

        let mut user = new_user();
        user.password.clear();
        assert!(user.validate().is_err());
    }

    #[test]
    fn patch_validation() {
        assert!(UserPatch::default().is_empty());
        let patch = UserPatch {
            last_name: Some(" ".to_string()),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
    }
}
