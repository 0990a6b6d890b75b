//! Error types for the haatkhata library.
//!
//! Library code returns [`AppError`] through the crate-wide [`Result`] alias.
//! The command layer wraps these into `anyhow::Error` for display.
//!
//! Variants fall into three groups:
//!
//! - **Validation**: malformed input supplied by the caller (bad enum token,
//!   non-numeric id, invalid color, empty title). These are never turned into
//!   an empty result.
//! - **Lookup and conflict**: a referenced row does not exist or a unique
//!   value is already taken.
//! - **Infrastructure**: storage, filesystem and serialization failures,
//!   propagated unchanged.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid status '{0}', expected one of: pending, in_progress, completed")]
    InvalidStatus(String),

    #[error("Invalid priority '{0}', expected one of: low, medium, high")]
    InvalidPriority(String),

    #[error("Invalid category id '{0}'")]
    InvalidCategoryId(String),

    #[error("Invalid color '{0}', expected a hex value like #007bff")]
    InvalidColor(String),

    #[error("Invalid due date '{0}', expected YYYY-MM-DD or YYYY-MM-DD HH:MM[:SS]")]
    InvalidDueDate(String),

    #[error("Invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("Task not found: {0}")]
    TaskNotFound(i64),

    #[error("Category not found: {0}")]
    CategoryNotFound(i64),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Username already exists: {0}")]
    UsernameTaken(String),

    #[error("Email already registered: {0}")]
    EmailTaken(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Migration {version} failed: {reason}")]
    Migration { version: u32, reason: String },
}

impl AppError {
    /// Returns `true` for errors caused by malformed caller input.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AppError::InvalidStatus(_)
                | AppError::InvalidPriority(_)
                | AppError::InvalidCategoryId(_)
                | AppError::InvalidColor(_)
                | AppError::InvalidDueDate(_)
                | AppError::InvalidField { .. }
        )
    }

    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        AppError::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
