//! Database layer for the haatkhata application.
//!
//! SQLite persistence for users, shared categories and tasks. Every store
//! struct owns its own connection, opened through [`db::Db`] so that foreign
//! keys are on and the schema is current before the first query.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use haatkhata::db::{tasks::Tasks, users::Users};
//! use haatkhata::libs::config::DatabaseConfig;
//! use haatkhata::libs::task::NewTask;
//!
//! let config = DatabaseConfig::at("haatkhata.db");
//! let user = Users::new(&config)?.require("rahim")?;
//! let task = Tasks::new(&config)?.insert(&NewTask::new(user.id, "Buy groceries"))?;
//! # Ok::<(), haatkhata::libs::error::AppError>(())
//! ```

/// Connection setup with retries and migrations.
pub mod db;

/// Versioned schema changes and their history.
pub mod migrations;

/// Shared categories and the default set.
pub mod categories;

/// Task CRUD and the read snapshot behind filtering and stats.
pub mod tasks;

/// Registration, profile updates and password checks.
pub mod users;
