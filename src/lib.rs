//! # HaatKhata - personal task tracking
//!
//! A command-line task tracker backed by a local SQLite database.
//!
//! ## Features
//!
//! - **Tasks**: title, description, status, priority and optional due date
//! - **Categories**: a shared, color-coded list every user can file tasks under
//! - **Filtering**: by status, category, priority and free-text search
//! - **Dashboard**: per-user counts by status plus overdue tasks
//! - **Users**: registration with argon2-hashed passwords
//!
//! ## Usage
//!
//! ```rust,no_run
//! use haatkhata::commands::Cli;
//!
//! fn main() -> anyhow::Result<()> {
//!     Cli::menu()
//! }
//! ```

pub mod commands;
pub mod db;
pub mod libs;
