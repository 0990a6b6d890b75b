//! Display text for every [`Message`].
//!
//! All user-facing strings live here so wording stays consistent across
//! commands.

use super::types::Message;
use std::fmt;

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            // === SETUP MESSAGES ===
            Message::ConfigSaved(path) => format!("Configuration saved to {}", path),
            Message::DatabaseInitialized(path) => format!("Database ready at {}", path),
            Message::DefaultCategoriesSeeded(count) => format!("Added {} default categories", count),
            Message::DefaultCategoriesPresent => "Categories already exist, defaults not added".to_string(),

            // === MIGRATION MESSAGES ===
            Message::MigrationsFound(count) => format!("Found {} pending migration(s)", count),
            Message::RunningMigration(version, name) => format!("Running migration v{}: {}", version, name),
            Message::MigrationFailed(version, error) => format!("Migration v{} failed: {}", version, error),
            Message::MigrationsApplied(version) => format!("Database migrated to v{}", version),
            Message::DbVersion { current, latest } => format!("Schema version: {} (latest: {})", current, latest),
            Message::DbUpToDate => "Database is up to date".to_string(),
            Message::DbNeedsMigration => "Database needs migration".to_string(),
            Message::MigrationHistoryHeader => "Migration history:".to_string(),
            Message::NoMigrationsApplied => "No migrations applied yet".to_string(),

            // === USER MESSAGES ===
            Message::UserRegistered(username) => format!("User '{}' registered", username),
            Message::UserUpdated(username) => format!("Profile of '{}' updated", username),
            Message::UserDeleted(username) => format!("User '{}' and all of their tasks deleted", username),
            Message::UserHeader(username) => format!("User '{}':", username),
            Message::UserRequired => "Pass the task owner with --user <USERNAME>".to_string(),
            Message::PromptPassword => "Password".to_string(),
            Message::PromptPasswordConfirm => "Repeat password".to_string(),
            Message::PasswordMismatch => "Passwords do not match".to_string(),
            Message::PasswordValid(first_name) => format!("Welcome back, {}!", first_name),
            Message::PasswordInvalid => "Invalid username or password".to_string(),
            Message::ConfirmDeleteUser(username) => {
                format!("Delete user '{}' and all of their tasks?", username)
            }

            // === CATEGORY MESSAGES ===
            Message::CategoryCreated(name) => format!("Category '{}' created", name),
            Message::CategoryUpdated(name) => format!("Category '{}' updated", name),
            Message::CategoryDeleted(name) => format!("Category '{}' deleted", name),
            Message::CategoryListHeader => "Categories:".to_string(),
            Message::NoCategoriesFound => "No categories found".to_string(),
            Message::ConfirmDeleteCategory(name, 0) => format!("Delete category '{}'?", name),
            Message::ConfirmDeleteCategory(name, count) => {
                format!("Delete category '{}'? {} task(s) will be left without a category", name, count)
            }

            // === TASK MESSAGES ===
            Message::TaskCreated(id) => format!("Task #{} created", id),
            Message::TaskUpdated(id) => format!("Task #{} updated", id),
            Message::TaskDeleted(id) => format!("Task #{} deleted", id),
            Message::TasksHeader(count) => format!("Tasks ({}):", count),
            Message::NoTasksFound => "No tasks found".to_string(),
            Message::ConfirmDeleteTask(title) => format!("Delete task '{}'?", title),

            // === DASHBOARD MESSAGES ===
            Message::DashboardHeader(first_name) => format!("Dashboard for {}", first_name),
            Message::RecentTasksHeader(count) => format!("Recent tasks (latest {}):", count),

            // === GENERIC MESSAGES ===
            Message::NoChangesDetected => "No changes detected".to_string(),
            Message::OperationCancelled => "Operation cancelled".to_string(),
        };

        f.write_str(&text)
    }
}
