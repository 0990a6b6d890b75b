#[derive(Debug, Clone)]
pub enum Message {
    // === SETUP MESSAGES ===
    ConfigSaved(String),        // path
    DatabaseInitialized(String), // path
    DefaultCategoriesSeeded(usize),
    DefaultCategoriesPresent,

    // === MIGRATION MESSAGES ===
    MigrationsFound(usize),
    RunningMigration(u32, String),
    MigrationFailed(u32, String),
    MigrationsApplied(u32),
    DbVersion { current: u32, latest: u32 },
    DbUpToDate,
    DbNeedsMigration,
    MigrationHistoryHeader,
    NoMigrationsApplied,

    // === USER MESSAGES ===
    UserRegistered(String),
    UserUpdated(String),
    UserDeleted(String),
    UserHeader(String),
    UserRequired,
    PromptPassword,
    PromptPasswordConfirm,
    PasswordMismatch,
    PasswordValid(String), // first name
    PasswordInvalid,
    ConfirmDeleteUser(String),

    // === CATEGORY MESSAGES ===
    CategoryCreated(String),
    CategoryUpdated(String),
    CategoryDeleted(String),
    CategoryListHeader,
    NoCategoriesFound,
    ConfirmDeleteCategory(String, usize), // name, attached task count

    // === TASK MESSAGES ===
    TaskCreated(i64),
    TaskUpdated(i64),
    TaskDeleted(i64),
    TasksHeader(usize),
    NoTasksFound,
    ConfirmDeleteTask(String),

    // === DASHBOARD MESSAGES ===
    DashboardHeader(String),
    RecentTasksHeader(usize),

    // === GENERIC MESSAGES ===
    NoChangesDetected,
    OperationCancelled,
}
