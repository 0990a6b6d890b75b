//! Configuration management for the haatkhata application.
//!
//! Configuration is created once at startup and then passed by reference to
//! whichever component needs it. Nothing reads connection parameters from
//! ambient global state after that point.
//!
//! ## Sources
//!
//! Settings are resolved in this order, later sources winning:
//!
//! 1. Built-in defaults ([`DatabaseConfig::default`])
//! 2. `config.json` in the platform data directory
//! 3. Environment variables, including those loaded from a `.env` file
//!
//! ## Environment Variables
//!
//! | Variable              | Field                          |
//! |-----------------------|--------------------------------|
//! | `HAATKHATA_DB_PATH`   | [`DatabaseConfig::path`]       |
//! | `DB_RETRY_MAX`        | [`DatabaseConfig::retry_max`]  |
//! | `DB_RETRY_SECONDS`    | [`DatabaseConfig::retry_seconds`] |
//! | `DB_BUSY_TIMEOUT_MS`  | [`DatabaseConfig::busy_timeout_ms`] |
//!
//! ## Usage
//!
//! ```rust,no_run
//! use haatkhata::libs::config::Config;
//! use haatkhata::db::tasks::Tasks;
//!
//! let config = Config::load()?;
//! let tasks = Tasks::new(&config.database)?;
//! # Ok::<(), haatkhata::libs::error::AppError>(())
//! ```

use super::data_storage::DataStorage;
use super::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration file name inside the data directory.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Database file name used when no explicit path is configured.
pub const DB_FILE_NAME: &str = "haatkhata.db";

pub const ENV_DB_PATH: &str = "HAATKHATA_DB_PATH";
pub const ENV_RETRY_MAX: &str = "DB_RETRY_MAX";
pub const ENV_RETRY_SECONDS: &str = "DB_RETRY_SECONDS";
pub const ENV_BUSY_TIMEOUT_MS: &str = "DB_BUSY_TIMEOUT_MS";

/// Storage connection settings.
///
/// Handed to the store constructors (`Tasks::new`, `Categories::new`,
/// `Users::new`). Immutable once the application has started.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite database file.
    ///
    /// `None` places `haatkhata.db` in the platform data directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Number of attempts made to open the database before giving up.
    pub retry_max: u32,

    /// Pause between failed open attempts, in seconds.
    pub retry_seconds: u64,

    /// How long a statement waits on a locked database before failing, in milliseconds.
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            path: None,
            retry_max: 10,
            retry_seconds: 2,
            busy_timeout_ms: 5000,
        }
    }
}

impl DatabaseConfig {
    /// Config pointing at a specific database file, other settings defaulted.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        DatabaseConfig {
            path: Some(path.into()),
            ..Default::default()
        }
    }

    /// Returns the database file path, falling back to the data directory.
    pub fn resolve_path(&self) -> Result<PathBuf> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => Ok(DataStorage::new().get_path(DB_FILE_NAME)?),
        }
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_seconds)
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

/// Root configuration container.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
}

impl Config {
    /// Loads the effective configuration: file, then `.env`, then process environment.
    pub fn load() -> Result<Config> {
        // A missing .env file is normal
        let _ = dotenv::dotenv();

        let mut config = Config::read()?;
        config.apply_env(|key| env::var(key).ok())?;
        Ok(config)
    }

    /// Reads `config.json` from the data directory, or returns defaults when it does not exist.
    pub fn read() -> Result<Config> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        Config::read_from(&config_file_path)
    }

    pub fn read_from(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    /// Writes the configuration as pretty-printed JSON to the data directory.
    pub fn save(&self) -> Result<PathBuf> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        self.save_to(&config_file_path)?;
        Ok(config_file_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let config_file = File::create(path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Overrides fields from environment variables supplied by `lookup`.
    ///
    /// Unset or empty variables leave the current value alone. A variable that
    /// is set but does not parse is rejected.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(path) = lookup(ENV_DB_PATH) {
            self.database.path = Some(PathBuf::from(path));
        }
        if let Some(value) = lookup(ENV_RETRY_MAX) {
            self.database.retry_max = parse_env(ENV_RETRY_MAX, &value)?;
        }
        if let Some(value) = lookup(ENV_RETRY_SECONDS) {
            self.database.retry_seconds = parse_env(ENV_RETRY_SECONDS, &value)?;
        }
        if let Some(value) = lookup(ENV_BUSY_TIMEOUT_MS) {
            self.database.busy_timeout_ms = parse_env(ENV_BUSY_TIMEOUT_MS, &value)?;
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| AppError::invalid(key, format!("'{}' is not a valid number", value)))
}
