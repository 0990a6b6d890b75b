use super::migrations::init_with_migrations;
use crate::libs::config::DatabaseConfig;
use crate::libs::error::Result;
use rusqlite::Connection;
use std::thread;
use tracing::{debug, warn};

pub struct Db {
    pub conn: Connection,
}

impl Db {
    /// Opens the configured database, enables foreign keys and applies pending migrations.
    pub fn new(config: &DatabaseConfig) -> Result<Db> {
        let mut conn = Db::new_without_migrations(config)?;
        init_with_migrations(&mut conn)?;

        Ok(Db { conn })
    }

    /// Opens the configured database without touching the schema.
    ///
    /// Opening is retried up to `retry_max` times, sleeping `retry_seconds`
    /// between attempts. The last error is returned when every attempt fails.
    pub fn new_without_migrations(config: &DatabaseConfig) -> Result<Connection> {
        let path = config.resolve_path()?;
        let attempts = config.retry_max.max(1);

        let mut attempt = 1;
        loop {
            match Connection::open(&path).and_then(|conn| Db::configure(conn, config)) {
                Ok(conn) => {
                    debug!(path = %path.display(), attempt, "database opened");
                    return Ok(conn);
                }
                Err(e) if attempt < attempts => {
                    warn!("DB connection attempt {}/{} failed: {}", attempt, attempts, e);
                    thread::sleep(config.retry_delay());
                    attempt += 1;
                }
                Err(e) => {
                    warn!("DB connection attempt {}/{} failed: {}", attempt, attempts, e);
                    return Err(e.into());
                }
            }
        }
    }

    fn configure(conn: Connection, config: &DatabaseConfig) -> rusqlite::Result<Connection> {
        conn.busy_timeout(config.busy_timeout())?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(conn)
    }
}
