use crate::{
    db::{
        db::Db,
        migrations::{get_db_version, needs_migration, MigrationManager},
    },
    libs::{config::Config, messages::Message, view::View},
    msg_info, msg_print,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct MigrationsArgs {
    #[command(subcommand)]
    command: MigrationsCommand,
}

#[derive(Debug, Subcommand)]
enum MigrationsCommand {
    /// Show current database version
    Status,
    /// Show migration history
    History,
}

pub fn cmd(args: MigrationsArgs, config: &Config) -> Result<()> {
    // Inspect the schema as it is, without upgrading it first
    let conn = Db::new_without_migrations(&config.database)?;
    let manager = MigrationManager::new();

    match args.command {
        MigrationsCommand::Status => {
            let current = get_db_version(&conn)?;

            msg_print!(Message::DbVersion {
                current,
                latest: manager.latest_version()
            });
            if needs_migration(&conn)? {
                msg_info!(Message::DbNeedsMigration);
            } else {
                msg_info!(Message::DbUpToDate);
            }
        }
        MigrationsCommand::History => {
            let history = manager.get_migration_history(&conn)?;

            if history.is_empty() {
                msg_info!(Message::NoMigrationsApplied);
                return Ok(());
            }

            msg_print!(Message::MigrationHistoryHeader, true);
            View::migrations(&history)?;
        }
    }

    Ok(())
}
