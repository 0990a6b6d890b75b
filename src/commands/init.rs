//! First-run setup.
//!
//! Writes `config.json` when a database location is given, creates the
//! database with the current schema and seeds the default categories when
//! none exist.

use crate::{
    db::categories::Categories,
    libs::{config::Config, messages::Message},
    msg_info, msg_success,
};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Store the database at this path instead of the data directory
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Skip seeding the default categories
    #[arg(long)]
    no_defaults: bool,
}

pub fn cmd(init_args: InitArgs, config: &Config) -> Result<()> {
    let mut config = config.clone();

    if let Some(path) = init_args.db_path {
        config.database.path = Some(path);
        let saved_to = config.save()?;
        msg_success!(Message::ConfigSaved(saved_to.display().to_string()));
    }

    let mut categories = Categories::new(&config.database)?;
    let db_path = config.database.resolve_path()?;
    msg_success!(Message::DatabaseInitialized(db_path.display().to_string()));

    if init_args.no_defaults {
        return Ok(());
    }

    match categories.seed_defaults()? {
        0 => msg_info!(Message::DefaultCategoriesPresent),
        seeded => msg_success!(Message::DefaultCategoriesSeeded(seeded)),
    }

    Ok(())
}
