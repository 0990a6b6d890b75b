pub mod category;
pub mod dashboard;
pub mod init;
pub mod migrations;
pub mod task;
pub mod user;

use crate::libs::config::Config;
use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Create the database and default categories")]
    Init(init::InitArgs),
    #[command(about = "Register and manage users", arg_required_else_help = true)]
    User(user::UserArgs),
    #[command(about = "Manage shared categories", arg_required_else_help = true)]
    Category(category::CategoryArgs),
    #[command(about = "Create, list and change tasks", arg_required_else_help = true)]
    Task(task::TaskArgs),
    #[command(about = "Task counts and recent tasks for a user")]
    Dashboard(dashboard::DashboardArgs),
    #[command(about = "Inspect the database schema version", arg_required_else_help = true)]
    Migrations(migrations::MigrationsArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parses the command line and runs the selected command.
    ///
    /// Configuration is loaded once here and handed to the command.
    pub fn menu() -> Result<()> {
        let cli = Self::parse();
        let config = Config::load()?;

        match cli.command {
            Commands::Init(args) => init::cmd(args, &config),
            Commands::User(args) => user::cmd(args, &config),
            Commands::Category(args) => category::cmd(args, &config),
            Commands::Task(args) => task::cmd(args, &config),
            Commands::Dashboard(args) => dashboard::cmd(args, &config),
            Commands::Migrations(args) => migrations::cmd(args, &config),
        }
    }
}
