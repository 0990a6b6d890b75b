use crate::{
    db::categories::{Categories, CategoryPatch, NewCategory},
    libs::{config::Config, error::AppError, messages::Message, view::View},
    msg_info, msg_print, msg_success, msg_warning,
};
use anyhow::Result;
use clap::{Args, Subcommand};
use dialoguer::{theme::ColorfulTheme, Confirm};

#[derive(Debug, Args)]
pub struct CategoryArgs {
    #[command(subcommand)]
    command: CategoryCommand,
}

#[derive(Debug, Subcommand)]
enum CategoryCommand {
    /// List all categories
    List,
    /// Create a new category
    Create {
        /// Category name
        name: String,
        #[arg(short, long)]
        description: Option<String>,
        /// Hex color, e.g. #28a745
        #[arg(short, long)]
        color: Option<String>,
    },
    /// Edit a category
    Edit {
        /// Category ID
        id: i64,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long, conflicts_with = "clear_description")]
        description: Option<String>,
        #[arg(long)]
        clear_description: bool,
        #[arg(short, long)]
        color: Option<String>,
    },
    /// Delete a category. Its tasks are kept without a category.
    Delete {
        /// Category ID
        id: i64,
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

pub fn cmd(args: CategoryArgs, config: &Config) -> Result<()> {
    let mut categories = Categories::new(&config.database)?;

    match args.command {
        CategoryCommand::List => {
            let list = categories.list()?;
            if list.is_empty() {
                msg_info!(Message::NoCategoriesFound);
                return Ok(());
            }

            msg_print!(Message::CategoryListHeader, true);
            View::categories(&list)?;
        }
        CategoryCommand::Create {
            name,
            description,
            color,
        } => {
            let mut category = NewCategory::new(&name);
            if let Some(description) = &description {
                category = category.description(description);
            }
            if let Some(color) = &color {
                category = category.color(color);
            }

            let created = categories.create(&category)?;
            msg_success!(Message::CategoryCreated(created.name));
        }
        CategoryCommand::Edit {
            id,
            name,
            description,
            clear_description,
            color,
        } => {
            let patch = CategoryPatch {
                name,
                description: if clear_description { Some(None) } else { description.map(Some) },
                color,
            };
            if patch.is_empty() {
                msg_info!(Message::NoChangesDetected);
                return Ok(());
            }

            let updated = categories.update(id, &patch)?;
            msg_success!(Message::CategoryUpdated(updated.name));
        }
        CategoryCommand::Delete { id, yes } => {
            let category = categories.get_by_id(id)?.ok_or(AppError::CategoryNotFound(id))?;
            let attached = categories.task_count(id)?;

            let confirmed = yes
                || Confirm::with_theme(&ColorfulTheme::default())
                    .with_prompt(Message::ConfirmDeleteCategory(category.name.clone(), attached).to_string())
                    .default(false)
                    .interact()?;

            if !confirmed {
                msg_warning!(Message::OperationCancelled);
                return Ok(());
            }

            categories.delete(id)?;
            msg_success!(Message::CategoryDeleted(category.name));
        }
    }

    Ok(())
}
