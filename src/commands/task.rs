use crate::{
    db::{categories::Categories, tasks::Tasks, users::Users},
    libs::{
        config::Config,
        filter::{list_tasks, CategoryBadge, FilterArgs, TaskView},
        messages::Message,
        task::{now, parse_due_date, NewTask, TaskPatch, TaskPriority, TaskStatus},
        view::View,
    },
    msg_bail_anyhow, msg_info, msg_print, msg_success, msg_warning,
};
use anyhow::Result;
use clap::{Args, Subcommand};
use dialoguer::{theme::ColorfulTheme, Confirm};

#[derive(Debug, Args)]
pub struct TaskArgs {
    /// Username of the task owner
    #[arg(short, long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: TaskCommand,
}

#[derive(Debug, Subcommand)]
enum TaskCommand {
    /// Create a task
    Add {
        title: String,
        #[arg(short, long)]
        description: Option<String>,
        /// low, medium or high
        #[arg(short, long)]
        priority: Option<String>,
        /// Category ID
        #[arg(short, long)]
        category: Option<i64>,
        /// YYYY-MM-DD or YYYY-MM-DD HH:MM[:SS]
        #[arg(long)]
        due: Option<String>,
    },
    /// List tasks, newest first
    List {
        /// pending, in_progress or completed
        #[arg(short, long)]
        status: Option<String>,
        /// Category ID
        #[arg(short, long)]
        category: Option<String>,
        /// low, medium or high
        #[arg(short, long)]
        priority: Option<String>,
        /// Text to look for in the title or description
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one task
    Show { id: i64 },
    /// Change a task
    Edit {
        id: i64,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long)]
        status: Option<String>,
        #[arg(short, long)]
        priority: Option<String>,
        #[arg(short, long, conflicts_with = "clear_category")]
        category: Option<i64>,
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<String>,
        #[arg(long)]
        clear_category: bool,
        #[arg(long)]
        clear_due: bool,
    },
    /// Delete a task
    Delete {
        id: i64,
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

pub fn cmd(args: TaskArgs, config: &Config) -> Result<()> {
    let Some(username) = args.user else {
        msg_bail_anyhow!(Message::UserRequired);
    };
    let user = Users::new(&config.database)?.require(&username)?;
    let mut tasks = Tasks::new(&config.database)?;

    match args.command {
        TaskCommand::Add {
            title,
            description,
            priority,
            category,
            due,
        } => {
            let mut new_task = NewTask::new(user.id, &title);
            if let Some(description) = &description {
                new_task = new_task.description(description);
            }
            if let Some(priority) = &priority {
                new_task = new_task.priority(priority.parse::<TaskPriority>()?);
            }
            if let Some(category) = category {
                new_task = new_task.category(category);
            }
            if let Some(due) = &due {
                new_task = new_task.due(parse_due_date(due)?);
            }

            let task = tasks.insert(&new_task)?;
            msg_success!(Message::TaskCreated(task.id));
        }
        TaskCommand::List {
            status,
            category,
            priority,
            search,
        } => {
            let filter = FilterArgs {
                status,
                category,
                priority,
                search,
            }
            .parse()?;
            let views = tasks.read(|store| list_tasks(store, user.id, &filter))?;

            if views.is_empty() {
                msg_info!(Message::NoTasksFound);
                return Ok(());
            }

            msg_print!(Message::TasksHeader(views.len()), true);
            View::tasks(&views)?;
        }
        TaskCommand::Show { id } => {
            let task = tasks.get_owned(id, user.id)?;
            let category = match task.category_id {
                Some(category_id) => Categories::new(&config.database)?
                    .get_by_id(category_id)?
                    .as_ref()
                    .map(CategoryBadge::from),
                None => None,
            };
            let overdue = task.is_overdue(now());

            View::task(&TaskView {
                task,
                category,
                overdue,
            })?;
        }
        TaskCommand::Edit {
            id,
            title,
            description,
            status,
            priority,
            category,
            due,
            clear_category,
            clear_due,
        } => {
            let patch = TaskPatch {
                title,
                description: description.map(Some),
                status: status.as_deref().map(str::parse::<TaskStatus>).transpose()?,
                priority: priority.as_deref().map(str::parse::<TaskPriority>).transpose()?,
                category_id: if clear_category { Some(None) } else { category.map(Some) },
                due_date: if clear_due {
                    Some(None)
                } else {
                    due.as_deref().map(parse_due_date).transpose()?.map(Some)
                },
            };
            if patch.is_empty() {
                msg_info!(Message::NoChangesDetected);
                return Ok(());
            }

            let task = tasks.update(id, user.id, &patch)?;
            msg_success!(Message::TaskUpdated(task.id));
        }
        TaskCommand::Delete { id, yes } => {
            let task = tasks.get_owned(id, user.id)?;

            let confirmed = yes
                || Confirm::with_theme(&ColorfulTheme::default())
                    .with_prompt(Message::ConfirmDeleteTask(task.title.clone()).to_string())
                    .default(false)
                    .interact()?;

            if !confirmed {
                msg_warning!(Message::OperationCancelled);
                return Ok(());
            }

            tasks.delete(id, user.id)?;
            msg_success!(Message::TaskDeleted(id));
        }
    }

    Ok(())
}
