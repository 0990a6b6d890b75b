use crate::{
    db::{tasks::Tasks, users::Users},
    libs::{
        config::Config,
        filter::list_tasks_at,
        messages::Message,
        stats::dashboard_stats_at,
        task::{now, TaskFilter},
        view::View,
    },
    msg_info, msg_print,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct DashboardArgs {
    /// Username of the task owner
    #[arg(short, long)]
    user: String,

    /// Number of recent tasks to show
    #[arg(short, long, default_value_t = 5)]
    recent: usize,
}

pub fn cmd(args: DashboardArgs, config: &Config) -> Result<()> {
    let user = Users::new(&config.database)?.require(&args.user)?;
    let mut tasks = Tasks::new(&config.database)?;

    // Stats and the recent list come from the same snapshot and the same instant
    let at = now();
    let (stats, mut recent) = tasks.read(|store| {
        let stats = dashboard_stats_at(store, user.id, at)?;
        let recent = list_tasks_at(store, user.id, &TaskFilter::default(), at)?;
        Ok((stats, recent))
    })?;
    recent.truncate(args.recent);

    msg_print!(Message::DashboardHeader(user.first_name.clone()), true);
    View::stats(&stats)?;

    if recent.is_empty() {
        msg_info!(Message::NoTasksFound);
        return Ok(());
    }

    msg_print!(Message::RecentTasksHeader(recent.len()), true);
    View::tasks(&recent)?;

    Ok(())
}
