#[cfg(test)]
mod tests {
    use chrono::{Duration, Local};
    use haatkhata::db::categories::{Categories, NewCategory};
    use haatkhata::db::db::Db;
    use haatkhata::db::tasks::Tasks;
    use haatkhata::libs::config::DatabaseConfig;
    use haatkhata::libs::filter::list_tasks;
    use haatkhata::libs::stats::{dashboard_stats, dashboard_stats_at, TaskStats};
    use haatkhata::libs::store::TaskStore;
    use haatkhata::libs::task::{now, parse_due_date, NewTask, TaskFilter, TaskPatch, TaskStatus};
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct StatsTestContext {
        _temp_dir: TempDir,
        config: DatabaseConfig,
        user_id: i64,
    }

    impl TestContext for StatsTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let config = DatabaseConfig {
                retry_max: 1,
                ..DatabaseConfig::at(temp_dir.path().join("test.db"))
            };
            let db = Db::new(&config).unwrap();
            db.conn
                .execute(
                    "INSERT INTO users (username, email, password_hash, first_name, last_name)
                     VALUES ('selina', 'selina@example.com', 'x', 'Selina', 'Hossain')",
                    [],
                )
                .unwrap();
            let user_id = db.conn.last_insert_rowid();
            StatsTestContext {
                _temp_dir: temp_dir,
                config,
                user_id,
            }
        }
    }

    #[test_context(StatsTestContext)]
    #[test]
    fn test_dashboard_counts_and_overdue(ctx: &mut StatsTestContext) {
        let current = now();
        let mut tasks = Tasks::new(&ctx.config).unwrap();
        tasks
            .insert(&NewTask::new(ctx.user_id, "Due yesterday").due(current - Duration::days(1)))
            .unwrap();
        tasks
            .insert(&NewTask::new(ctx.user_id, "Due tomorrow").due(current + Duration::days(1)))
            .unwrap();
        tasks
            .insert(&NewTask::new(ctx.user_id, "No due date").status(TaskStatus::Completed))
            .unwrap();

        let stats = tasks.read(|store| dashboard_stats(store, ctx.user_id)).unwrap();
        assert_eq!(
            stats,
            TaskStats {
                total: 3,
                pending: 2,
                in_progress: 0,
                completed: 1,
                overdue: 1,
            }
        );
    }

    #[test_context(StatsTestContext)]
    #[test]
    fn test_user_without_tasks_is_all_zero(ctx: &mut StatsTestContext) {
        let mut tasks = Tasks::new(&ctx.config).unwrap();
        let stats = tasks.read(|store| dashboard_stats(store, ctx.user_id)).unwrap();
        assert_eq!(stats, TaskStats::default());

        // an id with no user behind it is not an error either
        let stats = tasks.read(|store| dashboard_stats(store, 424242)).unwrap();
        assert_eq!(stats.total, 0);
    }

    #[test_context(StatsTestContext)]
    #[test]
    fn test_status_counts_sum_to_total(ctx: &mut StatsTestContext) {
        let mut tasks = Tasks::new(&ctx.config).unwrap();
        let statuses = [
            TaskStatus::Pending,
            TaskStatus::InProgress,
            TaskStatus::InProgress,
            TaskStatus::Completed,
            TaskStatus::Pending,
            TaskStatus::Completed,
            TaskStatus::Completed,
        ];
        for (i, status) in statuses.iter().enumerate() {
            tasks
                .insert(&NewTask::new(ctx.user_id, &format!("Task {}", i)).status(*status))
                .unwrap();
        }

        let stats = tasks.read(|store| dashboard_stats(store, ctx.user_id)).unwrap();
        assert_eq!(stats.total, 7);
        assert_eq!(stats.pending + stats.in_progress + stats.completed, stats.total);
        assert_eq!((stats.pending, stats.in_progress, stats.completed), (2, 2, 3));
        assert_eq!(stats.overdue, 0);
    }

    #[test_context(StatsTestContext)]
    #[test]
    fn test_overdue_is_evaluated_at_query_time(ctx: &mut StatsTestContext) {
        let due = parse_due_date("2026-07-01 09:00").unwrap();
        let mut tasks = Tasks::new(&ctx.config).unwrap();
        let task = tasks.insert(&NewTask::new(ctx.user_id, "Submit taxes").due(due)).unwrap();

        let before = tasks
            .read(|store| dashboard_stats_at(store, ctx.user_id, due - Duration::minutes(1)))
            .unwrap();
        assert_eq!(before.overdue, 0);

        // due exactly now is not overdue yet
        let at = tasks.read(|store| dashboard_stats_at(store, ctx.user_id, due)).unwrap();
        assert_eq!(at.overdue, 0);

        let after = tasks
            .read(|store| dashboard_stats_at(store, ctx.user_id, due + Duration::seconds(1)))
            .unwrap();
        assert_eq!(after.overdue, 1);

        // completing the task takes it out of the overdue count
        let patch = TaskPatch {
            status: Some(TaskStatus::Completed),
            ..Default::default()
        };
        tasks.update(task.id, ctx.user_id, &patch).unwrap();
        let done = tasks
            .read(|store| dashboard_stats_at(store, ctx.user_id, due + Duration::days(1)))
            .unwrap();
        assert_eq!(done.overdue, 0);
        assert_eq!(done.completed, 1);
    }

    #[test_context(StatsTestContext)]
    #[test]
    fn test_due_later_today_is_not_overdue(ctx: &mut StatsTestContext) {
        // typed as local wall-clock time, the way `task add --due` receives it
        let local = Local::now().naive_local();
        let due = parse_due_date(&(local + Duration::hours(2)).format("%Y-%m-%d %H:%M").to_string()).unwrap();

        let mut tasks = Tasks::new(&ctx.config).unwrap();
        let task = tasks.insert(&NewTask::new(ctx.user_id, "Pick up parcel").due(due)).unwrap();

        let stats = tasks.read(|store| dashboard_stats(store, ctx.user_id)).unwrap();
        assert_eq!(stats.overdue, 0);

        let views = tasks.read(|store| list_tasks(store, ctx.user_id, &TaskFilter::default())).unwrap();
        assert!(!views[0].overdue);

        // stored timestamps share the clock the due date was typed in
        assert!((task.created_at - local).num_minutes().abs() <= 1);
        let category = Categories::new(&ctx.config).unwrap().create(&NewCategory::new("Errands")).unwrap();
        assert!((category.created_at - local).num_minutes().abs() <= 1);
    }

    #[test_context(StatsTestContext)]
    #[test]
    fn test_one_read_sees_one_snapshot(ctx: &mut StatsTestContext) {
        let mut tasks = Tasks::new(&ctx.config).unwrap();
        tasks.insert(&NewTask::new(ctx.user_id, "Book flights")).unwrap();
        tasks
            .insert(&NewTask::new(ctx.user_id, "Pack bags").status(TaskStatus::InProgress))
            .unwrap();

        let writer = Db::new(&DatabaseConfig {
            busy_timeout_ms: 50,
            ..ctx.config.clone()
        })
        .unwrap();

        let (listed, write, stats) = tasks
            .read(|store| {
                let listed = list_tasks(store, ctx.user_id, &TaskFilter::default())?;
                let write = writer.conn.execute(
                    "INSERT INTO tasks (title, status, priority, user_id) VALUES ('Late arrival', 'pending', 'medium', ?1)",
                    [ctx.user_id],
                );
                let stats = store.count_by_status_and_overdue(ctx.user_id, now())?;
                Ok((listed, write, stats))
            })
            .unwrap();

        // the concurrent write is either blocked or invisible to the open read
        assert_eq!(listed.len(), 2);
        assert_eq!(stats.total as usize, listed.len());
        assert_eq!((stats.pending, stats.in_progress), (1, 1));

        let after = tasks.read(|store| dashboard_stats(store, ctx.user_id)).unwrap();
        let expected = if write.is_ok() { 3 } else { 2 };
        assert_eq!(after.total, expected);
    }
}
