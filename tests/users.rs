#[cfg(test)]
mod tests {
    use haatkhata::db::tasks::Tasks;
    use haatkhata::db::users::{NewUser, UserPatch, Users};
    use haatkhata::libs::config::DatabaseConfig;
    use haatkhata::libs::error::AppError;
    use haatkhata::libs::task::NewTask;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct UserTestContext {
        _temp_dir: TempDir,
        config: DatabaseConfig,
    }

    impl TestContext for UserTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let config = DatabaseConfig {
                retry_max: 1,
                ..DatabaseConfig::at(temp_dir.path().join("test.db"))
            };
            UserTestContext {
                _temp_dir: temp_dir,
                config,
            }
        }
    }

    fn form(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password: "hunter22".to_string(),
            first_name: "Ayesha".to_string(),
            last_name: "Rahman".to_string(),
        }
    }

    #[test_context(UserTestContext)]
    #[test]
    fn test_register_stores_hash_not_password(ctx: &mut UserTestContext) {
        let mut users = Users::new(&ctx.config).unwrap();

        let user = users.register(&form("ayesha", "ayesha@example.com")).unwrap();
        assert_eq!(user.username, "ayesha");
        assert_ne!(user.password_hash, "hunter22");
        assert!(user.password_hash.starts_with("$argon2"));

        assert_eq!(users.get_by_email("ayesha@example.com").unwrap().unwrap().id, user.id);
        assert_eq!(users.get_by_id(user.id).unwrap().unwrap().username, "ayesha");
        assert!(users.get_by_username("nobody").unwrap().is_none());
    }

    #[test_context(UserTestContext)]
    #[test]
    fn test_register_rejects_duplicates(ctx: &mut UserTestContext) {
        let mut users = Users::new(&ctx.config).unwrap();
        users.register(&form("ayesha", "ayesha@example.com")).unwrap();

        assert!(matches!(
            users.register(&form("ayesha", "other@example.com")),
            Err(AppError::UsernameTaken(_))
        ));
        assert!(matches!(
            users.register(&form("someone", "ayesha@example.com")),
            Err(AppError::EmailTaken(_))
        ));
    }

    #[test_context(UserTestContext)]
    #[test]
    fn test_verify_password(ctx: &mut UserTestContext) {
        let mut users = Users::new(&ctx.config).unwrap();
        let user = users.register(&form("ayesha", "ayesha@example.com")).unwrap();

        let verified = users.verify_password("ayesha", "hunter22").unwrap().unwrap();
        assert_eq!(verified.id, user.id);
        assert!(users.verify_password("ayesha", "hunter23").unwrap().is_none());
        assert!(users.verify_password("ghost", "hunter22").unwrap().is_none());
    }

    #[test_context(UserTestContext)]
    #[test]
    fn test_update_profile(ctx: &mut UserTestContext) {
        let mut users = Users::new(&ctx.config).unwrap();
        let user = users.register(&form("ayesha", "ayesha@example.com")).unwrap();
        users.register(&form("bilal", "bilal@example.com")).unwrap();

        let patch = UserPatch {
            email: Some("ayesha@work.example".to_string()),
            last_name: Some("Karim".to_string()),
            ..Default::default()
        };
        let updated = users.update(user.id, &patch).unwrap();
        assert_eq!(updated.email, "ayesha@work.example");
        assert_eq!(updated.first_name, "Ayesha");
        assert_eq!(updated.last_name, "Karim");

        // keeping one's own email is fine
        let same_email = UserPatch {
            email: Some("ayesha@work.example".to_string()),
            ..Default::default()
        };
        assert!(users.update(user.id, &same_email).is_ok());

        let taken = UserPatch {
            email: Some("bilal@example.com".to_string()),
            ..Default::default()
        };
        assert!(matches!(users.update(user.id, &taken), Err(AppError::EmailTaken(_))));
    }

    #[test_context(UserTestContext)]
    #[test]
    fn test_delete_user_cascades_to_tasks(ctx: &mut UserTestContext) {
        let mut users = Users::new(&ctx.config).unwrap();
        let user = users.register(&form("ayesha", "ayesha@example.com")).unwrap();

        let mut tasks = Tasks::new(&ctx.config).unwrap();
        let task = tasks.insert(&NewTask::new(user.id, "Plan trip")).unwrap();

        users.delete(user.id).unwrap();
        assert!(users.get_by_id(user.id).unwrap().is_none());
        assert!(tasks.get_by_id(task.id).unwrap().is_none());
        assert!(matches!(users.delete(user.id), Err(AppError::UserNotFound(_))));
    }
}
