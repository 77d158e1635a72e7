use famfin::core::family::RelationKind;
use famfin::core::record::Category;
use tracing::info;

// Adds automatic logging to test
mod test_utils {
    use std::fs;
    use std::path::PathBuf;

    // One directory per test; the data path sits next to the config so
    // repeated run_command calls hit the same keyspace.
    pub fn write_config(dir: &tempfile::TempDir) -> PathBuf {
        let data_path = dir.path().join("data");
        let config_path = dir.path().join("config.yaml");
        let config_content = format!(
            r#"
            namespace: "itest"
            currency: "USD"
            data_path: "{}"
        "#,
            data_path.display()
        );

        fs::write(&config_path, &config_content).expect("Failed to write config file");
        config_path
    }
}

#[test_log::test(tokio::test)]
async fn test_summary_runs_signed_out() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(&dir);

    let result = famfin::run_command(
        famfin::AppCommand::Summary { month: None },
        Some(config_path.to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "Summary failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_register_add_recent_summary_flow() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(&dir);
    let config = config_path.to_str().unwrap();

    info!("Registering account");
    let result = famfin::run_command(
        famfin::AppCommand::Register {
            username: "ana".to_string(),
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            birth_date: None,
        },
        Some(config),
    )
    .await;
    assert!(result.is_ok(), "Register failed with: {:?}", result.err());

    // The session survives in the data directory, so the next invocation
    // starts signed in.
    let result = famfin::run_command(
        famfin::AppCommand::Add {
            amount: 12.5,
            description: Some("Groceries".to_string()),
            category: Some(Category::Food),
        },
        Some(config),
    )
    .await;
    assert!(result.is_ok(), "Add failed with: {:?}", result.err());

    let result = famfin::run_command(famfin::AppCommand::Recent { limit: 5 }, Some(config)).await;
    assert!(result.is_ok(), "Recent failed with: {:?}", result.err());

    let result = famfin::run_command(famfin::AppCommand::Summary { month: None }, Some(config)).await;
    assert!(result.is_ok(), "Summary failed with: {:?}", result.err());

    // A historical month renders an empty dashboard rather than failing.
    let past = "2020-01".parse().expect("valid month key");
    let result = famfin::run_command(
        famfin::AppCommand::Summary { month: Some(past) },
        Some(config),
    )
    .await;
    assert!(result.is_ok(), "Summary failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_add_without_account_fails() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(&dir);

    let result = famfin::run_command(
        famfin::AppCommand::Add {
            amount: 5.0,
            description: None,
            category: None,
        },
        Some(config_path.to_str().unwrap()),
    )
    .await;

    let err = result.expect_err("Add should fail without an account").to_string();
    assert!(err.contains("sign in"), "unexpected error: {err}");
}

#[test_log::test(tokio::test)]
async fn test_family_and_snapshot_flow() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(&dir);
    let config = config_path.to_str().unwrap();

    let result = famfin::run_command(
        famfin::AppCommand::Family(famfin::FamilyCommand::Add {
            name: "Ana".to_string(),
            relation: RelationKind::Spouse,
            spend: 200.0,
        }),
        Some(config),
    )
    .await;
    assert!(result.is_ok(), "Family add failed with: {:?}", result.err());

    let result =
        famfin::run_command(famfin::AppCommand::Family(famfin::FamilyCommand::List), Some(config))
            .await;
    assert!(result.is_ok(), "Family list failed with: {:?}", result.err());

    let result = famfin::run_command(
        famfin::AppCommand::Snapshot(famfin::SnapshotCommand::Save),
        Some(config),
    )
    .await;
    assert!(result.is_ok(), "Snapshot save failed with: {:?}", result.err());

    let result = famfin::run_command(
        famfin::AppCommand::Snapshot(famfin::SnapshotCommand::List),
        Some(config),
    )
    .await;
    assert!(result.is_ok(), "Snapshot list failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_login_unknown_user_fails() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(&dir);

    let result = famfin::run_command(
        famfin::AppCommand::Login {
            username: "ghost".to_string(),
            password: String::new(),
        },
        Some(config_path.to_str().unwrap()),
    )
    .await;

    let err = result.expect_err("Login should fail for unknown user").to_string();
    assert!(err.contains("unknown user"), "unexpected error: {err}");
}

#[test_log::test(tokio::test)]
async fn test_goal_without_account_fails() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(&dir);

    let result = famfin::run_command(
        famfin::AppCommand::Goal {
            monthly: Some(100.0),
            savings: None,
        },
        Some(config_path.to_str().unwrap()),
    )
    .await;

    let err = result.expect_err("Goal should fail without an account").to_string();
    assert!(
        err.contains("Sign in to manage goals"),
        "unexpected error: {err}"
    );
}

#[test_log::test(tokio::test)]
async fn test_register_goal_suggest_flow() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(&dir);
    let config = config_path.to_str().unwrap();

    let result = famfin::run_command(
        famfin::AppCommand::Register {
            username: "ben".to_string(),
            name: "Ben".to_string(),
            email: "ben@example.com".to_string(),
            birth_date: None,
        },
        Some(config),
    )
    .await;
    assert!(result.is_ok(), "Register failed with: {:?}", result.err());

    let result = famfin::run_command(
        famfin::AppCommand::Goal {
            monthly: Some(1500.0),
            savings: None,
        },
        Some(config),
    )
    .await;
    assert!(result.is_ok(), "Goal failed with: {:?}", result.err());

    let result = famfin::run_command(famfin::AppCommand::Suggest, Some(config)).await;
    assert!(result.is_ok(), "Suggest failed with: {:?}", result.err());
}
