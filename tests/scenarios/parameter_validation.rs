//! Test: required operation parameters are checked before any command runs

use crate::helpers::*;
use rmk_action::core::config::{DependencyParams, ReleaseParams};
use rmk_action::core::error::ActionError;
use rmk_action::core::{Environment, ExecutionContext};

#[tokio::test]
async fn test_release_update_without_version() {
    let mut config = config("release_update");
    config.release = ReleaseParams {
        repository: "org/app".to_string(),
        version: String::new(),
        skip_deploy: false,
    };

    let harness = Harness::new(RecordingRunner::new());
    let err = harness
        .dispatcher
        .execute(&context(&config))
        .await
        .unwrap_err();

    assert!(matches!(err, ActionError::MissingParameter(_)));
    assert!(harness.runner.calls().is_empty());
    assert!(harness.notifier.sent().is_empty());
    assert!(harness.output.written().is_empty());
}

#[tokio::test]
async fn test_project_update_without_dependency_name() {
    let mut config = config("project_update");
    config.dependency = DependencyParams {
        name: String::new(),
        version: "v1.2.0".to_string(),
    };

    let harness = Harness::new(RecordingRunner::new());
    let err = harness
        .dispatcher
        .execute(&context(&config))
        .await
        .unwrap_err();

    assert!(matches!(err, ActionError::MissingParameter(_)));
    assert!(harness.runner.calls().is_empty());
}

#[test]
fn test_unknown_command_rejected_before_dispatch() {
    let config = config("cluster_upgrade");
    let err = ExecutionContext::from_config(&config, Environment::Develop, "develop", "acme")
        .unwrap_err();

    assert!(matches!(err, ActionError::UnknownCommand(ref name) if name == "cluster_upgrade"));
}

#[tokio::test]
async fn test_release_update_skip_deploy_commits() {
    let mut config = config("release_update");
    config.release = ReleaseParams {
        repository: "org/app".to_string(),
        version: "v2.3.1".to_string(),
        skip_deploy: true,
    };

    let harness = Harness::new(RecordingRunner::new());
    harness.dispatcher.execute(&context(&config)).await.unwrap();

    assert_eq!(
        harness.runner.calls(),
        vec![
            "rmk release update --repository org/app --tag v2.3.1 --skip-ci --skip-context-switch --commit"
        ]
    );
}
