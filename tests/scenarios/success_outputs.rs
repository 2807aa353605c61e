//! Test: outputs and notifications on successful runs

use crate::helpers::*;
use rmk_action::core::config::{DependencyParams, ReleaseParams};
use rmk_action::core::DispatchState;
use rmk_action::notify::NotificationStatus;

#[tokio::test]
async fn test_release_update_publishes_outputs() {
    let mut config = config("release_update");
    config.release = ReleaseParams {
        repository: "org/app".to_string(),
        version: "v2.3.1".to_string(),
        skip_deploy: false,
    };

    let harness = Harness::new(RecordingRunner::new());
    let report = harness.dispatcher.execute(&context(&config)).await.unwrap();

    assert_eq!(report.state, DispatchState::Succeeded);
    assert_eq!(
        harness.runner.calls(),
        vec!["rmk release update --repository org/app --tag v2.3.1 --skip-ci --deploy"]
    );

    let written = harness.output.written();
    assert_eq!(written.len(), 1);
    assert_eq!(written[0]["environment"], "develop");
    assert_eq!(written[0]["branch"], "develop");
    assert_eq!(written[0]["release_repository"], "org/app");
    assert_eq!(written[0]["release_version"], "v2.3.1");

    // release_update does not notify
    assert!(harness.notifier.sent().is_empty());
}

#[tokio::test]
async fn test_project_update_publishes_dependency() {
    let mut config = config("project_update");
    config.dependency = DependencyParams {
        name: "deps".to_string(),
        version: "v0.9.0".to_string(),
    };

    let harness = Harness::new(RecordingRunner::new());
    harness.dispatcher.execute(&context(&config)).await.unwrap();

    assert_eq!(
        harness.runner.calls(),
        vec!["rmk project update --dependency deps --version v0.9.0"]
    );
    let written = harness.output.written();
    assert_eq!(written[0]["dependency_name"], "deps");
    assert_eq!(written[0]["dependency_version"], "v0.9.0");
}

#[tokio::test]
async fn test_provision_success_notifies() {
    let mut config = config("provision");
    config.sync_labels = vec!["app=core".to_string()];

    let harness = Harness::new(RecordingRunner::new());
    let report = harness.dispatcher.execute(&context(&config)).await.unwrap();

    assert_eq!(report.completed_steps(), 3);
    assert_eq!(
        harness.runner.calls(),
        vec![
            "rmk cluster capi create",
            "rmk cluster capi provision",
            "rmk release sync --selector app=core",
        ]
    );

    let sent = harness.notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].status, NotificationStatus::Success);
    assert_eq!(sent[0].message, "Cluster has been provisioned");
}

#[tokio::test]
async fn test_outputs_not_written_after_failure() {
    let harness = Harness::new(RecordingRunner::new().failing_on("release template"));

    let result = harness
        .dispatcher
        .execute(&context(&config("helmfile_validate")))
        .await;

    assert!(result.is_err());
    assert_eq!(harness.runner.calls().len(), 2);
    assert!(harness.output.written().is_empty());
}
