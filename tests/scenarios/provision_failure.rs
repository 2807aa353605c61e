//! Test: provisioning failures carry deduplicated controller diagnostics

use crate::helpers::*;
use rmk_action::core::error::ActionError;
use rmk_action::notify::NotificationStatus;

const CONTROLLER_LOG: &str = "I0312 10:00:00.000001 1 controller.go:10] starting
E0312 10:22:33.123456 1 controller.go:329] Reconciler error reconcileID=\"a1b2\"
\tfailed to create VPC: request id: 0f1e-aa22
E0312 10:22:35.654321 1 controller.go:329] Reconciler error reconcileID=\"ff00\"
\tfailed to create VPC: request id: 9999-bbbb
";

#[tokio::test]
async fn test_failure_report_includes_diagnostics() {
    let runner = RecordingRunner::new()
        .failing_on("capi provision")
        .with_output("kubectl logs", CONTROLLER_LOG)
        .with_output("kubectl get cluster-api", "NAMESPACE NAME PHASE\ndevelop acme Failed");
    let harness = Harness::new(runner);

    let err = harness
        .dispatcher
        .execute(&context(&config("provision")))
        .await
        .unwrap_err();

    assert!(matches!(err, ActionError::ExternalCommand { code: 1, .. }));
    assert_eq!(
        rmk_calls(&harness.runner),
        vec!["rmk cluster capi create", "rmk cluster capi provision"]
    );
    assert!(harness
        .runner
        .calls()
        .contains(&"kubectl logs --namespace capa-system deployment/capa-controller-manager".to_string()));

    let sent = harness.notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].status, NotificationStatus::Failure);
    assert!(sent[0].message.starts_with(&err.to_string()));
    assert!(sent[0].message.contains("Occurrences: 2"));
    assert!(sent[0].message.contains("develop acme Failed"));
}

#[tokio::test]
async fn test_failure_reported_without_diagnostics() {
    let runner = RecordingRunner::new()
        .failing_on("capi create")
        .failing_on("kubectl");
    let harness = Harness::new(runner);

    let err = harness
        .dispatcher
        .execute(&context(&config("provision")))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ActionError::ExternalCommand { ref command, .. } if command == "rmk cluster capi create"
    ));

    let sent = harness.notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].message, err.to_string());
}

#[tokio::test]
async fn test_release_sync_failure_skips_diagnostics() {
    let harness = Harness::new(RecordingRunner::new().failing_on("release sync"));

    let report = harness
        .dispatcher
        .execute(&context(&config("provision")))
        .await;

    assert!(report.is_err());
    assert!(harness.runner.calls().iter().all(|c| !c.starts_with("kubectl")));
    assert_eq!(harness.notifier.sent()[0].status, NotificationStatus::Failure);
}

#[tokio::test]
async fn test_non_notifying_failure_is_silent() {
    let harness = Harness::new(RecordingRunner::new().failing_on("release build"));

    let err = harness
        .dispatcher
        .execute(&context(&config("helmfile_validate")))
        .await
        .unwrap_err();

    assert!(err.is_command_failure());
    assert!(harness.notifier.sent().is_empty());
    assert!(harness.output.written().is_empty());
    assert_eq!(harness.runner.calls().len(), 1);
}

#[tokio::test]
async fn test_unknown_provider_skips_diagnostics() {
    let mut config = config("provision");
    config.cluster_provider = "onprem".to_string();
    let harness = Harness::new(RecordingRunner::new().failing_on("capi create"));

    let err = harness
        .dispatcher
        .execute(&context(&config))
        .await
        .unwrap_err();

    assert_eq!(harness.runner.calls(), vec!["rmk cluster capi create"]);

    let sent = harness.notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].status, NotificationStatus::Failure);
    assert_eq!(sent[0].message, err.to_string());
}
