//! Test: the commit-message guard on cluster destroy

use crate::helpers::*;
use rmk_action::core::DispatchState;
use rmk_action::notify::NotificationStatus;

#[tokio::test]
async fn test_skip_marker_prevents_destroy() {
    let ctx = context(&config("destroy"))
        .with_commit_message("Tear down later [SKIP CLUSTER DESTROY]\n");

    let harness = Harness::new(RecordingRunner::new());
    let report = harness.dispatcher.execute(&ctx).await.unwrap();

    assert!(matches!(report.state, DispatchState::Skipped { .. }));
    assert!(harness.runner.calls().is_empty());
    assert!(harness.output.written().is_empty());

    let sent = harness.notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].status, NotificationStatus::Skip);
    assert_eq!(sent[0].tenant, "acme");
    assert_eq!(sent[0].extra["Environment"], "develop");
}

#[tokio::test]
async fn test_destroy_runs_full_teardown() {
    let ctx = context(&config("destroy")).with_commit_message("Regular change");

    let harness = Harness::new(RecordingRunner::new());
    let report = harness.dispatcher.execute(&ctx).await.unwrap();

    assert_eq!(report.state, DispatchState::Succeeded);
    assert_eq!(
        harness.runner.calls(),
        vec![
            "rmk release list",
            "rmk release destroy",
            "rmk cluster capi create",
            "rmk cluster capi provision",
            "rmk cluster capi destroy",
            "rmk cluster capi delete",
        ]
    );

    let sent = harness.notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].status, NotificationStatus::Success);
    assert_eq!(sent[0].message, "Cluster has been destroyed");
}

#[tokio::test]
async fn test_marker_ignored_for_other_operations() {
    let ctx = context(&config("release_sync")).with_commit_message("[skip cluster destroy]");

    let harness = Harness::new(RecordingRunner::new());
    let report = harness.dispatcher.execute(&ctx).await.unwrap();

    assert_eq!(report.state, DispatchState::Succeeded);
    assert_eq!(harness.runner.calls(), vec!["rmk release sync"]);
}
