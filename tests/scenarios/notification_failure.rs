//! Test: notification delivery errors never change the run outcome

use crate::helpers::*;
use rmk_action::core::error::ActionError;
use rmk_action::core::DispatchState;
use rmk_action::notify::NotificationStatus;

#[tokio::test]
async fn test_step_error_survives_failed_notification() {
    let harness = Harness::with_notifier(
        RecordingRunner::new().failing_on("release destroy"),
        RecordingNotifier::failing(),
    );

    let err = harness
        .dispatcher
        .execute(&context(&config("destroy")))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ActionError::ExternalCommand { ref command, code: 1 } if command == "rmk release destroy"
    ));
    let sent = harness.notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].status, NotificationStatus::Failure);
    assert!(harness.output.written().is_empty());
}

#[tokio::test]
async fn test_success_survives_failed_notification() {
    let harness = Harness::with_notifier(RecordingRunner::new(), RecordingNotifier::failing());

    let report = harness
        .dispatcher
        .execute(&context(&config("provision")))
        .await
        .unwrap();

    assert_eq!(report.state, DispatchState::Succeeded);
    assert_eq!(report.completed_steps(), 3);
    assert_eq!(harness.notifier.sent()[0].status, NotificationStatus::Success);

    let written = harness.output.written();
    assert_eq!(written.len(), 1);
    assert_eq!(written[0]["environment"], "develop");
}

#[tokio::test]
async fn test_skip_survives_failed_notification() {
    let harness = Harness::with_notifier(RecordingRunner::new(), RecordingNotifier::failing());
    let ctx = context(&config("destroy")).with_commit_message("[skip cluster destroy]");

    let report = harness.dispatcher.execute(&ctx).await.unwrap();

    assert!(matches!(report.state, DispatchState::Skipped { .. }));
    assert!(harness.runner.calls().is_empty());
}
