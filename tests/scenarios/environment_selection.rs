//! Test: branch to environment selection feeding a dispatch

use crate::helpers::*;
use rmk_action::core::config::parse_sync_labels;
use rmk_action::core::error::ActionError;
use rmk_action::core::{AllowList, Environment, EnvironmentClassifier, ExecutionContext};
use rmk_action::github::GitHubContext;

fn github(event: &str, ref_name: &str, head_ref: &str) -> GitHubContext {
    GitHubContext {
        event_name: event.to_string(),
        ref_name: ref_name.to_string(),
        head_ref: head_ref.to_string(),
        repository: "org/project.infra".to_string(),
        ..GitHubContext::default()
    }
}

#[tokio::test]
async fn test_feature_branch_syncs_develop() {
    let github = github("push", "feature/abc-123", "");
    let bootstrap = RecordingRunner::new();

    let branch = github.classification_branch(&bootstrap).await.unwrap();
    let environment = EnvironmentClassifier::extended()
        .select_environment(&branch)
        .unwrap();
    assert_eq!(environment, Environment::Develop);
    AllowList::parse("develop,staging")
        .validate(environment.as_str())
        .unwrap();
    assert!(bootstrap.calls().is_empty());

    let mut config = config("release_sync");
    config.sync_labels = parse_sync_labels("a b");
    let ctx = ExecutionContext::from_config(&config, environment, branch, "acme").unwrap();

    let harness = Harness::new(RecordingRunner::new());
    harness.dispatcher.execute(&ctx).await.unwrap();

    assert_eq!(
        harness.runner.calls(),
        vec!["rmk release sync --selector a --selector b"]
    );
    let written = harness.output.written();
    assert_eq!(written[0]["environment"], "develop");
    assert_eq!(written[0]["branch"], "feature/abc-123");
}

#[tokio::test]
async fn test_pull_request_uses_working_branch() {
    let github = github("pull_request", "42/merge", "feature/ignored-1");
    let bootstrap = RecordingRunner::new().with_output("rev-parse", "release/v1.4.0-rc");

    let branch = github.classification_branch(&bootstrap).await.unwrap();
    assert_eq!(branch, "release/v1.4.0-rc");
    assert_eq!(
        EnvironmentClassifier::extended()
            .select_environment(&branch)
            .unwrap(),
        Environment::Staging
    );
}

#[tokio::test]
async fn test_detached_pull_request_falls_back_to_head_ref() {
    let github = github("pull_request_target", "42/merge", "hotfix/fhir-7");
    let bootstrap = RecordingRunner::new().with_output("rev-parse", "HEAD");

    let branch = github.classification_branch(&bootstrap).await.unwrap();
    assert_eq!(branch, "hotfix/fhir-7");
    assert_eq!(
        EnvironmentClassifier::extended()
            .select_environment(&branch)
            .unwrap(),
        Environment::Production
    );
}

#[test]
fn test_selected_environment_must_be_allowed() {
    let environment = EnvironmentClassifier::extended()
        .select_environment("release/v2.0.0")
        .unwrap();
    assert_eq!(environment, Environment::Production);

    let err = AllowList::parse("develop,staging")
        .validate(environment.as_str())
        .unwrap_err();
    assert!(matches!(err, ActionError::EnvironmentNotAllowed(ref env) if env == "production"));
}

#[test]
fn test_unclassifiable_branch() {
    let err = EnvironmentClassifier::extended()
        .select_environment("main")
        .unwrap_err();
    assert!(matches!(err, ActionError::InvalidBranch(_)));
}
