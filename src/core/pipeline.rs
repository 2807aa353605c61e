//! Pipeline definitions - the ordered rmk invocations behind each operation

use crate::core::{
    context::ExecutionContext,
    error::{ActionError, Result},
    operation::Operation,
    step::{release_sync_command, Step},
};

/// Commit-message marker that skips `destroy`
pub const SKIP_DESTROY_MARKER: &str = "[skip cluster destroy]";

/// A pipeline definition for one operation
#[derive(Debug, Clone)]
pub struct Pipeline {
    pub operation: Operation,

    /// Steps in execution order
    pub steps: Vec<Step>,

    /// Message sent with a `Success` notification, for operations that notify
    pub success_message: Option<&'static str>,
}

impl Pipeline {
    /// Build the pipeline for the context's operation
    ///
    /// Required parameters are checked here, so a missing one fails before any
    /// step can run.
    pub fn for_context(ctx: &ExecutionContext) -> Result<Self> {
        let operation = ctx.operation;
        let (steps, success_message) = match operation {
            Operation::Destroy => (
                vec![
                    Step::new("release-list", "rmk release list"),
                    Step::new("release-destroy", "rmk release destroy"),
                    Step::new("cluster-create", "rmk cluster capi create"),
                    Step::new("cluster-provision", "rmk cluster capi provision"),
                    Step::new("cluster-destroy", "rmk cluster capi destroy"),
                    Step::new("cluster-delete", "rmk cluster capi delete"),
                ],
                Some("Cluster has been destroyed"),
            ),
            Operation::Provision => (
                vec![
                    Step::new("cluster-create", "rmk cluster capi create").with_diagnostics(),
                    Step::new("cluster-provision", "rmk cluster capi provision")
                        .with_diagnostics(),
                    Step::new(
                        "release-sync",
                        release_sync_command(&ctx.params.sync_labels),
                    ),
                ],
                Some("Cluster has been provisioned"),
            ),
            Operation::ReleaseSync => (
                vec![Step::new(
                    "release-sync",
                    release_sync_command(&ctx.params.sync_labels),
                )],
                None,
            ),
            Operation::ReleaseUpdate => {
                let release = &ctx.params.release;
                if release.repository.is_empty() || release.version.is_empty() {
                    return Err(ActionError::MissingParameter(
                        "release name or version is not configured for release update".to_string(),
                    ));
                }

                let deploy_flags = if release.skip_deploy {
                    "--skip-context-switch --commit"
                } else {
                    "--deploy"
                };
                (
                    vec![Step::new(
                        "release-update",
                        format!(
                            "rmk release update --repository {} --tag {} --skip-ci {}",
                            release.repository, release.version, deploy_flags
                        ),
                    )],
                    None,
                )
            }
            Operation::ProjectUpdate => {
                let dependency = &ctx.params.dependency;
                if dependency.name.is_empty() || dependency.version.is_empty() {
                    return Err(ActionError::MissingParameter(
                        "dependency name or version is not configured for project update"
                            .to_string(),
                    ));
                }

                (
                    vec![Step::new(
                        "project-update",
                        format!(
                            "rmk project update --dependency {} --version {}",
                            dependency.name, dependency.version
                        ),
                    )],
                    None,
                )
            }
            Operation::HelmfileValidate => (
                vec![
                    Step::new(
                        "release-build",
                        "rmk release build --skip-context-switch 1> /dev/null",
                    ),
                    Step::new(
                        "release-template",
                        "rmk release template --skip-context-switch --helmfile-args=\"--quiet\" --helmfile-args=\"--log-level=error\"",
                    ),
                ],
                None,
            ),
        };

        Ok(Pipeline {
            operation,
            steps,
            success_message,
        })
    }

    /// Reason to skip the whole pipeline, if its guard fires
    pub fn skip_reason(&self, ctx: &ExecutionContext) -> Option<String> {
        if self.operation != Operation::Destroy {
            return None;
        }

        let message = ctx.commit_message.as_deref()?;
        if message.to_lowercase().contains(SKIP_DESTROY_MARKER) {
            Some(format!(
                "Cluster destroy skipped: commit message contains '{}'",
                SKIP_DESTROY_MARKER
            ))
        } else {
            None
        }
    }

    /// Step IDs in execution order
    pub fn step_ids(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.id.as_str()).collect()
    }
}
