//! GitHub Actions run context, read from the `GITHUB_*` environment

use crate::core::error::{ActionError, Result};
use crate::execution::CommandRunner;
use serde::{Deserialize, Serialize};
use tracing::debug;

const REQUIRED_VARS: [&str; 15] = [
    "GITHUB_ACTOR",
    "GITHUB_API_URL",
    "GITHUB_BASE_REF",
    "GITHUB_EVENT_NAME",
    "GITHUB_HEAD_REF",
    "GITHUB_REF",
    "GITHUB_REF_NAME",
    "GITHUB_REF_TYPE",
    "GITHUB_REPOSITORY",
    "GITHUB_REPOSITORY_OWNER",
    "GITHUB_RUN_ATTEMPT",
    "GITHUB_RUN_ID",
    "GITHUB_RUN_NUMBER",
    "GITHUB_SERVER_URL",
    "GITHUB_SHA",
];

/// Command printing the checked-out branch
pub const CURRENT_BRANCH_COMMAND: &str = "git rev-parse --abbrev-ref HEAD";

/// Workflow run metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubContext {
    pub actor: String,
    pub api_url: String,
    pub base_ref: String,
    pub event_name: String,
    pub head_ref: String,
    pub r#ref: String,
    pub ref_name: String,
    pub ref_type: String,
    pub repository: String,
    pub repository_owner: String,
    pub run_attempt: String,
    pub run_id: String,
    pub run_number: String,
    pub server_url: String,
    pub sha: String,
}

impl GitHubContext {
    /// Read the context from the process environment
    ///
    /// Non-empty `custom_ref` / `custom_ref_name` replace `GITHUB_REF` / `GITHUB_REF_NAME`.
    pub fn from_env(custom_ref: &str, custom_ref_name: &str) -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok(), custom_ref, custom_ref_name)
    }

    /// Read the context through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F, custom_ref: &str, custom_ref_name: &str) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let missing: Vec<&str> = REQUIRED_VARS
            .iter()
            .copied()
            .filter(|key| lookup(key).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(ActionError::GitHubContext(format!(
                "missing required environment variables: {}",
                missing.join(", ")
            )));
        }

        let get = |key: &str| lookup(key).unwrap_or_default();
        let or_custom = |custom: &str, key: &str| {
            if custom.is_empty() {
                get(key)
            } else {
                custom.to_string()
            }
        };

        Ok(Self {
            actor: get("GITHUB_ACTOR"),
            api_url: get("GITHUB_API_URL"),
            base_ref: get("GITHUB_BASE_REF"),
            event_name: get("GITHUB_EVENT_NAME"),
            head_ref: get("GITHUB_HEAD_REF"),
            r#ref: or_custom(custom_ref, "GITHUB_REF"),
            ref_name: or_custom(custom_ref_name, "GITHUB_REF_NAME"),
            ref_type: get("GITHUB_REF_TYPE"),
            repository: get("GITHUB_REPOSITORY"),
            repository_owner: get("GITHUB_REPOSITORY_OWNER"),
            run_attempt: get("GITHUB_RUN_ATTEMPT"),
            run_id: get("GITHUB_RUN_ID"),
            run_number: get("GITHUB_RUN_NUMBER"),
            server_url: get("GITHUB_SERVER_URL"),
            sha: get("GITHUB_SHA"),
        })
    }

    /// Pull-request events report a synthetic merge ref
    pub fn is_pull_request(&self) -> bool {
        matches!(
            self.event_name.as_str(),
            "pull_request" | "pull_request_target"
        )
    }

    pub fn is_workflow_dispatch(&self) -> bool {
        self.event_name == "workflow_dispatch"
    }

    /// Whether the repository follows the `owner/repo` format
    pub fn validate_repository_format(&self) -> bool {
        let mut parts = self.repository.split('/');
        matches!(
            (parts.next(), parts.next(), parts.next()),
            (Some(owner), Some(repo), None) if !owner.is_empty() && !repo.is_empty()
        )
    }

    /// Repository name without the owner
    pub fn repository_name(&self) -> Option<&str> {
        if self.validate_repository_format() {
            self.repository.split('/').nth(1)
        } else {
            None
        }
    }

    /// Web URL of the repository
    pub fn github_url(&self) -> String {
        format!("{}/{}", self.server_url, self.repository)
    }

    /// REST endpoint listing the jobs of the current run attempt
    pub fn action_job_api_url(&self) -> String {
        format!(
            "{}/repos/{}/actions/runs/{}/attempts/{}/jobs",
            self.api_url.trim_end_matches('/'),
            self.repository,
            self.run_id,
            self.run_attempt
        )
    }

    /// Web URL of a job in the current run
    pub fn job_url(&self, job_id: u64) -> String {
        format!(
            "{}/actions/runs/{}/job/{}",
            self.github_url(),
            self.run_id,
            job_id
        )
    }

    /// One-line summary for debug traces
    pub fn summary(&self) -> String {
        format!(
            "actor: {} | event_name: {} | ref: {} | ref_name: {} | repository: {} | run_id: {} | sha: {}",
            self.actor, self.event_name, self.r#ref, self.ref_name, self.repository, self.run_id, self.sha
        )
    }

    /// Branch name used for environment selection
    ///
    /// Pull-request runs use the checked-out working branch; a detached checkout
    /// falls back to the event's head ref.
    pub async fn classification_branch(&self, runner: &dyn CommandRunner) -> Result<String> {
        if !self.is_pull_request() {
            return Ok(self.ref_name.clone());
        }

        let current = runner
            .run(CURRENT_BRANCH_COMMAND, true)
            .await?
            .unwrap_or_default();
        debug!("Working branch for pull request: {}", current);

        if current.is_empty() || current == "HEAD" {
            Ok(self.head_ref.clone())
        } else {
            Ok(current)
        }
    }
}
