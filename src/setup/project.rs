//! Project repository and rmk configuration

use crate::core::config::{ActionConfig, SlackSettings};
use crate::core::error::Result;
use crate::execution::CommandRunner;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{info, warn};

pub const GIT_USER_NAME: &str = "github-actions";
pub const GIT_USER_EMAIL: &str = "github-actions@github.com";

pub const TENANT_COMMAND: &str = "rmk --log-format=json config view";
pub const COMMIT_MESSAGE_COMMAND: &str = "git log -1 --pretty=%B";

#[derive(Debug, Deserialize)]
struct RmkConfigView {
    config: RmkConfig,
}

#[derive(Debug, Deserialize)]
struct RmkConfig {
    #[serde(rename = "Tenant")]
    tenant: String,
}

/// Environment rmk needs for GitHub and Slack access
pub fn rmk_env(github_token: &str, slack: &SlackSettings) -> BTreeMap<String, String> {
    let mut envs = BTreeMap::new();
    envs.insert("RMK_GITHUB_TOKEN".to_string(), github_token.to_string());
    if slack.enabled {
        envs.insert("RMK_SLACK_WEBHOOK".to_string(), slack.webhook.clone());
        envs.insert("RMK_SLACK_CHANNEL".to_string(), slack.channel.clone());
    }
    envs
}

/// `rmk config init` command line for the configured provider and Slack settings
pub fn config_init_command(cluster_provider: &str, slack: &SlackSettings) -> String {
    let mut command = format!(
        "rmk config init --cluster-provider={} --progress-bar=false",
        cluster_provider
    );

    if slack.enabled {
        command.push_str(" --slack-notifications");
        for detail in &slack.message_details {
            command.push_str(&format!(" --slack-message-details=\"{}\"", detail));
        }
    }
    command
}

/// Prepares the checked-out project for rmk commands
pub struct ProjectInitializer<'a> {
    runner: &'a dyn CommandRunner,
}

impl<'a> ProjectInitializer<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self { runner }
    }

    /// Set the git identity used for commits made by rmk
    pub async fn configure_git(&self) -> Result<()> {
        info!("Initialize project repository.");
        for (key, value) in [("user.name", GIT_USER_NAME), ("user.email", GIT_USER_EMAIL)] {
            self.runner
                .run(&format!("git config {} \"{}\"", key, value), false)
                .await?;
        }
        Ok(())
    }

    pub async fn configure_rmk(&self, config: &ActionConfig) -> Result<()> {
        let command = config_init_command(&config.cluster_provider, &config.slack);
        self.runner.run(&command, false).await?;
        Ok(())
    }

    /// Tenant from `rmk config view`
    pub async fn tenant(&self) -> Result<String> {
        let output = self
            .runner
            .run(TENANT_COMMAND, true)
            .await?
            .unwrap_or_default();
        parse_tenant(&output)
    }

    /// Message of the checked-out commit, if git can report it
    pub async fn latest_commit_message(&self) -> Option<String> {
        match self.runner.run(COMMIT_MESSAGE_COMMAND, true).await {
            Ok(message) => message,
            Err(e) => {
                warn!("Could not read latest commit message: {}", e);
                None
            }
        }
    }
}

/// Extract `config.Tenant` from `rmk config view` JSON
pub fn parse_tenant(output: &str) -> Result<String> {
    let view: RmkConfigView = serde_json::from_str(output)?;
    Ok(view.config.tenant)
}
