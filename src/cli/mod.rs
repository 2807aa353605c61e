//! Command-line interface
//!
//! Every option falls back to the GitHub Action input variable of the same name
//! (`INPUT_<NAME>`), so the binary runs unchanged as an action entrypoint.

pub mod output;

use crate::core::config::{
    self, ActionConfig, DependencyParams, ReleaseParams, SlackSettings,
};
use clap::Parser;
use std::ffi::OsString;

/// Select the deployment environment from the branch and run an rmk operation
#[derive(Debug, Parser, Clone)]
#[command(name = "rmk-action")]
#[command(version)]
#[command(about = "GitHub Action driving rmk cluster operations", long_about = None)]
pub struct Cli {
    /// Comma-separated environments this workflow may deploy to
    #[arg(long, env = "INPUT_ALLOWED_ENVIRONMENTS", default_value = config::DEFAULT_ALLOWED_ENVIRONMENTS)]
    pub allowed_environments: String,

    /// JSON credentials keyed by environment and cluster provider
    #[arg(long, env = "INPUT_CLUSTER_PROVIDER_CREDENTIALS", default_value = "", hide_env_values = true)]
    pub cluster_provider_credentials: String,

    /// Override for GITHUB_REF
    #[arg(long, env = "INPUT_GITHUB_CUSTOM_REF", default_value = "")]
    pub github_custom_ref: String,

    /// Override for GITHUB_REF_NAME
    #[arg(long, env = "INPUT_GITHUB_CUSTOM_REF_NAME", default_value = "")]
    pub github_custom_ref_name: String,

    /// GitHub token with full repository access
    #[arg(long, env = "INPUT_GITHUB_TOKEN_REPO_FULL_ACCESS", default_value = "", hide_env_values = true)]
    pub github_token: String,

    /// Cluster provider: aws, azure or gcp
    #[arg(long, env = "INPUT_RMK_CLUSTER_PROVIDER", default_value = "")]
    pub rmk_cluster_provider: String,

    /// Operation to run
    #[arg(long, env = "INPUT_RMK_COMMAND", default_value = "")]
    pub rmk_command: String,

    /// rmk installer script URL
    #[arg(long, env = "INPUT_RMK_DOWNLOAD_URL", default_value = config::DEFAULT_RMK_DOWNLOAD_URL)]
    pub rmk_download_url: String,

    #[arg(long, env = "INPUT_RMK_PROJECT_DEPENDENCY_NAME", default_value = "")]
    pub rmk_project_dependency_name: String,

    #[arg(long, env = "INPUT_RMK_PROJECT_DEPENDENCY_VERSION", default_value = "")]
    pub rmk_project_dependency_version: String,

    #[arg(long, env = "INPUT_RMK_RELEASE_REPOSITORY_FULL_NAME", default_value = "")]
    pub rmk_release_repository_full_name: String,

    #[arg(long, env = "INPUT_RMK_RELEASE_VERSION", default_value = "")]
    pub rmk_release_version: String,

    #[arg(long, env = "INPUT_RMK_SLACK_CHANNEL", default_value = "")]
    pub rmk_slack_channel: String,

    /// Extra Slack message lines, one per line
    #[arg(long, env = "INPUT_RMK_SLACK_MESSAGE_DETAILS", default_value = "")]
    pub rmk_slack_message_details: String,

    /// "true" to enable Slack notifications
    #[arg(long, env = "INPUT_RMK_SLACK_NOTIFICATIONS", default_value = "")]
    pub rmk_slack_notifications: String,

    #[arg(long, env = "INPUT_RMK_SLACK_WEBHOOK", default_value = "", hide_env_values = true)]
    pub rmk_slack_webhook: String,

    /// Whitespace-separated release label selectors
    #[arg(long, env = "INPUT_RMK_SYNC_LABELS", default_value = "")]
    pub rmk_sync_labels: String,

    /// "true" to commit the release update without deploying
    #[arg(long, env = "INPUT_RMK_UPDATE_SKIP_DEPLOY", default_value = "")]
    pub rmk_update_skip_deploy: String,

    /// rmk version to install
    #[arg(long, env = "INPUT_RMK_VERSION", default_value = config::DEFAULT_RMK_VERSION)]
    pub rmk_version: String,

    /// Timeout for each external command, in seconds
    #[arg(long, env = "INPUT_RMK_COMMAND_TIMEOUT", default_value_t = config::DEFAULT_COMMAND_TIMEOUT_SECS)]
    pub rmk_command_timeout: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }

    /// Freeze the arguments into the action configuration
    pub fn to_config(&self) -> ActionConfig {
        ActionConfig {
            allowed_environments: self.allowed_environments.clone(),
            cluster_provider_credentials: self.cluster_provider_credentials.clone(),
            github_token: self.github_token.clone(),
            github_custom_ref: self.github_custom_ref.clone(),
            github_custom_ref_name: self.github_custom_ref_name.clone(),
            cluster_provider: self.rmk_cluster_provider.clone(),
            command: self.rmk_command.clone(),
            rmk_download_url: self.rmk_download_url.clone(),
            rmk_version: self.rmk_version.clone(),
            dependency: DependencyParams {
                name: self.rmk_project_dependency_name.clone(),
                version: self.rmk_project_dependency_version.clone(),
            },
            release: ReleaseParams {
                repository: self.rmk_release_repository_full_name.clone(),
                version: self.rmk_release_version.clone(),
                skip_deploy: config::parse_flag(&self.rmk_update_skip_deploy),
            },
            slack: SlackSettings {
                enabled: config::parse_flag(&self.rmk_slack_notifications),
                channel: self.rmk_slack_channel.clone(),
                webhook: self.rmk_slack_webhook.clone(),
                message_details: config::parse_message_details(&self.rmk_slack_message_details),
            },
            sync_labels: config::parse_sync_labels(&self.rmk_sync_labels),
            command_timeout_secs: self.rmk_command_timeout,
        }
    }
}
