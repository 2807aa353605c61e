//! Action configuration, built once from the command line and read-only afterwards

use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_ALLOWED_ENVIRONMENTS: &str = "develop";
pub const DEFAULT_RMK_VERSION: &str = "latest";
pub const DEFAULT_RMK_DOWNLOAD_URL: &str =
    "https://edenlabllc-rmk.s3.eu-north-1.amazonaws.com/rmk/s3-installer";
pub const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 10800;

/// Cloud provider hosting the cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClusterProvider {
    Aws,
    Azure,
    Gcp,
}

impl ClusterProvider {
    /// Case-insensitive lookup; `None` for providers the action does not know
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "aws" => Some(ClusterProvider::Aws),
            "azure" => Some(ClusterProvider::Azure),
            "gcp" => Some(ClusterProvider::Gcp),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClusterProvider::Aws => "aws",
            ClusterProvider::Azure => "azure",
            ClusterProvider::Gcp => "gcp",
        }
    }

    /// Cluster API controller managing this provider's infrastructure
    pub fn controller(&self) -> &'static str {
        match self {
            ClusterProvider::Aws => "capa",
            ClusterProvider::Azure => "capz",
            ClusterProvider::Gcp => "capg",
        }
    }
}

impl fmt::Display for ClusterProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Slack delivery settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlackSettings {
    pub enabled: bool,
    pub channel: String,
    pub webhook: String,
    /// One entry per non-empty line of the message-details input
    pub message_details: Vec<String>,
}

/// Parameters for `release_update`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseParams {
    pub repository: String,
    pub version: String,
    pub skip_deploy: bool,
}

/// Parameters for `project_update`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyParams {
    pub name: String,
    pub version: String,
}

/// Complete, immutable action configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionConfig {
    pub allowed_environments: String,
    pub cluster_provider_credentials: String,
    pub github_token: String,
    pub github_custom_ref: String,
    pub github_custom_ref_name: String,
    pub cluster_provider: String,
    pub command: String,
    pub rmk_download_url: String,
    pub rmk_version: String,
    pub dependency: DependencyParams,
    pub release: ReleaseParams,
    pub slack: SlackSettings,
    pub sync_labels: Vec<String>,
    pub command_timeout_secs: u64,
}

impl Default for ActionConfig {
    fn default() -> Self {
        Self {
            allowed_environments: DEFAULT_ALLOWED_ENVIRONMENTS.to_string(),
            cluster_provider_credentials: String::new(),
            github_token: String::new(),
            github_custom_ref: String::new(),
            github_custom_ref_name: String::new(),
            cluster_provider: String::new(),
            command: String::new(),
            rmk_download_url: DEFAULT_RMK_DOWNLOAD_URL.to_string(),
            rmk_version: DEFAULT_RMK_VERSION.to_string(),
            dependency: DependencyParams::default(),
            release: ReleaseParams::default(),
            slack: SlackSettings::default(),
            sync_labels: Vec::new(),
            command_timeout_secs: DEFAULT_COMMAND_TIMEOUT_SECS,
        }
    }
}

/// Interpret an action input as a boolean flag (`"true"` only)
pub fn parse_flag(value: &str) -> bool {
    value == "true"
}

/// Split the message-details input into non-empty lines
pub fn parse_message_details(value: &str) -> Vec<String> {
    value
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Split whitespace-separated sync labels
pub fn parse_sync_labels(value: &str) -> Vec<String> {
    value.split_whitespace().map(str::to_string).collect()
}
