//! Minimal GitHub REST client for resolving the current job URL

use crate::core::error::{ActionError, Result};
use crate::github::GitHubContext;
use reqwest::Client;
use serde::Deserialize;

const USER_AGENT: &str = concat!("rmk-action/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct JobList {
    #[serde(default)]
    jobs: Vec<Job>,
}

#[derive(Debug, Deserialize)]
struct Job {
    id: u64,
    #[serde(default)]
    html_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GitHubApi {
    client: Client,
    token: String,
}

impl GitHubApi {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            token: token.into(),
        }
    }

    /// Web URL of the first job of the current run attempt, if any
    pub async fn action_job_url(&self, ctx: &GitHubContext) -> Result<Option<String>> {
        let api_error = |e: reqwest::Error| {
            ActionError::Notification(format!("accessing GitHub API: {}", e))
        };

        let list: JobList = self
            .client
            .get(ctx.action_job_api_url())
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await
            .map_err(api_error)?
            .error_for_status()
            .map_err(api_error)?
            .json()
            .await
            .map_err(api_error)?;

        Ok(list
            .jobs
            .into_iter()
            .next()
            .map(|job| job.html_url.unwrap_or_else(|| ctx.job_url(job.id))))
    }
}
