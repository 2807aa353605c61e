//! Slack incoming-webhook notifier

use crate::core::error::{ActionError, Result};
use crate::github::{GitHubApi, GitHubContext};
use crate::notify::{Notification, NotificationStatus, Notifier};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::info;

const USERNAME: &str = "GitLabFlow Action";

/// Reported as the actor for runs not started by hand
const AUTOMATION_ACTOR: &str = "ci-cd-fhir-user";

fn icon_url(status: NotificationStatus) -> &'static str {
    match status {
        NotificationStatus::Success => "https://img.icons8.com/doodle/48/000000/add.png",
        NotificationStatus::Failure => "https://img.icons8.com/office/40/000000/minus.png",
        NotificationStatus::Skip => "https://img.icons8.com/ios-filled/50/000000/0-degrees.png",
    }
}

/// Webhook request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlackPayload {
    pub username: String,
    pub icon_url: String,
    pub text: String,
}

pub struct SlackNotifier {
    client: Client,
    webhook: String,
    github: GitHubApi,
    context: GitHubContext,
}

impl SlackNotifier {
    /// Both the GitHub token and the webhook must be non-blank
    pub fn new(context: GitHubContext, github_token: &str, webhook: &str) -> Result<Self> {
        if github_token.trim().is_empty() {
            return Err(ActionError::Notification(
                "GitHub token is missing or empty".to_string(),
            ));
        }
        if webhook.trim().is_empty() {
            return Err(ActionError::Notification(
                "Slack webhook is missing or empty".to_string(),
            ));
        }

        Ok(Self {
            client: Client::new(),
            webhook: webhook.to_string(),
            github: GitHubApi::new(github_token),
            context,
        })
    }

    /// Build the webhook payload for a notification
    pub fn payload(
        context: &GitHubContext,
        notification: &Notification,
        job_url: Option<&str>,
    ) -> SlackPayload {
        let run_by = if context.is_workflow_dispatch() {
            context.actor.as_str()
        } else {
            AUTOMATION_ACTOR
        };

        let mut text = format!(
            "*Action run by*: {}\n*Action job URL*: {}\n*Tenant*: {}\n*Branch*: {}\n*Status*: {}\n*Message*: {}\n",
            run_by,
            job_url.unwrap_or("unavailable"),
            notification.tenant,
            context.ref_name,
            notification.status,
            notification.message
        );
        for (key, value) in &notification.extra {
            text.push_str(&format!("*{}*: {}\n", key, value));
        }

        SlackPayload {
            username: USERNAME.to_string(),
            icon_url: icon_url(notification.status).to_string(),
            text,
        }
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    async fn notify(&self, notification: &Notification) -> Result<u16> {
        let job_url = self.github.action_job_url(&self.context).await?;
        let payload = Self::payload(&self.context, notification, job_url.as_deref());

        let response = self
            .client
            .post(&self.webhook)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ActionError::Notification(format!("sending webhook request: {}", e)))?;

        let status = response.status().as_u16();
        info!("Slack notification sent with response code: {}", status);
        Ok(status)
    }
}
