//! Outcome notifications

pub mod slack;

use crate::core::error::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::fmt;
use tracing::info;

pub use slack::SlackNotifier;

/// Notification status, as shown to the channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationStatus {
    Success,
    Failure,
    Skip,
}

impl NotificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationStatus::Success => "Success",
            NotificationStatus::Failure => "Failure",
            NotificationStatus::Skip => "Skip",
        }
    }
}

impl fmt::Display for NotificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub status: NotificationStatus,
    pub message: String,
    /// Extra `key: value` lines appended to the message
    pub extra: BTreeMap<String, String>,
    pub tenant: String,
}

impl Notification {
    pub fn new(status: NotificationStatus, message: impl Into<String>, tenant: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            extra: BTreeMap::new(),
            tenant: tenant.into(),
        }
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Trait for notification delivery
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver the notification, returning the transport status code
    async fn notify(&self, notification: &Notification) -> Result<u16>;
}

/// Notifier used when Slack notifications are disabled: traces only
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, notification: &Notification) -> Result<u16> {
        info!(
            "Notification - Status: {}, Tenant: {}, Message: {}",
            notification.status, notification.tenant, notification.message
        );
        Ok(0)
    }
}
