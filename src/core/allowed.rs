//! Allow-list gate for the selected environment

use crate::core::error::{ActionError, Result};
use std::collections::BTreeSet;
use tracing::info;

/// Environments the action may deploy to, from a comma-separated input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowList {
    entries: BTreeSet<String>,
}

impl AllowList {
    /// Parse a comma-separated list; entries are matched exactly
    pub fn parse(raw: &str) -> Self {
        Self {
            entries: raw.split(',').map(str::to_string).collect(),
        }
    }

    pub fn contains(&self, environment: &str) -> bool {
        self.entries.contains(environment)
    }

    /// Fail unless `environment` is listed
    pub fn validate(&self, environment: &str) -> Result<()> {
        if !self.contains(environment) {
            return Err(ActionError::EnvironmentNotAllowed(environment.to_string()));
        }

        info!("Environment {} is allowed", environment);
        Ok(())
    }
}
