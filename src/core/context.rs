//! Execution context - everything a single dispatch reads

use crate::core::{
    config::{ActionConfig, DependencyParams, ReleaseParams},
    environment::Environment,
    error::Result,
    operation::Operation,
};
use std::collections::BTreeMap;

/// Operation-specific inputs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationParams {
    pub dependency: DependencyParams,
    pub release: ReleaseParams,
    pub sync_labels: Vec<String>,
}

/// Read-only context for one run, constructed after environment selection
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    pub environment: Environment,
    pub operation: Operation,
    /// Tenant reported by `rmk config view`
    pub tenant: String,
    /// Branch the environment was selected from
    pub branch: String,
    /// Configured cluster provider name, as given
    pub cluster_provider: String,
    pub params: OperationParams,
    /// Message of the checked-out commit, when it could be read
    pub commit_message: Option<String>,
}

impl ExecutionContext {
    /// Build the context from configuration; fails when the command is unknown
    pub fn from_config(
        config: &ActionConfig,
        environment: Environment,
        branch: impl Into<String>,
        tenant: impl Into<String>,
    ) -> Result<Self> {
        let operation: Operation = config.command.parse()?;

        Ok(Self {
            environment,
            operation,
            tenant: tenant.into(),
            branch: branch.into(),
            cluster_provider: config.cluster_provider.clone(),
            params: OperationParams {
                dependency: config.dependency.clone(),
                release: config.release.clone(),
                sync_labels: config.sync_labels.clone(),
            },
            commit_message: None,
        })
    }

    pub fn with_commit_message(mut self, message: impl Into<String>) -> Self {
        self.commit_message = Some(message.into());
        self
    }

    /// Key/value outputs published after a successful run
    pub fn outputs(&self) -> BTreeMap<String, String> {
        let mut outputs = BTreeMap::new();
        outputs.insert("environment".to_string(), self.environment.to_string());
        outputs.insert("branch".to_string(), self.branch.clone());

        match self.operation {
            Operation::ProjectUpdate => {
                outputs.insert(
                    "dependency_name".to_string(),
                    self.params.dependency.name.clone(),
                );
                outputs.insert(
                    "dependency_version".to_string(),
                    self.params.dependency.version.clone(),
                );
            }
            Operation::ReleaseUpdate => {
                outputs.insert(
                    "release_repository".to_string(),
                    self.params.release.repository.clone(),
                );
                outputs.insert(
                    "release_version".to_string(),
                    self.params.release.version.clone(),
                );
            }
            _ => {}
        }

        outputs
    }
}
