//! Per-environment cluster provider credentials
//!
//! The payload is a JSON object keyed by environment name:
//!
//! ```json
//! { "develop": { "cluster_providers": { "aws": { "AWS_ACCESS_KEY_ID": "..." } } } }
//! ```
//!
//! Resolved credentials are returned as an environment map for child processes;
//! the action's own process environment is left untouched.

use crate::core::config::ClusterProvider;
use crate::core::error::{ActionError, Result};
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tracing::info;

pub const GCP_CREDENTIALS_FILE: &str = "gcp-credentials.json";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct AwsConfig {
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub aws_region: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct AzureConfig {
    pub azure_client_id: String,
    pub azure_client_secret: String,
    pub azure_location: String,
    pub azure_subscription_id: String,
    pub azure_tenant_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct GcpConfig {
    /// Service-account key, as an object or a JSON-encoded string
    pub google_application_credentials: Value,
    pub gcp_region: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClusterProviders {
    pub aws: Option<AwsConfig>,
    pub azure: Option<AzureConfig>,
    pub gcp: Option<GcpConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnvironmentCredentials {
    #[serde(default)]
    pub cluster_providers: ClusterProviders,
}

/// Parsed credentials payload
#[derive(Debug, Clone)]
pub struct Credentials {
    environments: HashMap<String, EnvironmentCredentials>,
}

impl Credentials {
    pub fn parse(json: &str) -> Result<Self> {
        let data: Value = serde_json::from_str(json).map_err(|e| {
            ActionError::CredentialConfiguration(format!("failed to parse JSON: {}", e))
        })?;

        let Value::Object(map) = data else {
            return Err(ActionError::CredentialConfiguration(
                "invalid JSON format: expected a dictionary".to_string(),
            ));
        };

        let mut environments = HashMap::new();
        for (name, value) in map {
            let env: EnvironmentCredentials = serde_json::from_value(value).map_err(|e| {
                ActionError::CredentialConfiguration(format!(
                    "invalid structure for environment '{}': {}",
                    name, e
                ))
            })?;
            environments.insert(name, env);
        }

        Ok(Self { environments })
    }

    pub fn environment(&self, name: &str) -> Option<&EnvironmentCredentials> {
        self.environments.get(name)
    }

    pub fn list_environments(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.environments.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Environment variables for `provider` in `environment`
    ///
    /// For GCP the service-account key is written to `workdir` and its absolute
    /// path exported as `GOOGLE_APPLICATION_CREDENTIALS`.
    pub fn env_for(
        &self,
        environment: &str,
        provider: &str,
        workdir: &Path,
    ) -> Result<BTreeMap<String, String>> {
        let env = self.environment(environment).ok_or_else(|| {
            ActionError::CredentialConfiguration(format!(
                "environment '{}' not found in credentials values",
                environment
            ))
        })?;
        let providers = &env.cluster_providers;

        let kind = ClusterProvider::from_name(provider).ok_or_else(|| {
            ActionError::CredentialConfiguration(format!(
                "invalid provider '{}'. Supported providers: aws, azure, gcp",
                provider
            ))
        })?;
        let missing = || {
            ActionError::CredentialConfiguration(format!(
                "provider '{}' is not configured for environment '{}'",
                kind, environment
            ))
        };

        let mut vars = BTreeMap::new();
        match kind {
            ClusterProvider::Aws => {
                let aws = providers.aws.as_ref().ok_or_else(missing)?;
                vars.insert("AWS_ACCESS_KEY_ID".to_string(), aws.aws_access_key_id.clone());
                vars.insert(
                    "AWS_SECRET_ACCESS_KEY".to_string(),
                    aws.aws_secret_access_key.clone(),
                );
                vars.insert("AWS_REGION".to_string(), aws.aws_region.clone());
            }
            ClusterProvider::Azure => {
                let azure = providers.azure.as_ref().ok_or_else(missing)?;
                vars.insert("AZURE_CLIENT_ID".to_string(), azure.azure_client_id.clone());
                vars.insert(
                    "AZURE_CLIENT_SECRET".to_string(),
                    azure.azure_client_secret.clone(),
                );
                vars.insert("AZURE_LOCATION".to_string(), azure.azure_location.clone());
                vars.insert(
                    "AZURE_SUBSCRIPTION_ID".to_string(),
                    azure.azure_subscription_id.clone(),
                );
                vars.insert("AZURE_TENANT_ID".to_string(), azure.azure_tenant_id.clone());
            }
            ClusterProvider::Gcp => {
                let gcp = providers.gcp.as_ref().ok_or_else(missing)?;
                let path = save_gcp_credentials(&gcp.google_application_credentials, workdir)?;
                vars.insert(
                    "GOOGLE_APPLICATION_CREDENTIALS".to_string(),
                    path.display().to_string(),
                );
                vars.insert("GCP_REGION".to_string(), gcp.gcp_region.clone());
            }
        }

        info!(
            "Credentials resolved for {} with cluster provider: {}",
            environment, kind
        );
        Ok(vars)
    }
}

/// Write the GCP service-account key to `workdir` and return its absolute path
pub fn save_gcp_credentials(content: &Value, workdir: &Path) -> Result<PathBuf> {
    let key = match content {
        Value::Object(_) => content.clone(),
        Value::String(s) if !s.trim().is_empty() => {
            serde_json::from_str::<Value>(s).map_err(|e| {
                ActionError::CredentialConfiguration(format!(
                    "failed to parse GCP credentials JSON: {}",
                    e
                ))
            })?
        }
        _ => {
            return Err(ActionError::CredentialConfiguration(
                "GCP credentials content is empty or invalid".to_string(),
            ))
        }
    };

    if !key.is_object() {
        return Err(ActionError::CredentialConfiguration(
            "invalid GCP credentials format: expected a JSON object".to_string(),
        ));
    }

    let path = workdir.join(GCP_CREDENTIALS_FILE);
    std::fs::write(&path, serde_json::to_string_pretty(&key)?)?;

    let absolute = if path.is_absolute() {
        path
    } else {
        std::env::current_dir()?.join(path)
    };
    Ok(absolute)
}
