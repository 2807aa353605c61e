//! Step outputs for the invoking workflow

use crate::core::error::Result;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// Destination for key/value outputs
pub trait OutputSink: Send + Sync {
    fn write_outputs(&self, outputs: &BTreeMap<String, String>) -> Result<()>;
}

/// Appends `key=value` lines to the file named by `GITHUB_OUTPUT`
#[derive(Debug, Clone, Default)]
pub struct GitHubOutput {
    path: Option<PathBuf>,
}

impl GitHubOutput {
    pub fn from_env() -> Self {
        Self {
            path: std::env::var_os("GITHUB_OUTPUT").map(PathBuf::from),
        }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Whether a runner output file is available
    pub fn is_available(&self) -> bool {
        self.path.is_some()
    }
}

impl OutputSink for GitHubOutput {
    fn write_outputs(&self, outputs: &BTreeMap<String, String>) -> Result<()> {
        let Some(path) = &self.path else {
            info!("Skip writing outputs: not running on a GitHub Actions runner");
            return Ok(());
        };

        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        for (key, value) in outputs {
            writeln!(file, "{}={}", key, value)?;
        }
        Ok(())
    }
}
