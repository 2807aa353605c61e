//! rmk installation

use crate::core::error::{ActionError, Result};
use semver::Version;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::info;

/// Oldest rmk release the action supports
pub const MIN_RMK_VERSION: Version = Version::new(0, 45, 2);

/// Downloads the rmk installer script and runs it for the requested version
#[derive(Debug, Clone)]
pub struct RmkInstaller {
    version: String,
    download_url: String,
}

impl RmkInstaller {
    pub fn new(version: impl Into<String>, download_url: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            download_url: download_url.into(),
        }
    }

    /// `latest`, or a semantic version not older than `MIN_RMK_VERSION`
    pub fn verify_version(&self) -> Result<()> {
        info!("Verifying RMK installation version...");
        if self.version == "latest" {
            return Ok(());
        }

        let raw = self.version.strip_prefix('v').unwrap_or(&self.version);
        let version = Version::parse(raw).map_err(|e| {
            ActionError::Install(format!("invalid RMK version '{}': {}", self.version, e))
        })?;

        if version < MIN_RMK_VERSION {
            return Err(ActionError::Install(format!(
                "version {} of RMK is not correct. The version for RMK must be at least v{} or greater.",
                self.version, MIN_RMK_VERSION
            )));
        }
        Ok(())
    }

    /// Verify the version, then download and run the installer
    pub async fn install(&self) -> Result<()> {
        self.verify_version()?;

        info!("Installing RMK {}", self.version);
        let script = reqwest::get(&self.download_url)
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| ActionError::Install(format!("error downloading RMK installer file: {}", e)))?
            .text()
            .await
            .map_err(|e| ActionError::Install(format!("error reading RMK installer file: {}", e)))?;

        let mut child = Command::new("bash")
            .args(["-s", "--", &self.version])
            .stdin(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ActionError::Install(format!("error starting RMK installer: {}", e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(script.as_bytes()).await?;
        }

        let status = child.wait().await?;
        if !status.success() {
            return Err(ActionError::Install(format!(
                "error installing RMK: installer exited with code {}",
                status.code().unwrap_or(-1)
            )));
        }
        Ok(())
    }
}
