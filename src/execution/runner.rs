//! External command runner - executes rmk (and friends) through the shell

use crate::core::error::{ActionError, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Trait for external command execution - allows for different implementations
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run a shell command line to completion
    ///
    /// Returns the trimmed stdout when `capture_output` is set, `None` otherwise.
    /// A non-zero exit is an `ActionError::ExternalCommand`.
    async fn run(&self, command: &str, capture_output: bool) -> Result<Option<String>>;
}

/// Runs commands with `sh -c`, each bounded by a timeout
///
/// The environment map is applied to every child process only.
#[derive(Debug, Clone)]
pub struct ShellRunner {
    /// Extra environment for child processes
    envs: BTreeMap<String, String>,

    /// Timeout for each command in seconds
    timeout_secs: u64,
}

impl ShellRunner {
    /// Create a runner with no extra environment
    pub fn new(timeout_secs: u64) -> Self {
        Self {
            envs: BTreeMap::new(),
            timeout_secs,
        }
    }

    pub fn with_envs(mut self, envs: BTreeMap<String, String>) -> Self {
        self.envs.extend(envs);
        self
    }

    fn command(&self, command: &str) -> Command {
        let mut cmd = Command::new("sh");
        cmd.arg("-c")
            .arg(command)
            .envs(&self.envs)
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl CommandRunner for ShellRunner {
    async fn run(&self, command: &str, capture_output: bool) -> Result<Option<String>> {
        debug!("Running command: {}", command);

        let timeout_duration = Duration::from_secs(self.timeout_secs);
        let timed_out = || ActionError::CommandTimeout {
            command: command.to_string(),
            secs: self.timeout_secs,
        };
        let spawn_failed = |source| ActionError::Spawn {
            command: command.to_string(),
            source,
        };

        if capture_output {
            let mut cmd = self.command(command);
            cmd.stdout(Stdio::piped()).stderr(Stdio::piped());

            let output = timeout(timeout_duration, cmd.output())
                .await
                .map_err(|_| timed_out())?
                .map_err(spawn_failed)?;

            if !output.status.success() {
                let code = output.status.code().unwrap_or(-1);
                let stderr = String::from_utf8_lossy(&output.stderr);
                warn!("'{}' exited with code {}: {}", command, code, stderr.trim());
                return Err(ActionError::ExternalCommand {
                    command: command.to_string(),
                    code,
                });
            }

            let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
            debug!("'{}' returned {} bytes of output", command, stdout.len());
            Ok(Some(stdout))
        } else {
            let mut child = self.command(command).spawn().map_err(spawn_failed)?;

            let status = timeout(timeout_duration, child.wait())
                .await
                .map_err(|_| timed_out())?
                .map_err(spawn_failed)?;

            if !status.success() {
                return Err(ActionError::ExternalCommand {
                    command: command.to_string(),
                    code: status.code().unwrap_or(-1),
                });
            }
            Ok(None)
        }
    }
}
