//! Error types for environment selection and command dispatch

use thiserror::Error;

/// Errors raised while resolving the environment or running an operation
#[derive(Debug, Error)]
pub enum ActionError {
    /// No environment-selection rule matched the branch
    #[error("environment '{0}' not allowed for environment selection")]
    InvalidBranch(String),

    /// The classified environment is missing from the allow-list
    #[error("environment {0} is not allowed")]
    EnvironmentNotAllowed(String),

    /// A parameter required by the operation is empty
    #[error("{0}")]
    MissingParameter(String),

    /// The requested operation name is not recognized
    #[error("unknown RMK command: {0}")]
    UnknownCommand(String),

    /// An external command exited with a non-zero status
    #[error("command '{command}' failed with exit code {code}")]
    ExternalCommand { command: String, code: i32 },

    /// An external command did not finish within the step timeout
    #[error("command '{command}' timed out after {secs} seconds")]
    CommandTimeout { command: String, secs: u64 },

    /// An external command could not be started
    #[error("failed to start command '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The credentials payload is malformed or incomplete
    #[error("credentials: {0}")]
    CredentialConfiguration(String),

    #[error("notification: {0}")]
    Notification(String),

    #[error("rmk installation: {0}")]
    Install(String),

    #[error("GitHub context: {0}")]
    GitHubContext(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ActionError {
    /// Whether the error came from an external process rather than from input validation
    pub fn is_command_failure(&self) -> bool {
        matches!(
            self,
            ActionError::ExternalCommand { .. }
                | ActionError::CommandTimeout { .. }
                | ActionError::Spawn { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ActionError>;
