//! Step domain model - one external rmk invocation

use serde::{Deserialize, Serialize};

/// A single step in a pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Short step identifier (e.g. `cluster-create`)
    pub id: String,

    /// Shell command line to execute
    pub command: String,

    /// Capture stdout for inspection instead of streaming it
    pub capture_output: bool,

    /// Gather controller diagnostics when this step fails
    pub collect_diagnostics: bool,
}

impl Step {
    /// Create a step whose output streams to the job log
    pub fn new(id: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            command: command.into(),
            capture_output: false,
            collect_diagnostics: false,
        }
    }

    pub fn with_diagnostics(mut self) -> Self {
        self.collect_diagnostics = true;
        self
    }
}

/// Render `--selector <label>` flags for `rmk release sync`
pub fn selector_flags(labels: &[String]) -> String {
    labels
        .iter()
        .map(|label| format!("--selector {}", label))
        .collect::<Vec<_>>()
        .join(" ")
}

/// `rmk release sync`, optionally restricted to label selectors
pub fn release_sync_command(labels: &[String]) -> String {
    if labels.is_empty() {
        "rmk release sync".to_string()
    } else {
        format!("rmk release sync {}", selector_flags(labels))
    }
}
