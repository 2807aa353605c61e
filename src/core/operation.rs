//! The fixed set of rmk operations the action can run

use crate::core::error::{ActionError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Operation requested through `--rmk-command`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Destroy,
    Provision,
    ReleaseSync,
    ReleaseUpdate,
    ProjectUpdate,
    HelmfileValidate,
}

impl Operation {
    pub const ALL: [Operation; 6] = [
        Operation::Destroy,
        Operation::Provision,
        Operation::ReleaseSync,
        Operation::ReleaseUpdate,
        Operation::ProjectUpdate,
        Operation::HelmfileValidate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Destroy => "destroy",
            Operation::Provision => "provision",
            Operation::ReleaseSync => "release_sync",
            Operation::ReleaseUpdate => "release_update",
            Operation::ProjectUpdate => "project_update",
            Operation::HelmfileValidate => "helmfile_validate",
        }
    }

    /// Whether the operation reports its outcome to the notifier
    pub fn notifies(&self) -> bool {
        matches!(self, Operation::Destroy | Operation::Provision)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = ActionError;

    fn from_str(s: &str) -> Result<Self> {
        Operation::ALL
            .iter()
            .copied()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| ActionError::UnknownCommand(s.to_string()))
    }
}
