//! Branch-to-environment classification

use crate::core::error::{ActionError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const TASK_NUM_PATTERN: &str = r"[a-z]+-\d+";
const SEMVER_PATTERN: &str = r"v\d+\.\d+\.\d+(-rc)?$";

/// Deployment stage a branch maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Develop,
    Staging,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Develop => "develop",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ActionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "develop" => Ok(Environment::Develop),
            "staging" => Ok(Environment::Staging),
            "production" => Ok(Environment::Production),
            _ => Err(ActionError::InvalidBranch(s.to_string())),
        }
    }
}

/// How a matched rule turns the branch into an environment
#[derive(Debug, Clone, Copy)]
enum Resolution {
    /// The branch name is itself the environment
    Verbatim,
    Fixed(Environment),
    /// Versioned release branches go to production unless marked `-rc`
    Release,
}

/// A single (predicate, result) classification rule
#[derive(Debug, Clone)]
pub struct BranchRule {
    name: &'static str,
    pattern: Regex,
    resolution: Resolution,
}

impl BranchRule {
    fn new(name: &'static str, pattern: &str, resolution: Resolution) -> Self {
        let pattern = Regex::new(&format!("(?i){}", pattern))
            .unwrap_or_else(|e| panic!("invalid built-in pattern for rule {}: {}", name, e));
        Self {
            name,
            pattern,
            resolution,
        }
    }

    /// Rule name, used in traces
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Apply the rule; `None` when the branch does not match
    pub fn apply(&self, branch: &str, semver: &Regex) -> Option<Environment> {
        if !self.pattern.is_match(branch) {
            return None;
        }

        match self.resolution {
            Resolution::Verbatim => branch.parse().ok(),
            Resolution::Fixed(environment) => Some(environment),
            Resolution::Release => {
                if semver.is_match(branch) {
                    if branch.contains("-rc") {
                        Some(Environment::Staging)
                    } else {
                        Some(Environment::Production)
                    }
                } else {
                    Some(Environment::Staging)
                }
            }
        }
    }
}

/// Ordered, first-match-wins branch classifier
///
/// Precedence:
/// 1. exact `develop` / `staging` / `production`
/// 2. `hotfix/*` → production (extended classifier only)
/// 3. `feature/<task>-<n>` → develop
/// 4. `release/<task>-<n>` or `release/vX.Y.Z[-rc]` → staging, or production for a
///    non-rc version
///
/// All patterns are case-insensitive and anchored at the start of the branch name.
#[derive(Debug, Clone)]
pub struct EnvironmentClassifier {
    rules: Vec<BranchRule>,
    semver: Regex,
}

impl EnvironmentClassifier {
    /// Classifier without the hotfix override
    pub fn standard() -> Self {
        Self::with_hotfix(false)
    }

    /// Classifier used by the action: hotfix branches deploy to production
    pub fn extended() -> Self {
        Self::with_hotfix(true)
    }

    fn with_hotfix(hotfix: bool) -> Self {
        let mut rules = vec![BranchRule::new(
            "exact",
            r"^(develop|staging|production)$",
            Resolution::Verbatim,
        )];

        if hotfix {
            rules.push(BranchRule::new(
                "hotfix",
                r"^hotfix/",
                Resolution::Fixed(Environment::Production),
            ));
        }

        rules.push(BranchRule::new(
            "feature",
            &format!(r"^feature/{}", TASK_NUM_PATTERN),
            Resolution::Fixed(Environment::Develop),
        ));
        rules.push(BranchRule::new(
            "release",
            &format!(
                r"^release/{}|^release/{}",
                TASK_NUM_PATTERN, SEMVER_PATTERN
            ),
            Resolution::Release,
        ));

        let semver = Regex::new(&format!("(?i){}", SEMVER_PATTERN))
            .unwrap_or_else(|e| panic!("invalid built-in semver pattern: {}", e));

        Self { rules, semver }
    }

    /// Rules in evaluation order
    pub fn rules(&self) -> &[BranchRule] {
        &self.rules
    }

    /// Map a branch name to its environment
    pub fn select_environment(&self, branch: &str) -> Result<Environment> {
        for rule in &self.rules {
            if let Some(environment) = rule.apply(branch, &self.semver) {
                tracing::debug!("Branch {} matched rule '{}'", branch, rule.name());
                return Ok(environment);
            }
        }

        Err(ActionError::InvalidBranch(branch.to_string()))
    }
}

impl Default for EnvironmentClassifier {
    fn default() -> Self {
        Self::extended()
    }
}
