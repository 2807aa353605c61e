//! Provisioning failure diagnostics
//!
//! When cluster creation or provisioning fails, the Cluster API controller log is
//! pulled, split into glog error blocks, and collapsed by a normalized signature
//! so the failure report shows each distinct error once with its count.

use crate::core::config::ClusterProvider;
use crate::execution::runner::CommandRunner;
use regex::Regex;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, warn};

/// A diagnostic source could not be read; the caller continues without it
#[derive(Debug, Error)]
#[error("diagnostics unavailable: {0}")]
pub struct DiagnosticsUnavailable(pub String);

/// Error blocks sharing one normalized signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorGroup {
    pub signature: String,
    /// Raw blocks in the order they appeared
    pub occurrences: Vec<Vec<String>>,
}

impl ErrorGroup {
    pub fn count(&self) -> usize {
        self.occurrences.len()
    }

    /// First raw block of the group
    pub fn representative(&self) -> &[String] {
        self.occurrences.first().map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Splits, normalizes, and groups controller error logs
#[derive(Debug, Clone)]
pub struct LogDeduplicator {
    /// Applied in order
    replacements: Vec<(Regex, &'static str)>,
}

impl LogDeduplicator {
    pub fn new() -> Self {
        let rules: [(&str, &'static str); 4] = [
            (r"E\d{4} \d{2}:\d{2}:\d{2}\.\d+", "E_TIMESTAMP"),
            (r"(?i)request id: [0-9a-f-]+", "request id: <ID>"),
            (r#"RequestID: "[0-9a-fA-F-]+""#, r#"RequestID: "<ID>""#),
            (r#"reconcileID="[^"]*""#, r#"reconcileID="<ID>""#),
        ];

        let replacements = rules
            .into_iter()
            .map(|(pattern, placeholder)| {
                let regex = Regex::new(pattern)
                    .unwrap_or_else(|e| panic!("invalid built-in pattern {}: {}", pattern, e));
                (regex, placeholder)
            })
            .collect();

        Self { replacements }
    }

    /// Split log text into error blocks
    ///
    /// A block opens at a line starting with `E`, continues over lines that do
    /// not start with a letter, and closes at any other line.
    pub fn split_blocks(&self, text: &str) -> Vec<Vec<String>> {
        let mut blocks = Vec::new();
        let mut current: Option<Vec<String>> = None;

        for line in text.lines() {
            if line.starts_with('E') {
                if let Some(block) = current.take() {
                    blocks.push(block);
                }
                current = Some(vec![line.to_string()]);
                continue;
            }

            let starts_alphabetic = line.chars().next().is_some_and(char::is_alphabetic);
            match current.as_mut() {
                Some(block) if !starts_alphabetic => block.push(line.to_string()),
                Some(_) => {
                    if let Some(block) = current.take() {
                        blocks.push(block);
                    }
                }
                None => {}
            }
        }

        if let Some(block) = current {
            blocks.push(block);
        }
        blocks
    }

    /// Replace volatile tokens with fixed placeholders
    pub fn normalize(&self, block: &[String]) -> String {
        let mut text = block.join("\n");
        for (regex, placeholder) in &self.replacements {
            text = regex.replace_all(&text, *placeholder).into_owned();
        }
        text
    }

    /// Group blocks by signature, in first-seen order
    pub fn group(&self, text: &str) -> Vec<ErrorGroup> {
        let mut groups: Vec<ErrorGroup> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for block in self.split_blocks(text) {
            let signature = self.normalize(&block);
            match index.get(&signature) {
                Some(&i) => groups[i].occurrences.push(block),
                None => {
                    index.insert(signature.clone(), groups.len());
                    groups.push(ErrorGroup {
                        signature,
                        occurrences: vec![block],
                    });
                }
            }
        }

        groups
    }

    /// Human-readable report: one representative block per group with its count
    pub fn report(&self, text: &str) -> String {
        let groups = self.group(text);
        if groups.is_empty() {
            return "No controller errors found.".to_string();
        }

        groups
            .iter()
            .map(|group| {
                format!(
                    "Occurrences: {}\n{}",
                    group.count(),
                    group.representative().join("\n")
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl Default for LogDeduplicator {
    fn default() -> Self {
        Self::new()
    }
}

/// Kubernetes command that prints the controller manager log
pub fn controller_logs_command(controller: &str) -> String {
    format!(
        "kubectl logs --namespace {0}-system deployment/{0}-controller-manager",
        controller
    )
}

/// Kubernetes command listing all Cluster API resources
pub const CLUSTER_API_RESOURCES_COMMAND: &str = "kubectl get cluster-api --all-namespaces -o wide";

/// Fetches diagnostic sources through the command runner
pub struct DiagnosticsCollector<'a> {
    runner: &'a dyn CommandRunner,
    deduplicator: LogDeduplicator,
}

impl<'a> DiagnosticsCollector<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self {
            runner,
            deduplicator: LogDeduplicator::new(),
        }
    }

    /// Deduplicated controller error report for the provider
    pub async fn controller_report(
        &self,
        provider: ClusterProvider,
    ) -> Result<String, DiagnosticsUnavailable> {
        let controller = provider.controller();
        debug!("Fetching {} controller logs", controller);
        let logs = self
            .runner
            .run(&controller_logs_command(controller), true)
            .await
            .map_err(|e| DiagnosticsUnavailable(e.to_string()))?
            .unwrap_or_default();

        Ok(self.deduplicator.report(&logs))
    }

    /// Raw wide listing of Cluster API resources
    pub async fn cluster_resources(&self) -> Result<String, DiagnosticsUnavailable> {
        self.runner
            .run(CLUSTER_API_RESOURCES_COMMAND, true)
            .await
            .map(Option::unwrap_or_default)
            .map_err(|e| DiagnosticsUnavailable(e.to_string()))
    }

    /// Both sources combined; unavailable sources are left out
    ///
    /// A provider without a known controller yields no diagnostics at all.
    pub async fn failure_details(&self, provider: &str) -> Option<String> {
        let Some(provider) = ClusterProvider::from_name(provider) else {
            warn!("Skipping diagnostics: no controller known for provider '{}'", provider);
            return None;
        };

        let mut sections = Vec::new();

        match self.controller_report(provider).await {
            Ok(report) => sections.push(format!("Controller errors:\n{}", report)),
            Err(e) => warn!("Skipping controller logs: {}", e),
        }
        match self.cluster_resources().await {
            Ok(resources) => sections.push(format!("Cluster API resources:\n{}", resources)),
            Err(e) => warn!("Skipping cluster resources: {}", e),
        }

        if sections.is_empty() {
            None
        } else {
            Some(sections.join("\n\n"))
        }
    }
}
