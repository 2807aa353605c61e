//! Test doubles for dispatcher scenarios

#![allow(dead_code)]

use async_trait::async_trait;
use rmk_action::core::config::ActionConfig;
use rmk_action::core::error::{ActionError, Result};
use rmk_action::core::{Environment, ExecutionContext};
use rmk_action::execution::{CommandDispatcher, CommandRunner};
use rmk_action::github::OutputSink;
use rmk_action::notify::{Notification, Notifier};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// Runner that records every command line instead of executing it
///
/// Commands containing a scripted failure substring exit with code 1. Commands
/// containing a scripted output key return that output.
#[derive(Clone, Default)]
pub struct RecordingRunner {
    calls: Arc<Mutex<Vec<String>>>,
    failures: Vec<String>,
    outputs: Vec<(String, String)>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(mut self, pattern: &str) -> Self {
        self.failures.push(pattern.to_string());
        self
    }

    pub fn with_output(mut self, pattern: &str, output: &str) -> Self {
        self.outputs.push((pattern.to_string(), output.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, command: &str, capture_output: bool) -> Result<Option<String>> {
        self.calls.lock().unwrap().push(command.to_string());

        if self.failures.iter().any(|f| command.contains(f.as_str())) {
            return Err(ActionError::ExternalCommand {
                command: command.to_string(),
                code: 1,
            });
        }

        if !capture_output {
            return Ok(None);
        }
        Ok(self
            .outputs
            .iter()
            .find(|(pattern, _)| command.contains(pattern.as_str()))
            .map(|(_, output)| output.clone()))
    }
}

/// Notifier that keeps every attempted notification
///
/// A failing notifier records the attempt and then reports a delivery error.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<Notification>>>,
    failing: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, notification: &Notification) -> Result<u16> {
        self.sent.lock().unwrap().push(notification.clone());
        if self.failing {
            return Err(ActionError::Notification(
                "webhook returned 500".to_string(),
            ));
        }
        Ok(200)
    }
}

/// Output sink that keeps written outputs in memory
#[derive(Clone, Default)]
pub struct MemoryOutput {
    written: Arc<Mutex<Vec<BTreeMap<String, String>>>>,
}

impl MemoryOutput {
    pub fn written(&self) -> Vec<BTreeMap<String, String>> {
        self.written.lock().unwrap().clone()
    }
}

impl OutputSink for MemoryOutput {
    fn write_outputs(&self, outputs: &BTreeMap<String, String>) -> Result<()> {
        self.written.lock().unwrap().push(outputs.clone());
        Ok(())
    }
}

/// Dispatcher wired to the recording doubles
pub struct Harness {
    pub runner: RecordingRunner,
    pub notifier: RecordingNotifier,
    pub output: MemoryOutput,
    pub dispatcher: CommandDispatcher<RecordingRunner>,
}

impl Harness {
    pub fn new(runner: RecordingRunner) -> Self {
        Self::with_notifier(runner, RecordingNotifier::default())
    }

    pub fn with_notifier(runner: RecordingRunner, notifier: RecordingNotifier) -> Self {
        let output = MemoryOutput::default();
        let dispatcher = CommandDispatcher::new(
            runner.clone(),
            Arc::new(notifier.clone()),
            Arc::new(output.clone()),
        );

        Self {
            runner,
            notifier,
            output,
            dispatcher,
        }
    }
}

/// Configuration for `command` on the AWS provider
pub fn config(command: &str) -> ActionConfig {
    ActionConfig {
        command: command.to_string(),
        cluster_provider: "aws".to_string(),
        ..ActionConfig::default()
    }
}

/// Context for `config` on the develop environment
pub fn context(config: &ActionConfig) -> ExecutionContext {
    ExecutionContext::from_config(config, Environment::Develop, "develop", "acme").unwrap()
}

/// Rmk commands the runner saw, diagnostics excluded
pub fn rmk_calls(runner: &RecordingRunner) -> Vec<String> {
    runner
        .calls()
        .into_iter()
        .filter(|call| call.starts_with("rmk "))
        .collect()
}
