//! rmk-action - GitHub Action glue that selects an environment and drives rmk

pub mod cli;
pub mod core;
pub mod execution;
pub mod github;
pub mod notify;
pub mod setup;

// Re-export commonly used types
pub use core::{
    ActionConfig, ActionError, AllowList, DispatchReport, DispatchState, Environment,
    EnvironmentClassifier, ExecutionContext, Operation, Pipeline, Step,
};
pub use execution::{CommandDispatcher, CommandRunner, DispatchEvent, LogDeduplicator, ShellRunner};
pub use github::{GitHubContext, GitHubOutput, OutputSink};
pub use notify::{LogNotifier, Notification, NotificationStatus, Notifier, SlackNotifier};
