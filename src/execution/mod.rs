//! Pipeline execution: command running, dispatch, failure diagnostics

pub mod diagnostics;
pub mod dispatcher;
pub mod runner;

pub use diagnostics::{DiagnosticsCollector, DiagnosticsUnavailable, ErrorGroup, LogDeduplicator};
pub use dispatcher::{CommandDispatcher, DispatchEvent, EventHandler};
pub use runner::{CommandRunner, ShellRunner};
