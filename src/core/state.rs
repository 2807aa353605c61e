//! Dispatch state models

use crate::core::operation::Operation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Dispatcher state machine
///
/// `Idle → Resolving → Running(step) → Succeeded | Failed`; `Skipped` is reached
/// from `Resolving` when a pipeline guard fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DispatchState {
    Idle,
    Resolving(Operation),
    Running { step_index: usize, step_id: String },
    Succeeded,
    Skipped { reason: String },
    Failed { error: String },
}

impl DispatchState {
    /// Check if the state is terminal
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DispatchState::Succeeded | DispatchState::Skipped { .. } | DispatchState::Failed { .. }
        )
    }
}

/// Outcome of a single step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StepOutcome {
    Completed {
        /// Captured stdout, for steps that capture
        output: Option<String>,
    },
    Failed {
        error: String,
    },
}

/// Record of one executed step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRecord {
    pub step_id: String,
    pub command: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcome: StepOutcome,
}

impl StepRecord {
    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, StepOutcome::Completed { .. })
    }

    pub fn duration(&self) -> chrono::Duration {
        self.finished_at.signed_duration_since(self.started_at)
    }
}

/// State of one dispatch run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchReport {
    /// Unique run ID
    pub run_id: Uuid,

    pub operation: Option<Operation>,

    pub state: DispatchState,

    pub started_at: DateTime<Utc>,

    pub completed_at: Option<DateTime<Utc>>,

    pub steps: Vec<StepRecord>,
}

impl DispatchReport {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            operation: None,
            state: DispatchState::Idle,
            started_at: Utc::now(),
            completed_at: None,
            steps: Vec::new(),
        }
    }

    pub fn resolve(&mut self, operation: Operation) {
        self.operation = Some(operation);
        self.state = DispatchState::Resolving(operation);
    }

    pub fn run_step(&mut self, step_index: usize, step_id: &str) {
        self.state = DispatchState::Running {
            step_index,
            step_id: step_id.to_string(),
        };
    }

    pub fn succeed(&mut self) {
        self.finish(DispatchState::Succeeded);
    }

    pub fn skip(&mut self, reason: String) {
        self.finish(DispatchState::Skipped { reason });
    }

    pub fn fail(&mut self, error: String) {
        self.finish(DispatchState::Failed { error });
    }

    fn finish(&mut self, state: DispatchState) {
        self.state = state;
        self.completed_at = Some(Utc::now());
    }

    pub fn completed_steps(&self) -> usize {
        self.steps.iter().filter(|s| s.succeeded()).count()
    }
}

impl Default for DispatchReport {
    fn default() -> Self {
        Self::new()
    }
}
