//! Command dispatcher - runs the pipeline behind the requested operation

use crate::{
    core::{
        context::ExecutionContext,
        error::{ActionError, Result},
        operation::Operation,
        pipeline::Pipeline,
        state::{DispatchReport, DispatchState, StepOutcome, StepRecord},
        step::Step,
    },
    execution::{diagnostics::DiagnosticsCollector, runner::CommandRunner},
    github::OutputSink,
    notify::{Notification, NotificationStatus, Notifier},
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Events that can occur during a dispatch
#[derive(Debug, Clone)]
pub enum DispatchEvent {
    PipelineStarted {
        run_id: Uuid,
        operation: Operation,
        total_steps: usize,
    },
    PipelineSkipped {
        operation: Operation,
        reason: String,
    },
    StepStarted {
        step_id: String,
        index: usize,
        total: usize,
    },
    StepCompleted {
        step_id: String,
        duration_ms: i64,
    },
    StepFailed {
        step_id: String,
        error: String,
    },
    DiagnosticsCollected {
        available: bool,
    },
    PipelineFinished {
        run_id: Uuid,
        state: DispatchState,
    },
}

/// Type for event handlers
pub type EventHandler = Arc<dyn Fn(&DispatchEvent) + Send + Sync>;

/// Sequential, fail-fast executor for operation pipelines
pub struct CommandDispatcher<R> {
    runner: R,
    notifier: Arc<dyn Notifier>,
    output: Arc<dyn OutputSink>,
    event_handlers: Vec<EventHandler>,
}

impl<R: CommandRunner> CommandDispatcher<R> {
    pub fn new(runner: R, notifier: Arc<dyn Notifier>, output: Arc<dyn OutputSink>) -> Self {
        Self {
            runner,
            notifier,
            output,
            event_handlers: Vec::new(),
        }
    }

    /// Add an event handler
    pub fn add_event_handler<F>(&mut self, handler: F)
    where
        F: Fn(&DispatchEvent) + Send + Sync + 'static,
    {
        self.event_handlers.push(Arc::new(handler));
    }

    /// Emit an event to all handlers
    fn emit_event(&self, event: DispatchEvent) {
        for handler in &self.event_handlers {
            handler(&event);
        }
    }

    /// Execute the context's operation
    ///
    /// Steps run strictly in order and the first failure aborts the rest. Outputs
    /// are published only when every step succeeded.
    pub async fn execute(&self, ctx: &ExecutionContext) -> Result<DispatchReport> {
        let mut report = DispatchReport::new();
        report.resolve(ctx.operation);

        let pipeline = match Pipeline::for_context(ctx) {
            Ok(pipeline) => pipeline,
            Err(e) => return Err(self.abort(&mut report, e)),
        };

        if let Some(reason) = pipeline.skip_reason(ctx) {
            info!("{}", reason);
            self.emit_event(DispatchEvent::PipelineSkipped {
                operation: ctx.operation,
                reason: reason.clone(),
            });
            self.send(ctx, NotificationStatus::Skip, reason.clone()).await;
            report.skip(reason);
            self.finish(&report);
            return Ok(report);
        }

        info!(
            "Running {} for branch {}, environment {} ({} steps)",
            ctx.operation,
            ctx.branch,
            ctx.environment,
            pipeline.steps.len()
        );
        self.emit_event(DispatchEvent::PipelineStarted {
            run_id: report.run_id,
            operation: ctx.operation,
            total_steps: pipeline.steps.len(),
        });

        let total = pipeline.steps.len();
        for (index, step) in pipeline.steps.iter().enumerate() {
            report.run_step(index, &step.id);
            self.emit_event(DispatchEvent::StepStarted {
                step_id: step.id.clone(),
                index,
                total,
            });

            let started_at = Utc::now();
            let result = self.runner.run(&step.command, step.capture_output).await;
            let finished_at = Utc::now();

            match result {
                Ok(output) => {
                    let record = StepRecord {
                        step_id: step.id.clone(),
                        command: step.command.clone(),
                        started_at,
                        finished_at,
                        outcome: StepOutcome::Completed { output },
                    };
                    self.emit_event(DispatchEvent::StepCompleted {
                        step_id: step.id.clone(),
                        duration_ms: record.duration().num_milliseconds(),
                    });
                    report.steps.push(record);
                }
                Err(e) => {
                    error!("Step {} failed: {}", step.id, e);
                    report.steps.push(StepRecord {
                        step_id: step.id.clone(),
                        command: step.command.clone(),
                        started_at,
                        finished_at,
                        outcome: StepOutcome::Failed {
                            error: e.to_string(),
                        },
                    });
                    self.emit_event(DispatchEvent::StepFailed {
                        step_id: step.id.clone(),
                        error: e.to_string(),
                    });

                    self.notify_failure(ctx, &pipeline, step, &e).await;
                    return Err(self.abort(&mut report, e));
                }
            }
        }

        if let Err(e) = self.output.write_outputs(&ctx.outputs()) {
            return Err(self.abort(&mut report, e));
        }

        report.succeed();
        if let Some(message) = pipeline.success_message {
            self.send(ctx, NotificationStatus::Success, message.to_string())
                .await;
        }

        info!("{} completed for environment {}", ctx.operation, ctx.environment);
        self.finish(&report);
        Ok(report)
    }

    /// Report a failed step for operations that notify
    ///
    /// Cluster steps of `provision` append controller diagnostics when available.
    async fn notify_failure(
        &self,
        ctx: &ExecutionContext,
        pipeline: &Pipeline,
        step: &Step,
        err: &ActionError,
    ) {
        if !pipeline.operation.notifies() {
            return;
        }

        let mut message = err.to_string();
        if step.collect_diagnostics {
            let collector = DiagnosticsCollector::new(&self.runner);
            let details = collector.failure_details(&ctx.cluster_provider).await;
            self.emit_event(DispatchEvent::DiagnosticsCollected {
                available: details.is_some(),
            });
            if let Some(details) = details {
                message = format!("{}\n\n{}", message, details);
            }
        }

        self.send(ctx, NotificationStatus::Failure, message).await;
    }

    /// Deliver a notification; delivery errors are logged, never raised
    async fn send(&self, ctx: &ExecutionContext, status: NotificationStatus, message: String) {
        let notification = Notification::new(status, message, ctx.tenant.clone())
            .with_extra("Environment", ctx.environment.to_string());

        match self.notifier.notify(&notification).await {
            Ok(code) => debug!("{} notification delivered ({})", status, code),
            Err(e) => warn!("Failed to deliver {} notification: {}", status, e),
        }
    }

    fn abort(&self, report: &mut DispatchReport, err: ActionError) -> ActionError {
        report.fail(err.to_string());
        self.finish(report);
        err
    }

    fn finish(&self, report: &DispatchReport) {
        self.emit_event(DispatchEvent::PipelineFinished {
            run_id: report.run_id,
            state: report.state.clone(),
        });
    }
}
