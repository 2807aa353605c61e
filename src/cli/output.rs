//! CLI output formatting

use crate::{core::state::DispatchState, execution::DispatchEvent};
use console::Emoji;

pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static SPINNER: Emoji<'_, '_> = Emoji("⏳ ", "~ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "!");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");

/// Format a dispatch state for display
pub fn format_state(state: &DispatchState) -> String {
    match state {
        DispatchState::Idle => style("IDLE").dim().to_string(),
        DispatchState::Resolving(operation) => {
            style(format!("RESOLVING {}", operation)).yellow().to_string()
        }
        DispatchState::Running { step_id, .. } => {
            style(format!("RUNNING {}", step_id)).yellow().to_string()
        }
        DispatchState::Succeeded => style("SUCCEEDED").green().to_string(),
        DispatchState::Skipped { .. } => style("SKIPPED").dim().to_string(),
        DispatchState::Failed { .. } => style("FAILED").red().to_string(),
    }
}

/// Format a dispatch event for display
pub fn format_dispatch_event(event: &DispatchEvent) -> String {
    match event {
        DispatchEvent::PipelineStarted {
            run_id,
            operation,
            total_steps,
        } => format!(
            "{} Running {} in {} steps ({})",
            ROCKET,
            style(operation).bold(),
            style(total_steps).cyan(),
            style(&run_id.to_string()[..8]).dim()
        ),
        DispatchEvent::PipelineSkipped { operation, reason } => format!(
            "{} {} skipped: {}",
            WARN,
            style(operation).bold(),
            style(reason).dim()
        ),
        DispatchEvent::StepStarted {
            step_id,
            index,
            total,
        } => format!(
            "{} {} {}",
            SPINNER,
            style(format!("[{}/{}]", index + 1, total)).dim(),
            style(step_id).cyan()
        ),
        DispatchEvent::StepCompleted {
            step_id,
            duration_ms,
        } => format!(
            "{} {} {}",
            CHECK,
            style(step_id).green(),
            style(format_duration_ms(*duration_ms)).dim()
        ),
        DispatchEvent::StepFailed { step_id, error } => {
            format!("{} {}: {}", CROSS, style(step_id).red(), style(error).dim())
        }
        DispatchEvent::DiagnosticsCollected { available } => {
            if *available {
                format!("{} Cluster diagnostics attached to failure report", INFO)
            } else {
                format!("{} Cluster diagnostics unavailable", WARN)
            }
        }
        DispatchEvent::PipelineFinished { run_id, state } => format!(
            "{} Run ({}) {}",
            INFO,
            style(&run_id.to_string()[..8]).dim(),
            format_state(state)
        ),
    }
}

fn format_duration_ms(duration_ms: i64) -> String {
    let secs = duration_ms.max(0) / 1000;
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
