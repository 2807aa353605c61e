//! Scenario-based tests for rmk-action

mod destroy_skip;
mod environment_selection;
mod notification_failure;
mod parameter_validation;
mod provision_failure;
mod success_outputs;
