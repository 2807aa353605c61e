//! Core domain models
//!
//! Environment selection, the operation catalogue, pipeline definitions and the
//! configuration they are built from.

pub mod allowed;
pub mod config;
pub mod context;
pub mod credentials;
pub mod environment;
pub mod error;
pub mod operation;
pub mod pipeline;
pub mod state;
pub mod step;

pub use allowed::AllowList;
pub use config::{ActionConfig, ClusterProvider};
pub use context::{ExecutionContext, OperationParams};
pub use environment::{Environment, EnvironmentClassifier};
pub use error::ActionError;
pub use operation::Operation;
pub use pipeline::Pipeline;
pub use state::{DispatchReport, DispatchState, StepOutcome, StepRecord};
pub use step::Step;
