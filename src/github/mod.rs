//! GitHub Actions integration: run context, REST lookups, step outputs

pub mod api;
pub mod context;
pub mod output;

pub use api::GitHubApi;
pub use context::GitHubContext;
pub use output::{GitHubOutput, OutputSink};
