//! One-time run preparation: rmk installation and project configuration

pub mod installer;
pub mod project;

pub use installer::RmkInstaller;
pub use project::ProjectInitializer;
