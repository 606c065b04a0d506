//! Multisig CLI - deployment and scripted interactions
//!
//! This crate provides the CLI binary and the context that wires the
//! engine, vault and event journal together.

pub mod context;
pub mod deploy;
pub mod script;

pub use context::AppContext;
pub use deploy::{DeploymentConfig, Holding};
pub use script::{Step, StepOutput};
