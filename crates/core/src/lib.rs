//! envrun - declarative test environment runner
//!
//! This crate provides functionality to:
//! - Parse and validate `envrun.toml` configuration (environments, tool blocks)
//! - Plan an environment run: isolated context, dep install step, expanded commands
//! - Execute the plan sequentially, fail-fast, and report per-command outcomes
pub mod command;
pub mod config;
pub mod context;
pub mod error;
pub mod executor;
pub mod report;
pub mod runner;

// Re-export commonly used types and traits
pub use error::{Error, Result};

// Re-export main API components
pub use command::{CommandEntry, CommandSpec};
pub use config::{Config, EnvironmentDef, ToolConfig};
pub use context::ExecutionContext;
pub use executor::{CommandExecutor, ProcessExecutor};
pub use report::{CommandRecord, CommandStatus, RunReport};
pub use runner::{EnvironmentRunner, RunPlan};
