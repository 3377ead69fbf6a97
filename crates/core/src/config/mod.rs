//! Configuration model for envrun

mod environment;
mod settings;
mod tool;
mod validation;

// Re-export main types
pub use environment::EnvironmentDef;
pub use settings::{CONFIG_FILE_NAMES, Config, EnvironmentSummary, Settings};
pub use tool::ToolConfig;
pub use validation::{ConfigValidator, MainConfigValidator};
