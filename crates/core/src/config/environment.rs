use crate::command::{CommandEntry, CommandSpec};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// One named test environment (`[env.<name>]` in the configuration file):
/// an ordered command list plus the settings that shape its isolation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentDef {
    /// Human-readable summary, shown by `envrun list`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Packages installed into the environment before any command runs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deps: Vec<String>,

    /// External tools whose absence from PATH must not abort setup.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowlist_externals: Vec<String>,

    /// Variables set in the execution context, overriding inherited ones.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub set_env: BTreeMap<String, String>,

    /// Patterns for parent variables forwarded into the context (`CI`,
    /// `PIP_*`, ...). A small base set (PATH, HOME, ...) is always passed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pass_env: Vec<String>,

    /// Directory commands run in, relative to the configuration file.
    /// Defaults to the configuration file's own directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_dir: Option<PathBuf>,

    /// The ordered commands; order is significant and preserved.
    #[serde(default)]
    pub commands: Vec<CommandEntry>,
}

impl EnvironmentDef {
    /// Parse every command entry into a validated spec, in declared order.
    pub fn command_specs(&self) -> Result<Vec<CommandSpec>> {
        self.commands.iter().map(CommandSpec::parse).collect()
    }

    /// Validate the definition itself (commands parse, nothing empty).
    pub fn validate(&self, name: &str) -> Result<()> {
        if self.commands.is_empty() {
            return Err(Error::ConfigError(format!(
                "environment '{name}' has no commands"
            )));
        }
        for entry in &self.commands {
            CommandSpec::parse(entry)
                .map_err(|e| Error::ConfigError(format!("environment '{name}': {e}")))?;
        }
        for dep in &self.deps {
            if dep.trim().is_empty() {
                return Err(Error::ConfigError(format!(
                    "environment '{name}' has an empty entry in deps"
                )));
            }
        }
        for external in &self.allowlist_externals {
            if external.trim().is_empty() {
                return Err(Error::ConfigError(format!(
                    "environment '{name}' has an empty entry in allowlist_externals"
                )));
            }
        }
        Ok(())
    }
}
