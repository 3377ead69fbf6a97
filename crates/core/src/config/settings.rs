use crate::config::environment::EnvironmentDef;
use crate::config::tool::ToolConfig;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// File names probed when discovering the configuration, in order.
pub const CONFIG_FILE_NAMES: [&str; 2] = ["envrun.toml", ".envrun.toml"];

fn default_env_name() -> String {
    "default".to_string()
}

fn default_work_dir() -> PathBuf {
    PathBuf::from(".envrun")
}

fn default_installer() -> String {
    "pip install".to_string()
}

/// Global `[settings]` block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Environment run when the CLI is given no name.
    #[serde(default = "default_env_name")]
    pub default_env: String,

    /// Root under which per-environment work directories are created,
    /// relative to the configuration file.
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,

    /// Command line used to install `deps`, split on whitespace and
    /// followed by the dep list.
    #[serde(default = "default_installer")]
    pub installer: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_env: default_env_name(),
            work_dir: default_work_dir(),
            installer: default_installer(),
        }
    }
}

/// The parsed configuration file: global settings, named environments
/// and shared tool option blocks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,

    #[serde(default, rename = "env")]
    pub envs: BTreeMap<String, EnvironmentDef>,

    #[serde(default, rename = "tool")]
    pub tools: BTreeMap<String, ToolConfig>,

    /// Directory the configuration file was loaded from. Not part of the
    /// file itself; paths and command working directories resolve here.
    #[serde(skip)]
    pub config_dir: PathBuf,
}

/// One row of `envrun list` output.
#[derive(Debug, Clone, Serialize)]
pub struct EnvironmentSummary {
    pub name: String,
    pub description: Option<String>,
    pub commands: usize,
    pub deps: usize,
    pub is_default: bool,
}

impl Config {
    /// Parse configuration text. The config directory defaults to `.`;
    /// callers loading from disk should prefer [`Config::load_from_file`].
    pub fn load_from_str(text: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(text)?;
        config.config_dir = PathBuf::from(".");
        Ok(config)
    }

    /// Load and parse the file at `path`, remembering its directory.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&text)?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        config.config_dir = dir.canonicalize().unwrap_or(dir);
        Ok(config)
    }

    /// Walk from `start_dir` toward the filesystem root looking for a
    /// configuration file.
    pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
        for dir in start_dir.ancestors() {
            for name in CONFIG_FILE_NAMES {
                let candidate = dir.join(name);
                if candidate.is_file() {
                    return Some(candidate);
                }
            }
        }
        None
    }

    /// Look up an environment by name.
    pub fn environment(&self, name: &str) -> Result<&EnvironmentDef> {
        self.envs.get(name).ok_or_else(|| Error::UnknownEnvironment {
            name: name.to_string(),
            available: match self.env_names().join(", ") {
                names if names.is_empty() => "none".to_string(),
                names => names,
            },
        })
    }

    /// Environment names in stable (sorted) order.
    pub fn env_names(&self) -> Vec<&str> {
        self.envs.keys().map(String::as_str).collect()
    }

    /// Tool block names in stable (sorted) order.
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    pub fn tool(&self, name: &str) -> Option<&ToolConfig> {
        self.tools.get(name)
    }

    /// Summaries for every environment, used by the list command.
    pub fn summaries(&self) -> Vec<EnvironmentSummary> {
        self.envs
            .iter()
            .map(|(name, env)| EnvironmentSummary {
                name: name.clone(),
                description: env.description.clone(),
                commands: env.commands.len(),
                deps: env.deps.len(),
                is_default: *name == self.settings.default_env,
            })
            .collect()
    }
}
