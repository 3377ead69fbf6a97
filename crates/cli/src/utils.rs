use anyhow::{Context, Result};
use envrun_core::{Config, Error};
use std::env;
use std::path::Path;

/// Load the configuration: an explicit path wins, otherwise walk upward
/// from the current directory.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let cwd = env::current_dir().context("Failed to get current directory")?;
            match Config::find_config_file(&cwd) {
                Some(path) => path,
                None => {
                    return Err(Error::ConfigError(format!(
                        "no envrun.toml found in {} or any parent directory",
                        cwd.display()
                    ))
                    .into());
                }
            }
        }
    };
    let config = Config::load_from_file(&path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    Ok(config)
}
