//! Configuration validation for catching bad configs before anything runs

use crate::command::{split_command_line, substitution};
use crate::config::{Config, EnvironmentDef};
use crate::error::{Error, Result};
use regex::Regex;

/// Environment and tool block names: alphanumeric start, then
/// alphanumerics, `_`, `-` or `.`.
const NAME_PATTERN: &str = r"^[A-Za-z0-9][A-Za-z0-9_.-]*$";

/// Trait for validating configurations
pub trait ConfigValidator {
    /// Validate the entire configuration
    fn validate(&self, config: &Config) -> Result<()>;

    /// Validate a single environment definition
    fn validate_environment(&self, name: &str, env: &EnvironmentDef, config: &Config)
    -> Result<()>;
}

/// Main configuration validator
pub struct MainConfigValidator {
    name_re: Regex,
}

impl MainConfigValidator {
    pub fn new() -> Self {
        Self {
            name_re: Regex::new(NAME_PATTERN).expect("name pattern is valid"),
        }
    }

    fn validate_settings(&self, config: &Config) -> Result<()> {
        let settings = &config.settings;
        let installer = split_command_line(&settings.installer)
            .map_err(|e| Error::ConfigError(format!("settings.installer: {e}")))?;
        if installer.is_empty() {
            return Err(Error::ConfigError(
                "settings.installer must not be empty".to_string(),
            ));
        }
        if settings.work_dir.as_os_str().is_empty() {
            return Err(Error::ConfigError(
                "settings.work_dir must not be empty".to_string(),
            ));
        }
        if settings.default_env.is_empty() {
            return Err(Error::ConfigError(
                "settings.default_env must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for MainConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigValidator for MainConfigValidator {
    fn validate(&self, config: &Config) -> Result<()> {
        self.validate_settings(config)?;

        for (name, tool) in &config.tools {
            if !self.name_re.is_match(name) {
                return Err(Error::ConfigError(format!("invalid tool name '{name}'")));
            }
            tool.validate(name)?;
        }

        for (name, env) in &config.envs {
            self.validate_environment(name, env, config)?;
        }

        Ok(())
    }

    fn validate_environment(
        &self,
        name: &str,
        env: &EnvironmentDef,
        config: &Config,
    ) -> Result<()> {
        if !self.name_re.is_match(name) {
            return Err(Error::ConfigError(format!(
                "invalid environment name '{name}'"
            )));
        }
        env.validate(name)?;

        let tool_names = config.tool_names();
        for entry in &env.commands {
            substitution::validate_text(entry.text(), &tool_names)
                .map_err(|e| Error::ConfigError(format!("environment '{name}': {e}")))?;
        }
        Ok(())
    }
}

/// Extension trait for Config to add validation
impl Config {
    /// Validate this configuration
    pub fn validate(&self) -> Result<()> {
        let validator = MainConfigValidator::new();
        validator.validate(self)
    }
}
