use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Diagnostic rule codes look like `W503`, `E203`, `D105`.
const RULE_CODE_PATTERN: &str = r"^[A-Z]+[0-9]+$";

/// Configuration block for one external static-analysis tool
/// (`[tool.<name>]` in the configuration file).
///
/// The typed options mirror what the QA tools accept; everything else is
/// carried through verbatim. Blocks are independent of each other and can be
/// rendered to command-line flags for the `{tool:<name>}` placeholder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Diagnostic rule codes the tool should suppress.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore: Vec<String>,

    /// Maximum allowed line length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_line_length: Option<u32>,

    /// Maximum allowed cyclomatic complexity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_complexity: Option<u32>,

    /// Any further options, passed through as `--<key>=<value>` flags.
    #[serde(flatten)]
    pub extra: BTreeMap<String, toml::Value>,
}

impl ToolConfig {
    /// Check the block's options for well-formedness.
    pub fn validate(&self, name: &str) -> Result<()> {
        let code_re = Regex::new(RULE_CODE_PATTERN).expect("rule code pattern is valid");

        for code in &self.ignore {
            if !code_re.is_match(code) {
                return Err(Error::ConfigError(format!(
                    "[tool.{name}] invalid rule code '{code}' in ignore list"
                )));
            }
        }
        if self.max_line_length == Some(0) {
            return Err(Error::ConfigError(format!(
                "[tool.{name}] max_line_length must be positive"
            )));
        }
        if self.max_complexity == Some(0) {
            return Err(Error::ConfigError(format!(
                "[tool.{name}] max_complexity must be positive"
            )));
        }
        for (key, value) in &self.extra {
            if scalar_to_string(value).is_none() && !matches!(value, toml::Value::Array(_)) {
                return Err(Error::ConfigError(format!(
                    "[tool.{name}] option '{key}' must be a scalar or an array of scalars"
                )));
            }
            if let toml::Value::Array(items) = value {
                if items.iter().any(|item| scalar_to_string(item).is_none()) {
                    return Err(Error::ConfigError(format!(
                        "[tool.{name}] option '{key}' must be a scalar or an array of scalars"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Render the block as command-line flags, in a stable order: `ignore`,
    /// `max_line_length`, `max_complexity`, then the extra options sorted by
    /// key. Assumes a block that passed [`ToolConfig::validate`].
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        if !self.ignore.is_empty() {
            args.push(format!("--ignore={}", self.ignore.join(",")));
        }
        if let Some(len) = self.max_line_length {
            args.push(format!("--max-line-length={len}"));
        }
        if let Some(max) = self.max_complexity {
            args.push(format!("--max-complexity={max}"));
        }

        for (key, value) in &self.extra {
            let flag = key.replace('_', "-");
            match value {
                toml::Value::Boolean(true) => args.push(format!("--{flag}")),
                toml::Value::Boolean(false) => {}
                toml::Value::Array(items) => {
                    let joined: Vec<String> =
                        items.iter().filter_map(scalar_to_string).collect();
                    args.push(format!("--{flag}={}", joined.join(",")));
                }
                other => {
                    if let Some(text) = scalar_to_string(other) {
                        args.push(format!("--{flag}={text}"));
                    }
                }
            }
        }

        args
    }
}

fn scalar_to_string(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s.clone()),
        toml::Value::Integer(i) => Some(i.to_string()),
        toml::Value::Float(f) => Some(f.to_string()),
        toml::Value::Boolean(b) => Some(b.to_string()),
        _ => None,
    }
}
