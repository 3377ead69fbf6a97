//! The isolated context an environment's commands run in.
//!
//! Every run gets a fresh per-environment work directory and a minimal
//! variable map: a small base set plus whatever `pass_env` admits, with
//! `set_env` entries layered on top. Nothing else from the parent process
//! leaks through.

use crate::config::{Config, EnvironmentDef};
use crate::error::{Error, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// Parent variables always forwarded, independent of `pass_env`.
pub const BASE_PASS_ENV: &[&str] = &[
    "PATH", "HOME", "USER", "TMPDIR", "TEMP", "TMP", "LANG", "LANGUAGE", "LC_*", "TERM",
];

/// Name of the manifest recording what was installed into an environment.
pub const INSTALL_MANIFEST_NAME: &str = "installed.json";

/// Everything a command needs to run: where, and with which variables.
///
/// Built per invocation from the configuration and the parent process
/// environment, then handed to the executor. Construction is pure;
/// [`ExecutionContext::prepare`] touches the filesystem.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionContext {
    pub env_name: String,
    /// This environment's private directory, `<work_dir>/<env_name>`.
    pub env_dir: PathBuf,
    /// Root under which all environment directories live.
    pub work_dir: PathBuf,
    pub config_dir: PathBuf,
    /// Directory commands are spawned in.
    pub cwd: PathBuf,
    /// The complete variable map commands see. The parent environment is
    /// not inherited beyond what this map carries.
    pub env_vars: BTreeMap<String, String>,
}

#[derive(Serialize)]
struct InstallManifest<'a> {
    environment: &'a str,
    installer: &'a str,
    deps: &'a [String],
    recorded_at_epoch_secs: u64,
}

impl ExecutionContext {
    /// Derive the context for `name` from the configuration and a snapshot
    /// of the parent environment (`std::env::vars()` in production, a
    /// literal list in tests).
    pub fn new<I>(name: &str, env: &EnvironmentDef, config: &Config, parent_env: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let work_dir = config.config_dir.join(&config.settings.work_dir);
        let env_dir = work_dir.join(name);
        let cwd = match &env.change_dir {
            Some(dir) => config.config_dir.join(dir),
            None => config.config_dir.clone(),
        };

        let mut patterns: Vec<&str> = BASE_PASS_ENV.to_vec();
        patterns.extend(env.pass_env.iter().map(String::as_str));

        let mut env_vars = BTreeMap::new();
        for (key, value) in parent_env {
            if patterns.iter().any(|p| env_pattern_matches(p, &key)) {
                env_vars.insert(key, value);
            }
        }

        env_vars.insert("ENVRUN_ENV_NAME".to_string(), name.to_string());
        env_vars.insert(
            "ENVRUN_ENV_DIR".to_string(),
            env_dir.display().to_string(),
        );
        env_vars.insert(
            "ENVRUN_WORK_DIR".to_string(),
            work_dir.display().to_string(),
        );

        // set_env wins over everything, including the injected variables.
        for (key, value) in &env.set_env {
            env_vars.insert(key.clone(), value.clone());
        }

        Self {
            env_name: name.to_string(),
            env_dir,
            work_dir,
            config_dir: config.config_dir.clone(),
            cwd,
            env_vars,
        }
    }

    /// Make the context real on disk: a fresh, empty environment directory.
    /// Any leftovers from a previous run are removed first.
    pub fn prepare(&self) -> Result<()> {
        if !self.cwd.is_dir() {
            return Err(Error::ConfigError(format!(
                "working directory '{}' does not exist",
                self.cwd.display()
            )));
        }
        if self.env_dir.exists() {
            std::fs::remove_dir_all(&self.env_dir)?;
        }
        std::fs::create_dir_all(&self.env_dir)?;
        Ok(())
    }

    /// Record the installed deps in the environment directory, mirroring
    /// what a future `--skip-install` could compare against.
    pub fn write_manifest(&self, installer: &str, deps: &[String]) -> Result<PathBuf> {
        let manifest = InstallManifest {
            environment: &self.env_name,
            installer,
            deps,
            recorded_at_epoch_secs: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
        };
        let path = self.env_dir.join(INSTALL_MANIFEST_NAME);
        let json = serde_json::to_string_pretty(&manifest)?;
        std::fs::write(&path, json)?;
        Ok(path)
    }
}

/// Match an environment variable name against a `pass_env` pattern.
/// `*` matches any run of characters; everything else is literal.
pub fn env_pattern_matches(pattern: &str, name: &str) -> bool {
    let parts: Vec<&str> = pattern.split('*').collect();
    if parts.len() == 1 {
        return pattern == name;
    }
    let mut rest = name;
    for (i, part) in parts.iter().enumerate() {
        if part.is_empty() {
            continue;
        }
        match rest.find(part) {
            Some(pos) => {
                if i == 0 && pos != 0 {
                    return false;
                }
                rest = &rest[pos + part.len()..];
            }
            None => return false,
        }
    }
    match parts.last() {
        Some(last) if !last.is_empty() => name.ends_with(last),
        _ => true,
    }
}
