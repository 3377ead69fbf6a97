//! Command execution behind a small trait seam.
//!
//! The runner only ever talks to [`CommandExecutor`], so tests can swap in
//! a scripted fake and assert on ordering and fail-fast behavior without
//! spawning processes.

use crate::command::CommandSpec;
use crate::context::ExecutionContext;
use crate::error::{Error, Result};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use tracing::debug;

/// Runs one command inside an execution context, yielding its exit code.
pub trait CommandExecutor {
    fn execute(&self, spec: &CommandSpec, ctx: &ExecutionContext) -> Result<i32>;
}

/// The real executor: spawns the program directly, no shell in between.
/// The child sees exactly the context's variable map and working directory.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessExecutor;

impl CommandExecutor for ProcessExecutor {
    fn execute(&self, spec: &CommandSpec, ctx: &ExecutionContext) -> Result<i32> {
        debug!("Spawning: {}", spec.to_shell_string());

        let mut command = Command::new(&spec.program);
        command
            .args(&spec.args)
            .env_clear()
            .envs(&ctx.env_vars)
            .current_dir(&ctx.cwd);

        let status = command.status().map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::CommandNotFound {
                program: spec.program.clone(),
            },
            _ => Error::IoError(e),
        })?;

        Ok(exit_code_of(status))
    }
}

#[cfg(unix)]
fn exit_code_of(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    match status.code() {
        Some(code) => code,
        // Killed by a signal; use the conventional shell encoding.
        None => 128 + status.signal().unwrap_or(0),
    }
}

#[cfg(not(unix))]
fn exit_code_of(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}

/// Locate `program` on the given search path. Names containing a path
/// separator are checked as-is instead of searched.
pub fn find_in_path(program: &str, path_var: &str) -> Option<PathBuf> {
    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return is_executable(candidate).then(|| candidate.to_path_buf());
    }
    for dir in std::env::split_paths(path_var) {
        let full = dir.join(program);
        if is_executable(&full) {
            return Some(full);
        }
    }
    None
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.is_file()
        && std::fs::metadata(path)
            .map(|m| m.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
