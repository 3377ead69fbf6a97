//! Sequential environment runner.
//!
//! Resolves an environment into a [`RunPlan`] (context, optional install
//! step, expanded commands), then executes the plan fail-fast: deps are
//! installed first, commands run in declared order, and the first hard
//! failure skips everything after it.

use crate::command::{CommandSpec, SubstitutionContext, split_command_line, substitution};
use crate::config::Config;
use crate::context::ExecutionContext;
use crate::error::{Error, Result};
use crate::executor::{CommandExecutor, ProcessExecutor, find_in_path};
use crate::report::{CommandRecord, CommandStatus, RunReport};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Everything resolved and validated before the first process spawns.
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub context: ExecutionContext,
    /// Installer invocation, present when the environment declares deps.
    pub install: Option<CommandSpec>,
    pub deps: Vec<String>,
    /// Externals to probe for on PATH before running. Absence warns.
    pub allowlist: Vec<String>,
    /// Commands with all placeholders expanded, in declared order.
    pub commands: Vec<CommandSpec>,
}

pub struct EnvironmentRunner<'a, E = ProcessExecutor> {
    config: &'a Config,
    executor: E,
}

impl<'a> EnvironmentRunner<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            executor: ProcessExecutor,
        }
    }
}

impl<'a, E: CommandExecutor> EnvironmentRunner<'a, E> {
    pub fn with_executor(config: &'a Config, executor: E) -> Self {
        Self { config, executor }
    }

    /// Resolve `env_name` against the configuration. Nothing runs and the
    /// filesystem is untouched; errors here mean zero commands executed.
    pub fn plan(&self, env_name: &str, posargs: &[String]) -> Result<RunPlan> {
        self.plan_with_parent_env(env_name, posargs, std::env::vars())
    }

    /// Like [`EnvironmentRunner::plan`] with an explicit parent environment
    /// snapshot instead of `std::env::vars()`.
    pub fn plan_with_parent_env<I>(
        &self,
        env_name: &str,
        posargs: &[String],
        parent_env: I,
    ) -> Result<RunPlan>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let env = self.config.environment(env_name)?;
        let context = ExecutionContext::new(env_name, env, self.config, parent_env);

        let install = if env.deps.is_empty() {
            None
        } else {
            let mut tokens = split_command_line(&self.config.settings.installer)?;
            if tokens.is_empty() {
                return Err(Error::ConfigError(
                    "settings.installer must not be empty".to_string(),
                ));
            }
            let program = tokens.remove(0);
            tokens.extend(env.deps.iter().cloned());
            Some(CommandSpec::new(program, tokens))
        };

        let sub = SubstitutionContext {
            env_name,
            env_dir: &context.env_dir,
            work_dir: &context.work_dir,
            config_dir: &context.config_dir,
            posargs,
            tools: &self.config.tools,
        };
        let mut commands = Vec::with_capacity(env.commands.len());
        for entry in &env.commands {
            let spec = CommandSpec::parse(entry)?;
            commands.push(substitution::expand_spec(&spec, &sub)?);
        }

        Ok(RunPlan {
            context,
            install,
            deps: env.deps.clone(),
            allowlist: env.allowlist_externals.clone(),
            commands,
        })
    }

    /// Plan and execute in one step.
    pub fn run(&self, env_name: &str, posargs: &[String]) -> Result<RunReport> {
        let plan = self.plan(env_name, posargs)?;
        self.execute_plan(&plan)
    }

    /// Execute a resolved plan: fresh directory, install, then commands.
    pub fn execute_plan(&self, plan: &RunPlan) -> Result<RunReport> {
        let ctx = &plan.context;
        let mut report = RunReport::new(ctx.env_name.as_str());

        info!("Preparing environment '{}'", ctx.env_name);
        ctx.prepare()?;
        self.check_externals(plan);

        if let Some(install) = &plan.install {
            info!(
                "Installing {} dep(s) into '{}'",
                plan.deps.len(),
                ctx.env_name
            );
            let (code, elapsed) = self.run_spec(install, ctx)?;
            if code == 0 {
                report.push(CommandRecord::new(
                    install.to_shell_string(),
                    CommandStatus::Passed,
                    elapsed,
                ));
                ctx.write_manifest(&self.config.settings.installer, &plan.deps)?;
            } else {
                report.push(CommandRecord::new(
                    install.to_shell_string(),
                    CommandStatus::Failed { code },
                    elapsed,
                ));
                for spec in &plan.commands {
                    report.push(CommandRecord::new(
                        spec.to_shell_string(),
                        CommandStatus::Skipped,
                        0,
                    ));
                }
                return Ok(report);
            }
        }

        let mut failed = false;
        for spec in &plan.commands {
            if failed {
                report.push(CommandRecord::new(
                    spec.to_shell_string(),
                    CommandStatus::Skipped,
                    0,
                ));
                continue;
            }

            debug!("Running: {}", spec.to_shell_string());
            let (code, elapsed) = self.run_spec(spec, ctx)?;
            let status = if code == 0 {
                CommandStatus::Passed
            } else if spec.continue_on_failure {
                warn!(
                    "Ignoring failure (exit {code}): {}",
                    spec.to_shell_string()
                );
                CommandStatus::Ignored { code }
            } else {
                failed = true;
                CommandStatus::Failed { code }
            };
            report.push(CommandRecord::new(spec.to_shell_string(), status, elapsed));
        }

        Ok(report)
    }

    /// Execute one spec, folding "program not found" into exit 127 the way
    /// a shell would.
    fn run_spec(&self, spec: &CommandSpec, ctx: &ExecutionContext) -> Result<(i32, u64)> {
        let started = Instant::now();
        let code = match self.executor.execute(spec, ctx) {
            Ok(code) => code,
            Err(Error::CommandNotFound { program }) => {
                warn!("Command not found: {program}");
                127
            }
            Err(e) => return Err(e),
        };
        Ok((code, started.elapsed().as_millis() as u64))
    }

    fn check_externals(&self, plan: &RunPlan) {
        if plan.allowlist.is_empty() {
            return;
        }
        let path_var = plan
            .context
            .env_vars
            .get("PATH")
            .map(String::as_str)
            .unwrap_or("");
        for external in &plan.allowlist {
            if find_in_path(external, path_var).is_none() {
                warn!("Allowlisted external '{external}' not found on PATH");
            }
        }
    }
}
