use anyhow::Result;
use envrun_core::{CommandStatus, EnvironmentRunner, RunPlan, RunReport};
use std::path::Path;
use tracing::debug;

use crate::utils::load_config;

pub fn run_command(
    env: Option<&str>,
    config_path: Option<&Path>,
    dry_run: bool,
    json: bool,
    posargs: &[String],
) -> Result<()> {
    let config = load_config(config_path)?;
    config.validate()?;

    let env_name = env.unwrap_or(&config.settings.default_env);
    debug!("Resolved environment: {}", env_name);

    let runner = EnvironmentRunner::new(&config);
    let plan = runner.plan(env_name, posargs)?;

    if dry_run {
        print_plan(&plan);
        return Ok(());
    }

    if !json {
        println!("🚀 Running environment '{env_name}'");
    }

    let report = runner.execute_plan(&plan)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if !report.succeeded() {
        std::process::exit(report.exit_code());
    }
    Ok(())
}

fn print_plan(plan: &RunPlan) {
    println!("🔍 Plan for environment '{}'", plan.context.env_name);
    println!("Working directory: {}", plan.context.cwd.display());
    println!("Environment directory: {}", plan.context.env_dir.display());
    if !plan.allowlist.is_empty() {
        println!("Allowlisted externals: {}", plan.allowlist.join(", "));
    }
    if let Some(install) = &plan.install {
        println!("  📦 {}", install.to_shell_string());
    }
    for spec in &plan.commands {
        println!("  • {}", spec.to_shell_string());
    }
}

fn print_report(report: &RunReport) {
    for record in &report.records {
        match record.status {
            CommandStatus::Passed => {
                println!("✅ {} ({}ms)", record.command, record.duration_ms)
            }
            CommandStatus::Failed { code } => {
                println!("❌ {} (exit {code})", record.command)
            }
            CommandStatus::Ignored { code } => {
                println!("⚠️  {} (exit {code}, ignored)", record.command)
            }
            CommandStatus::Skipped => println!("⏭️  {} (skipped)", record.command),
        }
    }

    if report.succeeded() {
        println!(
            "\n✅ Environment '{}' passed ({} command(s) in {}ms)",
            report.env_name,
            report.records.len(),
            report.total_duration_ms()
        );
    } else if let Some(failure) = report.failure() {
        println!(
            "\n❌ Environment '{}' failed at: {}",
            report.env_name, failure.command
        );
    }
}
