use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::{init_command, list_command, run_command};

#[derive(Parser, Debug)]
#[command(name = "envrun")]
#[command(version, about = "Declarative test environment runner", long_about = None)]
#[command(after_help = "ENVIRONMENT:\n    RUST_LOG=debug    Enable debug logging")]
pub struct Envrun {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run an environment's commands in order, stopping at the first failure
    #[command(visible_alias = "r")]
    Run {
        /// Environment to run; the configured default_env when omitted
        env: Option<String>,

        /// Path to the configuration file (discovered upward when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Show the resolved plan without executing anything
        #[arg(short, long)]
        dry_run: bool,

        /// Print the run report as JSON instead of formatted output
        #[arg(long)]
        json: bool,

        /// Arguments substituted for {posargs}, after `--`
        #[arg(last = true)]
        posargs: Vec<String>,
    },
    /// List the environments defined in the configuration
    #[command(visible_alias = "ls")]
    List {
        /// Path to the configuration file (discovered upward when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the list as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write a starter envrun.toml
    Init {
        /// Directory to write the configuration into (defaults to current directory)
        #[arg(long)]
        cwd: Option<String>,

        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

impl Commands {
    /// Execute the command
    pub fn execute(self) -> Result<()> {
        match self {
            Commands::Run {
                env,
                config,
                dry_run,
                json,
                posargs,
            } => run_command(env.as_deref(), config.as_deref(), dry_run, json, &posargs),
            Commands::List { config, json } => list_command(config.as_deref(), json),
            Commands::Init { cwd, force } => init_command(cwd.as_deref(), force),
        }
    }
}
