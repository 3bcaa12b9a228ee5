//! CLI for rerun: run a command and retry it on transient failure.

mod commands;
pub mod exit_status;
mod retry_args;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rerun_core::config;
use std::time::Duration;

use commands::{run_exec, run_show_config};
pub use retry_args::RetryArgs;

/// Top-level CLI for rerun.
#[derive(Debug, Parser)]
#[command(name = "rerun")]
#[command(
    about = "rerun: run a command, retrying transient failures with backoff",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Run a command, retrying it while it fails with a retryable exit status.
    Exec {
        #[command(flatten)]
        retry: RetryArgs,

        /// Kill an attempt that runs longer than this many seconds (counts as `timeout`).
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,

        /// Program to run, followed by its arguments.
        #[arg(
            required = true,
            trailing_var_arg = true,
            allow_hyphen_values = true,
            value_name = "COMMAND"
        )]
        command: Vec<String>,
    },

    /// Show the effective retry configuration and backoff schedule.
    Config {
        #[command(flatten)]
        retry: RetryArgs,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Exec {
                retry,
                timeout,
                command,
            } => {
                let policy = retry.resolve(&cfg.retry)?;
                let timeout = timeout.or(cfg.attempt_timeout_secs).map(Duration::from_secs);
                run_exec(&policy, timeout, &command).await?;
            }
            CliCommand::Config { retry } => {
                let policy = retry.resolve(&cfg.retry)?;
                run_show_config(&policy, cfg.attempt_timeout_secs)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
