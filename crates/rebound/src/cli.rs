//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use rebound_core::{RetryConfig, RetryPolicy};

/// rebound - retry commands with exponential backoff
#[derive(Parser, Debug)]
#[command(name = "rebound")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a retry.yaml config file (defaults to ~/.rebound/retry.yaml)
    #[arg(short, long, global = true)]
    pub config: Option<Utf8PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a command, retrying it with exponential backoff until it succeeds
    Run(RunArgs),

    /// Show the waits a policy produces when every attempt fails
    Schedule(ScheduleArgs),

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Policy selection shared by commands that resolve a retry policy
#[derive(Args, Debug, Clone, Default)]
pub struct PolicyArgs {
    /// Named operation policy from the configuration
    #[arg(short, long)]
    pub operation: Option<String>,

    /// Maximum number of attempts (overrides configuration)
    #[arg(short = 'n', long, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_attempts: Option<u32>,

    /// Delay before the second attempt in milliseconds (overrides configuration)
    #[arg(short = 'd', long)]
    pub base_delay_ms: Option<u64>,
}

impl PolicyArgs {
    /// Resolve the effective policy: named operation (or default), then flags
    pub fn resolve(&self, config: &RetryConfig) -> RetryPolicy {
        let mut policy = match &self.operation {
            Some(name) => *config.policy_for(name),
            None => config.default,
        };

        if let Some(max_attempts) = self.max_attempts {
            policy.max_attempts = max_attempts;
        }
        if let Some(base_delay_ms) = self.base_delay_ms {
            policy.base_delay_ms = base_delay_ms;
        }

        policy
    }
}

// Run command
#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub policy: PolicyArgs,

    /// Command to run, followed by its arguments
    #[arg(required = true, last = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

// Schedule command
#[derive(Args, Debug)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub policy: PolicyArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// Config commands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show resolved configuration
    Show(ConfigShowArgs),
}

#[derive(Args, Debug)]
pub struct ConfigShowArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
