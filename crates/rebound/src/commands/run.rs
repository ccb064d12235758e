//! Run command

use anyhow::{anyhow, Result};
use camino::Utf8Path;
use rebound_core::retry::{RetryExecutorBuilder, TracingObserver};
use tokio::process::Command;

use crate::cli::RunArgs;
use crate::output;

pub async fn run(args: RunArgs, config_path: Option<&Utf8Path>) -> Result<()> {
    let config = super::load_config(config_path)?;
    let policy = args.policy.resolve(&config);

    let (program, program_args) = args
        .command
        .split_first()
        .ok_or_else(|| anyhow!("No command given"))?;

    let operation = args
        .policy
        .operation
        .clone()
        .unwrap_or_else(|| program.clone());

    let executor = RetryExecutorBuilder::new()
        .with_policy(policy)
        .with_observer(TracingObserver::new(operation))
        .build();

    let mut attempts = 0u32;
    let result = executor
        .execute(|| {
            attempts += 1;
            run_once(program, program_args)
        })
        .await;

    if let Err(e) = result {
        output::error(&format!("`{}` failed after {} attempts", program, attempts));
        return Err(e);
    }

    output::success(&format!(
        "`{}` succeeded on attempt {} of {}",
        program, attempts, policy.max_attempts
    ));
    Ok(())
}

/// Spawn the command once and wait for it; a non-zero exit is a failure
async fn run_once(program: &str, program_args: &[String]) -> Result<()> {
    let status = Command::new(program)
        .args(program_args)
        .status()
        .await
        .map_err(|e| anyhow!("failed to start `{}`: {}", program, e))?;

    if status.success() {
        Ok(())
    } else {
        Err(anyhow!("`{}` exited with {}", program, status))
    }
}
