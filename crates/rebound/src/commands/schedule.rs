//! Schedule command

use anyhow::Result;
use camino::Utf8Path;
use rebound_core::retry::{delay_schedule, total_backoff};
use rebound_core::RetryPolicy;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use crate::cli::ScheduleArgs;
use crate::output;

/// Waits of a fully exhausted run, in milliseconds
#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
struct Schedule {
    max_attempts: u32,
    base_delay_ms: u64,
    delays_ms: Vec<u64>,
    total_ms: u64,
}

impl Schedule {
    fn for_policy(policy: &RetryPolicy) -> Self {
        Self {
            max_attempts: policy.max_attempts,
            base_delay_ms: policy.base_delay_ms,
            delays_ms: delay_schedule(policy).iter().map(|d| millis(*d)).collect(),
            total_ms: millis(total_backoff(policy)),
        }
    }
}

#[derive(Tabled)]
struct ScheduleRow {
    #[tabled(rename = "After attempt")]
    attempt: u32,
    #[tabled(rename = "Wait (ms)")]
    wait_ms: u64,
    #[tabled(rename = "Elapsed waiting (ms)")]
    cumulative_ms: u64,
}

fn millis(duration: std::time::Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

pub fn run(args: ScheduleArgs, config_path: Option<&Utf8Path>) -> Result<()> {
    let config = super::load_config(config_path)?;
    let policy = args.policy.resolve(&config);
    let schedule = Schedule::for_policy(&policy);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&schedule)?);
        return Ok(());
    }

    output::header("Retry schedule");
    output::kv("Max attempts", &schedule.max_attempts.to_string());
    output::kv("Base delay", &format!("{}ms", schedule.base_delay_ms));
    println!();

    if schedule.delays_ms.is_empty() {
        println!("Single attempt, no waits.");
    } else {
        let mut cumulative = 0u64;
        let rows: Vec<ScheduleRow> = schedule
            .delays_ms
            .iter()
            .zip(1..)
            .map(|(wait_ms, attempt)| {
                cumulative = cumulative.saturating_add(*wait_ms);
                ScheduleRow {
                    attempt,
                    wait_ms: *wait_ms,
                    cumulative_ms: cumulative,
                }
            })
            .collect();

        let mut table = Table::new(rows);
        table.with(Style::sharp());
        println!("{}", table);
    }

    output::kv("Total wait", &format!("{}ms", schedule.total_ms));
    Ok(())
}
