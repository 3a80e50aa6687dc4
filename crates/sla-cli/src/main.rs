mod cli;

use std::fs;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use clap::Parser;
use serde::Serialize;
use sla_engine::{
    calculate_due_date, calculate_elapsed_minutes, compute_deadlines, parse_instant, sla_status,
    BusinessHoursCalculator, BusinessHoursPolicy, PolicyRecord, SlaTargets,
};

use crate::cli::{Cli, Command, PolicyOpts};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let effective = load_policy(&cli.policy)?;
    let output = run(&cli.command, &effective)?;
    println!("{output}");
    Ok(())
}

/// The validated policy the command runs under.
struct EffectivePolicy {
    policy: BusinessHoursPolicy,
    business_hours: bool,
    targets: SlaTargets,
}

/// Layer inline flags over the `--policy` record (or the defaults), then
/// validate once.
fn load_policy(opts: &PolicyOpts) -> Result<EffectivePolicy> {
    let mut record = match &opts.policy {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read policy file {}", path.display()))?;
            serde_json::from_str::<PolicyRecord>(&text)
                .with_context(|| format!("failed to parse policy file {}", path.display()))?
        }
        None => PolicyRecord::default(),
    };

    if let Some(start) = &opts.start {
        record.business_start = start.clone();
    }
    if let Some(end) = &opts.end {
        record.business_end = end.clone();
    }
    if let Some(days) = &opts.days {
        record.business_days = days.clone();
    }
    if opts.calendar {
        record.business_hours_only = false;
    }
    if opts.business_hours {
        record.business_hours_only = true;
    }

    let (policy, business_hours, targets) = record
        .into_parts()
        .context("invalid business-hours policy")?;
    Ok(EffectivePolicy {
        policy,
        business_hours,
        targets,
    })
}

// ── Command output ───────────────────────────────────────────────────

#[derive(Serialize)]
struct DueOutput {
    created_at: NaiveDateTime,
    minutes: i64,
    due: NaiveDateTime,
    business_hours: bool,
}

#[derive(Serialize)]
struct ElapsedOutput {
    start: NaiveDateTime,
    end: NaiveDateTime,
    minutes: i64,
    business_hours: bool,
}

#[derive(Serialize)]
struct CheckOutput {
    at: NaiveDateTime,
    weekday: String,
    is_business_day: bool,
    is_business_hours: bool,
    next_business_start: NaiveDateTime,
    business_end_of_day: NaiveDateTime,
}

#[derive(Serialize)]
struct PolicyOutput {
    #[serde(flatten)]
    record: PolicyRecord,
    business_minutes_per_day: i64,
}

fn run(command: &Command, effective: &EffectivePolicy) -> Result<String> {
    let policy = Some(&effective.policy);
    let business_hours = effective.business_hours;

    let value = match command {
        Command::Due(args) => {
            let created_at = instant(&args.from, "--from")?;
            let due = calculate_due_date(created_at, args.minutes, policy, business_hours);
            serde_json::to_value(DueOutput {
                created_at,
                minutes: args.minutes,
                due,
                business_hours,
            })?
        }
        Command::Elapsed(args) => {
            let start = instant(&args.from, "--from")?;
            let end = instant(&args.to, "--to")?;
            serde_json::to_value(ElapsedOutput {
                start,
                end,
                minutes: calculate_elapsed_minutes(start, end, policy, business_hours),
                business_hours,
            })?
        }
        Command::Deadlines(args) => {
            let created_at = instant(&args.from, "--from")?;
            serde_json::to_value(compute_deadlines(
                created_at,
                &effective.targets,
                policy,
                business_hours,
            ))?
        }
        Command::Status(args) => {
            let created_at = instant(&args.from, "--from")?;
            let due = instant(&args.due, "--due")?;
            let now = instant(&args.now, "--now")?;
            serde_json::to_value(sla_status(created_at, due, now, policy, business_hours))?
        }
        Command::Check(args) => {
            let at = instant(&args.at, "--at")?;
            let calc = BusinessHoursCalculator::new(effective.policy);
            serde_json::to_value(CheckOutput {
                at,
                weekday: at.format("%A").to_string(),
                is_business_day: calc.is_business_day(at),
                is_business_hours: calc.is_business_hours(at),
                next_business_start: calc.next_business_start(at),
                business_end_of_day: calc.business_end_of_day(at),
            })?
        }
        Command::Policy => {
            let record = PolicyRecord {
                business_hours_only: business_hours,
                first_response_minutes: effective.targets.first_response_minutes,
                resolution_minutes: effective.targets.resolution_minutes,
                ..PolicyRecord::from(effective.policy)
            };
            serde_json::to_value(PolicyOutput {
                record,
                business_minutes_per_day: effective.policy.business_minutes_per_day(),
            })?
        }
    };

    Ok(serde_json::to_string_pretty(&value)?)
}

fn instant(s: &str, flag: &str) -> Result<NaiveDateTime> {
    parse_instant(s).with_context(|| format!("bad {flag} value"))
}
