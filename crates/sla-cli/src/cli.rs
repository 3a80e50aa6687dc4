//! Clap derive structures for the `sla` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// sla -- business-hours SLA arithmetic
#[derive(Debug, Parser)]
#[command(
    name = "sla",
    version,
    about = "Compute SLA due dates and elapsed business minutes",
    long_about = "Compute SLA due dates and elapsed business minutes under a\n\
        business-hours policy (daily window plus active weekdays).\n\n\
        Datetimes are RFC 3339 (converted to UTC) or naive ISO 8601.\n\
        Results are printed as JSON.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub policy: PolicyOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Policy Options ───────────────────────────────────────────────────

/// Business-hours policy. Flags override fields of the `--policy` record.
#[derive(Debug, Args)]
pub struct PolicyOpts {
    /// JSON policy record file
    #[arg(long, global = true, value_name = "FILE")]
    pub policy: Option<PathBuf>,

    /// Business day start (HH:MM)
    #[arg(long, env = "SLA_BUSINESS_START", global = true, value_name = "HH:MM")]
    pub start: Option<String>,

    /// Business day end (HH:MM)
    #[arg(long, env = "SLA_BUSINESS_END", global = true, value_name = "HH:MM")]
    pub end: Option<String>,

    /// Active ISO weekdays, Monday = 1 (e.g. 1,2,3,4,5)
    #[arg(
        long,
        env = "SLA_BUSINESS_DAYS",
        global = true,
        value_delimiter = ',',
        value_name = "DAYS"
    )]
    pub days: Option<Vec<i64>>,

    /// Use calendar time, ignoring business hours
    #[arg(long, global = true, conflicts_with = "business_hours")]
    pub calendar: bool,

    /// Count business hours only, even if the policy record says otherwise
    #[arg(long, global = true)]
    pub business_hours: bool,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Deadline N minutes after a start instant
    Due(DueArgs),

    /// Minutes elapsed between two instants
    Elapsed(ElapsedArgs),

    /// First-response and resolution deadlines from the policy record's targets
    Deadlines(DeadlinesArgs),

    /// Where an SLA clock stands at a given moment
    Status(StatusArgs),

    /// Business-hours facts about one instant
    Check(CheckArgs),

    /// Print the effective policy
    Policy,
}

#[derive(Debug, Args)]
pub struct DueArgs {
    /// Creation instant
    #[arg(long)]
    pub from: String,

    /// SLA duration in minutes
    #[arg(long, allow_negative_numbers = true)]
    pub minutes: i64,
}

#[derive(Debug, Args)]
pub struct ElapsedArgs {
    #[arg(long)]
    pub from: String,

    #[arg(long)]
    pub to: String,
}

#[derive(Debug, Args)]
pub struct DeadlinesArgs {
    /// Creation instant
    #[arg(long)]
    pub from: String,
}

#[derive(Debug, Args)]
pub struct StatusArgs {
    /// Creation instant
    #[arg(long)]
    pub from: String,

    /// Due instant
    #[arg(long)]
    pub due: String,

    /// Evaluation instant
    #[arg(long)]
    pub now: String,
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    #[arg(long)]
    pub at: String,
}
