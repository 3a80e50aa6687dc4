//! SLA due dates and elapsed time.
//!
//! Dispatches between plain calendar arithmetic and business-hours arithmetic
//! depending on whether a policy applies. This is the surface a ticketing
//! layer calls when it stamps `first_response_due` / `resolution_due` on a
//! ticket or shows how much of an SLA is left.
//!
//! The naive functions work on wall-clock [`NaiveDateTime`]s; the `_utc`
//! variants take and return [`DateTime<Utc>`] and evaluate the policy
//! against the UTC wall clock.

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::calculator::BusinessHoursCalculator;
use crate::error::{Result, SlaError};
use crate::policy::BusinessHoursPolicy;

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

// ── parse_instant ───────────────────────────────────────────────────────────

/// Parse a datetime string into a wall-clock instant.
///
/// RFC 3339 input with an offset is converted to UTC and the offset dropped.
/// Naive ISO 8601 input with a `T` or space separator and optional seconds
/// (`2026-03-18T16:00:00`, `2026-03-18 16:00:00.5`, `2026-03-18 16:00`) is
/// taken as is.
///
/// # Errors
///
/// Returns [`SlaError::InvalidDatetime`] if no format matches.
pub fn parse_instant(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_utc());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .ok_or_else(|| SlaError::InvalidDatetime(format!("'{s}'")))
}

// ── calculate_due_date ──────────────────────────────────────────────────────

/// The deadline `sla_minutes` after `created_at`.
///
/// With `use_business_hours` set and a policy supplied, only business minutes
/// count (see [`BusinessHoursCalculator::add_business_minutes`]). Otherwise
/// this is calendar addition and the policy is ignored entirely.
///
/// Calendar addition saturates at the ends of chrono's representable range.
pub fn calculate_due_date(
    created_at: NaiveDateTime,
    sla_minutes: i64,
    policy: Option<&BusinessHoursPolicy>,
    use_business_hours: bool,
) -> NaiveDateTime {
    match business_calculator(policy, use_business_hours) {
        Some(calc) => calc.add_business_minutes(created_at, sla_minutes),
        None => add_calendar_minutes(created_at, sla_minutes),
    }
}

/// [`calculate_due_date`] on UTC instants.
pub fn calculate_due_date_utc(
    created_at: DateTime<Utc>,
    sla_minutes: i64,
    policy: Option<&BusinessHoursPolicy>,
    use_business_hours: bool,
) -> DateTime<Utc> {
    let due = calculate_due_date(
        created_at.naive_utc(),
        sla_minutes,
        policy,
        use_business_hours,
    );
    due.and_utc()
}

// ── calculate_elapsed_minutes ───────────────────────────────────────────────

/// Minutes elapsed from `start` to `end`, never negative.
///
/// With `use_business_hours` set and a policy supplied, only business minutes
/// count. Otherwise this is whole calendar minutes, truncated. Either way an
/// `end` at or before `start` yields 0.
pub fn calculate_elapsed_minutes(
    start: NaiveDateTime,
    end: NaiveDateTime,
    policy: Option<&BusinessHoursPolicy>,
    use_business_hours: bool,
) -> i64 {
    match business_calculator(policy, use_business_hours) {
        Some(calc) => calc.business_minutes_between(start, end),
        None => (end - start).num_minutes().max(0),
    }
}

/// [`calculate_elapsed_minutes`] on UTC instants.
pub fn calculate_elapsed_minutes_utc(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    policy: Option<&BusinessHoursPolicy>,
    use_business_hours: bool,
) -> i64 {
    calculate_elapsed_minutes(
        start.naive_utc(),
        end.naive_utc(),
        policy,
        use_business_hours,
    )
}

// ── SLA targets ─────────────────────────────────────────────────────────────

/// Per-policy SLA durations, in minutes. A missing target means no deadline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlaTargets {
    pub first_response_minutes: Option<i64>,
    pub resolution_minutes: Option<i64>,
}

/// Deadlines derived from [`SlaTargets`] for one ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlaDeadlines {
    pub first_response_due: Option<NaiveDateTime>,
    pub resolution_due: Option<NaiveDateTime>,
}

/// Compute every deadline `targets` defines for a ticket created at
/// `created_at`.
pub fn compute_deadlines(
    created_at: NaiveDateTime,
    targets: &SlaTargets,
    policy: Option<&BusinessHoursPolicy>,
    use_business_hours: bool,
) -> SlaDeadlines {
    let due = |minutes: Option<i64>| {
        minutes.map(|m| calculate_due_date(created_at, m, policy, use_business_hours))
    };
    SlaDeadlines {
        first_response_due: due(targets.first_response_minutes),
        resolution_due: due(targets.resolution_minutes),
    }
}

// ── SLA status ──────────────────────────────────────────────────────────────

/// Where a running SLA clock stands at a given moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlaStatus {
    pub due: NaiveDateTime,
    /// Minutes counted from creation to `now`.
    pub elapsed_minutes: i64,
    /// Minutes left until `due`; negative once overdue.
    pub remaining_minutes: i64,
    /// `now` is strictly past `due`.
    pub breached: bool,
}

/// Evaluate an SLA clock at `now`.
///
/// ```
/// use chrono::NaiveDate;
/// use sla_engine::{sla_status, BusinessHoursPolicy};
///
/// let day = |d, h| NaiveDate::from_ymd_opt(2026, 3, d).unwrap().and_hms_opt(h, 0, 0).unwrap();
/// let policy = BusinessHoursPolicy::default();
/// // Created Wednesday 16:00, due Thursday 11:00, checked Thursday 10:00.
/// let status = sla_status(day(18, 16), day(19, 11), day(19, 10), Some(&policy), true);
/// assert_eq!(status.elapsed_minutes, 180);
/// assert_eq!(status.remaining_minutes, 60);
/// assert!(!status.breached);
/// ```
pub fn sla_status(
    created_at: NaiveDateTime,
    due: NaiveDateTime,
    now: NaiveDateTime,
    policy: Option<&BusinessHoursPolicy>,
    use_business_hours: bool,
) -> SlaStatus {
    let elapsed = |a, b| calculate_elapsed_minutes(a, b, policy, use_business_hours);
    let remaining_minutes = if now < due {
        elapsed(now, due)
    } else {
        -elapsed(due, now)
    };
    SlaStatus {
        due,
        elapsed_minutes: elapsed(created_at, now),
        remaining_minutes,
        breached: now > due,
    }
}

// ── Internal helpers ────────────────────────────────────────────────────────

fn business_calculator(
    policy: Option<&BusinessHoursPolicy>,
    use_business_hours: bool,
) -> Option<BusinessHoursCalculator> {
    policy
        .filter(|_| use_business_hours)
        .map(|p| BusinessHoursCalculator::new(*p))
}

fn add_calendar_minutes(at: NaiveDateTime, minutes: i64) -> NaiveDateTime {
    let saturated = if minutes < 0 {
        NaiveDateTime::MIN
    } else {
        NaiveDateTime::MAX
    };
    TimeDelta::try_minutes(minutes)
        .and_then(|delta| at.checked_add_signed(delta))
        .unwrap_or(saturated)
}
