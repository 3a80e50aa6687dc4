//! Business-hours policy: the validated value object every calculation runs
//! against, and the loosely typed record it is loaded from.
//!
//! Configuration is parsed and validated exactly once, here. A
//! [`BusinessHoursPolicy`] that exists is always well formed: its start time
//! is strictly before its end time and at least one weekday is active. The
//! calculator relies on both facts and never re-checks them.
//!
//! # Record format
//!
//! ```json
//! {
//!   "business_start": "09:00",
//!   "business_end": "18:00",
//!   "business_days": [1, 2, 3, 4, 5],
//!   "business_hours_only": true
//! }
//! ```
//!
//! Weekdays use ISO numbering (Monday = 1 … Sunday = 7).

use std::str::FromStr;

use chrono::{NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlaError};
use crate::sla::SlaTargets;

const DEFAULT_START: &str = "09:00";
const DEFAULT_END: &str = "18:00";

// ── BusinessHoursPolicy ─────────────────────────────────────────────────────

/// A daily business window applied on a fixed set of weekdays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "PolicyRecord")]
pub struct BusinessHoursPolicy {
    start_time: NaiveTime,
    end_time: NaiveTime,
    /// Indexed by `Weekday::num_days_from_monday`.
    active_days: [bool; 7],
    minutes_per_day: i64,
}

impl BusinessHoursPolicy {
    /// Build a policy from a daily window and the weekdays it applies on.
    ///
    /// Seconds and sub-seconds in `start_time` / `end_time` are dropped; the
    /// policy works at minute precision. Duplicate weekdays are collapsed.
    ///
    /// # Errors
    ///
    /// Returns [`SlaError::InvalidPolicy`] if `start_time` is not strictly
    /// before `end_time`, or if `weekdays` is empty.
    pub fn new(
        start_time: NaiveTime,
        end_time: NaiveTime,
        weekdays: impl IntoIterator<Item = Weekday>,
    ) -> Result<Self> {
        let start_time = truncate_to_minute(start_time);
        let end_time = truncate_to_minute(end_time);

        if start_time >= end_time {
            return Err(SlaError::InvalidPolicy(format!(
                "business start {} must be before business end {}",
                start_time.format("%H:%M"),
                end_time.format("%H:%M")
            )));
        }

        let mut active_days = [false; 7];
        for day in weekdays {
            active_days[day.num_days_from_monday() as usize] = true;
        }
        if !active_days.iter().any(|&d| d) {
            return Err(SlaError::InvalidPolicy(
                "at least one business day is required".to_string(),
            ));
        }

        Ok(Self {
            start_time,
            end_time,
            active_days,
            minutes_per_day: (end_time - start_time).num_minutes(),
        })
    }

    /// Build a policy from `"HH:MM"` strings and ISO weekday numbers.
    ///
    /// ```
    /// use sla_engine::BusinessHoursPolicy;
    ///
    /// let policy = BusinessHoursPolicy::from_strings("09:00", "18:00", &[1, 2, 3, 4, 5]).unwrap();
    /// assert_eq!(policy.business_minutes_per_day(), 540);
    /// ```
    pub fn from_strings(start: &str, end: &str, days: &[i64]) -> Result<Self> {
        let start_time = parse_time_of_day(start)?;
        let end_time = parse_time_of_day(end)?;
        let weekdays = parse_weekdays(days)?;
        Self::new(start_time, end_time, weekdays)
    }

    pub fn start_time(&self) -> NaiveTime {
        self.start_time
    }

    pub fn end_time(&self) -> NaiveTime {
        self.end_time
    }

    /// Length of one business day in minutes (`end_time - start_time`).
    pub fn business_minutes_per_day(&self) -> i64 {
        self.minutes_per_day
    }

    /// Whether business hours apply on `day`.
    pub fn is_active(&self, day: Weekday) -> bool {
        self.active_days[day.num_days_from_monday() as usize]
    }

    /// Active weekdays, Monday first.
    pub fn active_weekdays(&self) -> Vec<Weekday> {
        WEEK.iter().copied().filter(|&d| self.is_active(d)).collect()
    }
}

impl Default for BusinessHoursPolicy {
    /// Monday to Friday, 09:00 to 18:00.
    fn default() -> Self {
        let start_time = NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN);
        let end_time = NaiveTime::from_hms_opt(18, 0, 0).unwrap_or(NaiveTime::MIN);
        Self {
            start_time,
            end_time,
            active_days: [true, true, true, true, true, false, false],
            minutes_per_day: (end_time - start_time).num_minutes(),
        }
    }
}

impl FromStr for BusinessHoursPolicy {
    type Err = SlaError;

    /// Parse a JSON policy record.
    fn from_str(s: &str) -> Result<Self> {
        let record: PolicyRecord = serde_json::from_str(s)?;
        Self::try_from(record)
    }
}

impl TryFrom<PolicyRecord> for BusinessHoursPolicy {
    type Error = SlaError;

    fn try_from(record: PolicyRecord) -> Result<Self> {
        Self::from_strings(
            &record.business_start,
            &record.business_end,
            &record.business_days,
        )
    }
}

// ── PolicyRecord ────────────────────────────────────────────────────────────

/// The persisted, loosely typed form of an SLA policy.
///
/// Missing fields take the defaults of [`BusinessHoursPolicy::default`].
/// Convert with [`BusinessHoursPolicy::try_from`] or
/// [`PolicyRecord::into_parts`]; nothing downstream consumes a raw record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyRecord {
    #[serde(default = "default_start")]
    pub business_start: String,
    #[serde(default = "default_end")]
    pub business_end: String,
    #[serde(default = "default_days")]
    pub business_days: Vec<i64>,
    #[serde(default = "default_business_hours_only")]
    pub business_hours_only: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_response_minutes: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution_minutes: Option<i64>,
}

impl Default for PolicyRecord {
    fn default() -> Self {
        Self {
            business_start: default_start(),
            business_end: default_end(),
            business_days: default_days(),
            business_hours_only: default_business_hours_only(),
            first_response_minutes: None,
            resolution_minutes: None,
        }
    }
}

impl PolicyRecord {
    /// Validate the whole record.
    ///
    /// Returns the business-hours window, whether SLA clocks run on business
    /// hours only, and the SLA targets.
    ///
    /// # Errors
    ///
    /// Any window error from [`BusinessHoursPolicy::from_strings`], or
    /// [`SlaError::InvalidPolicy`] for a negative SLA target.
    pub fn into_parts(self) -> Result<(BusinessHoursPolicy, bool, SlaTargets)> {
        for (name, value) in [
            ("first_response_minutes", self.first_response_minutes),
            ("resolution_minutes", self.resolution_minutes),
        ] {
            if let Some(minutes) = value.filter(|m| *m < 0) {
                return Err(SlaError::InvalidPolicy(format!(
                    "{name} must not be negative, got {minutes}"
                )));
            }
        }

        let targets = SlaTargets {
            first_response_minutes: self.first_response_minutes,
            resolution_minutes: self.resolution_minutes,
        };
        let business_hours_only = self.business_hours_only;
        let policy = BusinessHoursPolicy::try_from(self)?;
        Ok((policy, business_hours_only, targets))
    }
}

impl From<BusinessHoursPolicy> for PolicyRecord {
    fn from(policy: BusinessHoursPolicy) -> Self {
        Self {
            business_start: policy.start_time.format("%H:%M").to_string(),
            business_end: policy.end_time.format("%H:%M").to_string(),
            business_days: policy
                .active_weekdays()
                .into_iter()
                .map(|d| i64::from(d.number_from_monday()))
                .collect(),
            business_hours_only: true,
            first_response_minutes: None,
            resolution_minutes: None,
        }
    }
}

fn default_start() -> String {
    DEFAULT_START.to_string()
}

fn default_end() -> String {
    DEFAULT_END.to_string()
}

fn default_days() -> Vec<i64> {
    vec![1, 2, 3, 4, 5]
}

fn default_business_hours_only() -> bool {
    true
}

// ── Parsing helpers ─────────────────────────────────────────────────────────

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Parse a `"HH:MM"` time of day.
///
/// The hour may be one or two digits (0–23); the minute is exactly two
/// digits (00–59). `"24:00"` is rejected.
///
/// # Errors
///
/// Returns [`SlaError::InvalidTime`] on malformed or out-of-range input.
pub fn parse_time_of_day(s: &str) -> Result<NaiveTime> {
    let trimmed = s.trim();
    let invalid = || SlaError::InvalidTime(format!("'{s}', expected HH:MM"));

    let (hour, minute) = trimmed.split_once(':').ok_or_else(invalid)?;
    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(hour) || hour.len() > 2 || !all_digits(minute) || minute.len() != 2 {
        return Err(invalid());
    }

    let hour: u32 = hour.parse().map_err(|_| invalid())?;
    let minute: u32 = minute.parse().map_err(|_| invalid())?;
    NaiveTime::from_hms_opt(hour, minute, 0)
        .ok_or_else(|| SlaError::InvalidTime(format!("'{s}' is out of range")))
}

/// Map ISO weekday numbers (Monday = 1 … Sunday = 7) to [`Weekday`]s.
///
/// Duplicates are kept; [`BusinessHoursPolicy::new`] collapses them.
///
/// # Errors
///
/// Returns [`SlaError::InvalidWeekday`] for any number outside 1–7.
pub fn parse_weekdays(days: &[i64]) -> Result<Vec<Weekday>> {
    days.iter()
        .map(|&n| match n {
            1..=7 => Ok(WEEK[(n - 1) as usize]),
            _ => Err(SlaError::InvalidWeekday(format!(
                "{n}, expected 1 (Monday) through 7 (Sunday)"
            ))),
        })
        .collect()
}

fn truncate_to_minute(t: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(t.hour(), t.minute(), 0).unwrap_or(t)
}
