//! Business-hours calendar arithmetic.
//!
//! [`BusinessHoursCalculator`] answers five questions about an instant under a
//! [`BusinessHoursPolicy`]: is it a business day, is it inside business hours,
//! when does the next business period start, when does its business day end,
//! and how far do N business minutes reach. It also counts the business
//! minutes between two instants.
//!
//! Instants are [`NaiveDateTime`] wall-clock values. No timezone conversion
//! happens here; callers pass whatever clock their policy is expressed in.
//!
//! Every operation is total. Minute counts are whole minutes: partial minutes
//! are truncated, never rounded up.

use chrono::{Datelike, Days, NaiveDateTime, TimeDelta};

use crate::policy::BusinessHoursPolicy;

/// Pure business-hours arithmetic over one immutable policy.
///
/// Cheap to copy; build one per policy and pass it by reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessHoursCalculator {
    policy: BusinessHoursPolicy,
}

impl BusinessHoursCalculator {
    pub fn new(policy: BusinessHoursPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &BusinessHoursPolicy {
        &self.policy
    }

    /// Whether `instant` falls on an active weekday.
    pub fn is_business_day(&self, instant: NaiveDateTime) -> bool {
        self.policy.is_active(instant.weekday())
    }

    /// Whether `instant` is inside the business window of a business day.
    ///
    /// The start boundary is inclusive and the end boundary exclusive: at
    /// exactly `end_time` the business day is already over.
    pub fn is_business_hours(&self, instant: NaiveDateTime) -> bool {
        let time = instant.time();
        self.is_business_day(instant)
            && self.policy.start_time() <= time
            && time < self.policy.end_time()
    }

    /// The earliest instant at or after `instant` that is inside business
    /// hours.
    ///
    /// An instant already inside business hours is returned unchanged. Before
    /// the window opens on a business day this is the same day's start time;
    /// otherwise it is `start_time` on the next active weekday.
    ///
    /// At the very end of chrono's representable calendar, where no later
    /// business day exists, `instant` itself is returned. That is the only
    /// case in which the result is not inside business hours.
    /// [`add_business_minutes`](Self::add_business_minutes) and
    /// [`business_minutes_between`](Self::business_minutes_between) count no
    /// business time there.
    pub fn next_business_start(&self, instant: NaiveDateTime) -> NaiveDateTime {
        self.find_business_start(instant).unwrap_or(instant)
    }

    /// `end_time` on the calendar date of `instant`, business day or not.
    pub fn business_end_of_day(&self, instant: NaiveDateTime) -> NaiveDateTime {
        instant.date().and_time(self.policy.end_time())
    }

    /// Advance `start` by `minutes` business minutes.
    ///
    /// Zero or negative `minutes` returns `start` unchanged. Otherwise the
    /// clock starts at [`next_business_start`](Self::next_business_start) and
    /// only runs inside business windows. A deadline that exhausts a day
    /// exactly lands on that day's `end_time`.
    ///
    /// A deadline that needs business time beyond the representable calendar
    /// saturates to [`NaiveDateTime::MAX`].
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use sla_engine::{BusinessHoursCalculator, BusinessHoursPolicy};
    ///
    /// let calc = BusinessHoursCalculator::new(BusinessHoursPolicy::default());
    /// // Friday 17:30 + 60 business minutes = Monday 09:30
    /// let friday = NaiveDate::from_ymd_opt(2026, 3, 20).unwrap().and_hms_opt(17, 30, 0).unwrap();
    /// let due = calc.add_business_minutes(friday, 60);
    /// assert_eq!(due.to_string(), "2026-03-23 09:30:00");
    /// ```
    pub fn add_business_minutes(&self, start: NaiveDateTime, minutes: i64) -> NaiveDateTime {
        if minutes <= 0 {
            return start;
        }

        let Some(mut current) = self.find_business_start(start) else {
            return NaiveDateTime::MAX;
        };
        let mut remaining = minutes;
        loop {
            let left_today = self.minutes_left_today(current);
            if remaining <= left_today {
                return current + TimeDelta::minutes(remaining);
            }
            remaining -= left_today;

            match self.roll_over(current) {
                Some(next) => current = next,
                None => return NaiveDateTime::MAX,
            }
        }
    }

    /// Business minutes elapsed from `start` to `end`.
    ///
    /// Returns 0 when `end <= start`. Time outside business windows does not
    /// count, including any part of `start`'s day before the window opens.
    pub fn business_minutes_between(&self, start: NaiveDateTime, end: NaiveDateTime) -> i64 {
        if end <= start {
            return 0;
        }

        let Some(mut current) = self.find_business_start(start) else {
            return 0;
        };
        let mut total = 0;
        while current < end {
            let day_end = self.business_end_of_day(current);
            if day_end >= end {
                total += (end.time() - current.time()).num_minutes().max(0);
                break;
            }
            total += self.minutes_left_today(current);

            match self.roll_over(current) {
                Some(next) => current = next,
                None => break,
            }
        }
        total
    }

    /// Whole minutes from `current`'s time of day to `end_time`, floored at 0.
    fn minutes_left_today(&self, current: NaiveDateTime) -> i64 {
        (self.policy.end_time() - current.time()).num_minutes().max(0)
    }

    /// Earliest business instant at or after `instant`, or `None` once the
    /// calendar has run out.
    fn find_business_start(&self, instant: NaiveDateTime) -> Option<NaiveDateTime> {
        if self.is_business_hours(instant) {
            return Some(instant);
        }

        let start = self.policy.start_time();
        let date = instant.date();
        if self.is_business_day(instant) && instant.time() < start {
            return Some(date.and_time(start));
        }

        // A non-empty weekday set guarantees a hit within a week.
        (1..=7)
            .filter_map(|offset| date.checked_add_days(Days::new(offset)))
            .find(|day| self.policy.is_active(day.weekday()))
            .map(|day| day.and_time(start))
    }

    /// The business period following the one `current` is in.
    fn roll_over(&self, current: NaiveDateTime) -> Option<NaiveDateTime> {
        self.find_business_start(self.business_end_of_day(current) + TimeDelta::seconds(1))
    }
}

impl From<BusinessHoursPolicy> for BusinessHoursCalculator {
    fn from(policy: BusinessHoursPolicy) -> Self {
        Self::new(policy)
    }
}
