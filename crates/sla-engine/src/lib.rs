//! # sla-engine
//!
//! Deterministic business-hours arithmetic for SLA deadlines.
//!
//! Given a business-hours policy (a daily window plus the weekdays it applies
//! on), the engine computes when an SLA expires and how many business minutes
//! have elapsed between two instants, skipping nights, weekends, and any other
//! inactive weekdays. All functions are pure: no clock access, no I/O, no
//! shared state.
//!
//! ## Modules
//!
//! - [`policy`] — Validated `BusinessHoursPolicy` and its persisted record form
//! - [`calculator`] — Business-day checks, next business start, business-minute addition and counting
//! - [`sla`] — Due dates, elapsed minutes, deadlines and status with calendar-time fallback
//! - [`error`] — Error types

pub mod calculator;
pub mod error;
pub mod policy;
pub mod sla;

pub use calculator::BusinessHoursCalculator;
pub use error::{Result, SlaError};
pub use policy::{parse_time_of_day, parse_weekdays, BusinessHoursPolicy, PolicyRecord};
pub use sla::{
    calculate_due_date, calculate_due_date_utc, calculate_elapsed_minutes,
    calculate_elapsed_minutes_utc, compute_deadlines, parse_instant, sla_status, SlaDeadlines,
    SlaStatus, SlaTargets,
};
