//! Error types for sla-engine operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlaError {
    #[error("Invalid time of day: {0}")]
    InvalidTime(String),

    #[error("Invalid weekday: {0}")]
    InvalidWeekday(String),

    #[error("Invalid policy: {0}")]
    InvalidPolicy(String),

    #[error("Invalid datetime: {0}")]
    InvalidDatetime(String),

    #[error("Invalid policy record: {0}")]
    Json(String),
}

impl From<serde_json::Error> for SlaError {
    fn from(err: serde_json::Error) -> Self {
        SlaError::Json(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SlaError>;
