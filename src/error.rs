use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptimizeError {
    #[error("invalid date range: end {end} precedes start {start}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl OptimizeError {
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter(message.into())
    }
}
