use chrono::NaiveDate;
use thiserror::Error;

pub type ScopeResult<T> = Result<T, ScopeError>;

#[derive(Debug, Error)]
pub enum ScopeError {
    #[error("missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("invalid date range: start={start}, end={end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid view config: {0}")]
    InvalidConfig(String),

    #[error("upstream failure: {0}")]
    Upstream(String),

    #[error("invalid data: {0}")]
    InvalidData(String),
}
