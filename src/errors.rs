use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DebtError {
    #[error("schema error at {field}: {message}")]
    Schema {
        field: String,
        message: String,
    },

    #[error("invalid timestamp in {field}: {value}")]
    TimestampParse {
        field: String,
        value: String,
    },

    #[error("rate timeline has no entries")]
    EmptyTimeline,

    #[error("no reference rate defined for {at}")]
    NoRateDefined {
        at: DateTime<Utc>,
    },

    #[error("as-of {as_of} is before registration date {registration}")]
    InvalidAsOf {
        as_of: DateTime<Utc>,
        registration: NaiveDate,
    },

    #[error("invalid date: {message}")]
    InvalidDate {
        message: String,
    },

    #[error("arithmetic overflow computing {operation}")]
    Overflow {
        operation: String,
    },

    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),
}

impl DebtError {
    pub(crate) fn schema(field: impl Into<String>, message: impl Into<String>) -> Self {
        DebtError::Schema {
            field: field.into(),
            message: message.into(),
        }
    }

    pub(crate) fn timestamp(field: impl Into<String>, value: impl Into<String>) -> Self {
        DebtError::TimestampParse {
            field: field.into(),
            value: value.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DebtError>;
