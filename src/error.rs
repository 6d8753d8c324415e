use chrono::NaiveDateTime;
use thiserror::Error;

/// Failures that abort an observability computation.
///
/// Malformed catalog angles and astronomically degenerate nights are not
/// errors: they surface as [`crate::ParsedAngle::Missing`] and
/// [`crate::EventTime`] variants respectively.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ObservabilityError {
    #[error("unknown timezone '{0}'")]
    UnknownTimezone(String),

    #[error("latitude {0} out of range [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("longitude {0} out of range [-180, 180]")]
    LongitudeOutOfRange(f64),

    #[error("declination {0} out of range [-90, 90]")]
    DeclinationOutOfRange(f64),

    #[error("sampling interval must be 1..=1440 minutes, got {0}")]
    InvalidSamplingInterval(i64),

    #[error("event search step must be 1..=1440 minutes, got {0}")]
    InvalidSearchStep(i64),

    #[error("local time {local} does not exist in timezone {timezone}")]
    NonexistentLocalTime {
        local: NaiveDateTime,
        timezone: String,
    },

    #[error("numerical failure: {0}")]
    Numerical(String),
}

pub type Result<T> = std::result::Result<T, ObservabilityError>;
