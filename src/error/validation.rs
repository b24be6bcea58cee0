use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing base URL (set --base-url or provide in config).")]
    MissingBaseUrl,
    #[error("Missing username (set --username or provide in config).")]
    MissingUsername,
    #[error("Missing password (set --password or provide in config).")]
    MissingPassword,
    #[error("Value must be at least {min}.")]
    ValueTooSmall { min: u64 },
    #[error("Invalid number: {source}")]
    InvalidNumber {
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Invalid think time '{value}'. Expected min-max seconds (e.g., 1-5).")]
    InvalidThinkTime { value: String },
    #[error("Think time minimum must be <= maximum.")]
    ThinkTimeReversed,
    #[error("Duration must not be empty.")]
    DurationEmpty,
    #[error("Invalid duration '{value}'.")]
    InvalidDurationFormat { value: String },
    #[error("Invalid duration '{value}': {source}")]
    InvalidDurationNumber {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Invalid duration unit '{unit}'.")]
    InvalidDurationUnit { unit: String },
    #[error("Duration overflow.")]
    DurationOverflow,
    #[error("Duration must be > 0.")]
    DurationZero,
    #[error("Run finished with runtime errors.")]
    RuntimeErrors,
}
