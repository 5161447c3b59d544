use core_restriction::RestrictionError;
use std::time::SystemTimeError;
use thiserror::Error;

/// Main errors for the `app-utils` crate.
#[derive(Error, Debug)]
pub enum Error {
    /// System clock is before the Unix epoch
    #[error("System time error: {0}")]
    SystemTime(#[from] SystemTimeError),

    /// YAML input could not be parsed
    #[error("YAML parsing failed: {0}")]
    YamlParseError(String),

    /// Parsed site data failed catalog validation
    #[error("Invalid site: {0}")]
    Restriction(#[from] RestrictionError),

    /// Timestamp is neither Unix seconds nor a supported date
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// File extension does not name a known site format
    #[error("Unsupported site format: {0}")]
    UnsupportedFormat(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
