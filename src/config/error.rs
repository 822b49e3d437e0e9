use std::num::ParseIntError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid pool capacity {value:?}: {source}")]
    CapacityParseError {
        value: String,
        source: ParseIntError,
    },

    #[error("pool capacity must be at least 1, got {value}")]
    InvalidCapacity { value: String },

    #[error("invalid acquire timeout {value:?}: {source}")]
    TimeoutParseError {
        value: String,
        source: ParseIntError,
    },

    #[error("invalid truncation policy {value:?} (expected \"truncate\" or \"reject\")")]
    InvalidTruncationPolicy { value: String },

    #[error("invalid boolean {value:?} for {var} (expected \"true\" or \"false\")")]
    InvalidBool { var: &'static str, value: String },

    #[error("path not found: {path}")]
    PathNotFound { path: std::path::PathBuf },
}
