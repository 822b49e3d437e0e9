use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("scoring model not found at path: {path}")]
    ModelNotFound { path: PathBuf },

    #[error("failed to load scoring model: {reason}")]
    ModelLoadFailed { reason: String },

    #[error("{device} device unavailable: {reason}")]
    DeviceUnavailable { device: String, reason: String },

    #[error("scoring invocation failed: {reason}")]
    ScoringFailed { reason: String },

    #[error(
        "scoring engine returned {actual} positions where {expected} were expected"
    )]
    ShapeMismatch { expected: usize, actual: usize },
}

impl From<candle_core::Error> for EngineError {
    fn from(err: candle_core::Error) -> Self {
        EngineError::ScoringFailed {
            reason: err.to_string(),
        }
    }
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::ModelLoadFailed {
            reason: err.to_string(),
        }
    }
}

/// Errors from the session pool.
#[derive(Debug, Error)]
pub enum PoolError {
    #[error("session pool capacity must be at least 1")]
    InvalidCapacity,

    #[error("no scoring session became available within {waited_ms} ms")]
    AcquireTimeout { waited_ms: u64 },

    #[error("session pool is shut down")]
    Closed,

    #[error(transparent)]
    Engine(#[from] EngineError),
}
