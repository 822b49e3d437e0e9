use thiserror::Error;

use crate::encoding::EncodingError;
use crate::engine::{EngineError, PoolError};

/// Everything `predict` can fail with.
///
/// Pool and engine failures pass through unmodified; text-processing
/// failures are deterministic functions of the input.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error(transparent)]
    Pool(#[from] PoolError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("answer references vocabulary index {index} out of range")]
    AnswerOutOfVocabulary { index: u32 },
}
