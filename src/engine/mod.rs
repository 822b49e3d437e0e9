//! Scoring engine seam and session pooling.
//!
//! The engine itself is opaque: it consumes the four fixed-shape sequences of
//! an [`EncodedInput`](crate::encoding::EncodedInput) and returns per-position
//! start/end scores. Engines are not assumed safe for concurrent calls
//! through one handle, only for concurrent calls through distinct sessions
//! backed by one shared immutable model, so all scoring goes through the
//! bounded [`SessionPool`].
//!
//! [`BertQaEngine`] binds a BERT checkpoint via Candle;
//! [`StubScoringEngine`] produces deterministic scores for tests and
//! examples without model files.

/// Candle BERT span-scoring binding.
pub mod bert;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
mod error;
mod pool;
mod stub;

#[cfg(test)]
mod tests;

pub use bert::BertQaEngine;
pub use error::{EngineError, PoolError};
pub use pool::{PoolConfig, PooledSession, SessionPool};
pub use stub::{StubScoringEngine, StubSession};

use crate::constants::MAX_SEQUENCE_LENGTH;
use crate::encoding::EncodedInput;

/// Per-position answer-boundary scores returned by a scoring engine.
///
/// Both vectors have length [`MAX_SEQUENCE_LENGTH`]; for the BERT-SQuAD ONNX
/// export they correspond to the `unstack:0` (start) and `unstack:1` (end)
/// graph outputs, with `unique_ids:0` echoing the request identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct ScorePrediction {
    /// Likelihood of each position being the answer start.
    pub start_scores: Vec<f32>,
    /// Likelihood of each position being the answer end.
    pub end_scores: Vec<f32>,
    /// Request identifier echoed from the input.
    pub unique_id: i64,
}

impl ScorePrediction {
    /// Validates that both score vectors have the fixed sequence length.
    pub fn validate(&self) -> Result<(), EngineError> {
        for scores in [&self.start_scores, &self.end_scores] {
            if scores.len() != MAX_SEQUENCE_LENGTH {
                return Err(EngineError::ShapeMismatch {
                    expected: MAX_SEQUENCE_LENGTH,
                    actual: scores.len(),
                });
            }
        }
        Ok(())
    }
}

/// A scoring engine: shared, immutable, able to mint per-request sessions.
pub trait ScoringEngine: Send + Sync + 'static {
    /// The exclusive execution handle type.
    type Session: ScoringSession;

    /// Constructs a fresh session against the shared model.
    fn create_session(&self) -> Result<Self::Session, EngineError>;
}

/// An exclusive scoring handle. One in-flight call at a time; reuse across
/// requests is mediated by [`SessionPool`].
pub trait ScoringSession: Send + 'static {
    /// Runs one scoring call over an encoded input.
    fn score(&mut self, input: &EncodedInput) -> Result<ScorePrediction, EngineError>;
}
