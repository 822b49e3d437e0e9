use std::sync::Arc;

use tracing::debug;

use crate::constants::MAX_SEQUENCE_LENGTH;
use crate::encoding::EncodedInput;

use super::error::EngineError;
use super::{ScorePrediction, ScoringEngine, ScoringSession};

type ScoreFn = dyn Fn(&EncodedInput) -> (Vec<f32>, Vec<f32>) + Send + Sync;

/// Deterministic scoring engine for tests and examples (no model files).
///
/// Mirrors the stub modes of real engines: same trait surface, fully
/// predictable output.
#[derive(Clone)]
pub struct StubScoringEngine {
    score_fn: Arc<ScoreFn>,
}

impl std::fmt::Debug for StubScoringEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StubScoringEngine").finish_non_exhaustive()
    }
}

impl StubScoringEngine {
    /// Builds a stub from an arbitrary score function.
    pub fn from_fn<F>(score_fn: F) -> Self
    where
        F: Fn(&EncodedInput) -> (Vec<f32>, Vec<f32>) + Send + Sync + 'static,
    {
        Self {
            score_fn: Arc::new(score_fn),
        }
    }

    /// Builds a stub returning the same two score vectors for every input.
    pub fn from_scores(start_scores: Vec<f32>, end_scores: Vec<f32>) -> Self {
        Self::from_fn(move |_| (start_scores.clone(), end_scores.clone()))
    }

    /// Builds a stub that peaks sharply at one start/end position pair and
    /// is flat everywhere else.
    pub fn with_peaks(start: usize, end: usize) -> Self {
        let mut start_scores = vec![0.0; MAX_SEQUENCE_LENGTH];
        let mut end_scores = vec![0.0; MAX_SEQUENCE_LENGTH];
        start_scores[start] = 10.0;
        end_scores[end] = 10.0;
        Self::from_scores(start_scores, end_scores)
    }
}

impl ScoringEngine for StubScoringEngine {
    type Session = StubSession;

    fn create_session(&self) -> Result<Self::Session, EngineError> {
        Ok(StubSession {
            score_fn: Arc::clone(&self.score_fn),
        })
    }
}

/// Session handle minted by [`StubScoringEngine`].
pub struct StubSession {
    score_fn: Arc<ScoreFn>,
}

impl ScoringSession for StubSession {
    fn score(&mut self, input: &EncodedInput) -> Result<ScorePrediction, EngineError> {
        let (start_scores, end_scores) = (self.score_fn)(input);

        debug!(
            token_count = input.token_count(),
            unique_id = input.unique_id(),
            "Scored input (stub)"
        );

        let prediction = ScorePrediction {
            start_scores,
            end_scores,
            unique_id: input.unique_id(),
        };
        prediction.validate()?;
        Ok(prediction)
    }
}
