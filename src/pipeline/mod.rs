//! The end-to-end question-answering pipeline.
//!
//! Wires the tokenizer, input assembler, session pool, span decoder, and
//! detokenizer into the single public operation:
//! [`QaPipeline::predict`].

mod error;

#[cfg(test)]
mod tests;

pub use error::PredictError;

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::QaConfig;
use crate::encoding::InputAssembler;
use crate::engine::{PoolConfig, PoolError, ScoringEngine, ScoringSession, SessionPool};
use crate::span::{SpanDecoder, SpanSelection};
use crate::tokenize::{Tokenizer, untokenize};
use crate::vocab::Vocabulary;

/// Outcome of a prediction.
#[derive(Debug, Clone, PartialEq)]
pub enum Prediction {
    /// An answer span was found.
    Answer {
        /// Detokenized answer words, in context order.
        words: Vec<String>,
        /// Softmax probability over the scored candidate set, in `[0, 1]`.
        probability: f32,
    },
    /// No candidate span survived decoding. Distinct from a low-probability
    /// real answer.
    NoAnswer,
}

impl Prediction {
    /// Returns `true` when an answer was found.
    pub fn is_answer(&self) -> bool {
        matches!(self, Prediction::Answer { .. })
    }

    /// Returns the probability (if an answer was found).
    pub fn probability(&self) -> Option<f32> {
        match self {
            Prediction::Answer { probability, .. } => Some(*probability),
            Prediction::NoAnswer => None,
        }
    }

    /// Joins the answer words with single spaces (if an answer was found).
    pub fn answer_text(&self) -> Option<String> {
        match self {
            Prediction::Answer { words, .. } => Some(words.join(" ")),
            Prediction::NoAnswer => None,
        }
    }
}

impl std::fmt::Display for Prediction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Prediction::Answer { words, probability } => {
                write!(f, "ANSWER {:?} (probability: {probability:.4})", words.join(" "))
            }
            Prediction::NoAnswer => write!(f, "NO_ANSWER"),
        }
    }
}

/// Extractive question answering over a pooled scoring engine.
///
/// The vocabulary is shared read-only; every call works on request-local
/// data, so a pipeline can serve any number of concurrent `predict` calls.
pub struct QaPipeline<E: ScoringEngine> {
    vocabulary: Arc<Vocabulary>,
    tokenizer: Tokenizer,
    assembler: InputAssembler,
    pool: SessionPool<E>,
    decoder: SpanDecoder,
}

impl<E: ScoringEngine> std::fmt::Debug for QaPipeline<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QaPipeline")
            .field("vocabulary_entries", &self.vocabulary.len())
            .field("pool", &self.pool)
            .finish()
    }
}

impl<E: ScoringEngine> QaPipeline<E> {
    /// Builds a pipeline from a loaded vocabulary, a scoring engine, and
    /// configuration.
    pub fn new(
        vocabulary: Arc<Vocabulary>,
        engine: E,
        config: &QaConfig,
    ) -> Result<Self, PoolError> {
        let tokenizer = Tokenizer::new(Arc::clone(&vocabulary), config.lowercase);
        let assembler = InputAssembler::new(vocabulary.separator_id(), config.truncation);
        let pool = SessionPool::new(
            engine,
            PoolConfig {
                capacity: config.pool_capacity,
                acquire_timeout: config.acquire_timeout,
            },
        )?;

        info!(
            vocabulary_entries = vocabulary.len(),
            pool_capacity = pool.capacity(),
            "QA pipeline ready"
        );

        Ok(Self {
            vocabulary,
            tokenizer,
            assembler,
            pool,
            decoder: SpanDecoder::default(),
        })
    }

    /// Answers `question` from `context`.
    ///
    /// Returns [`Prediction::Answer`] with the detokenized answer words and
    /// a calibrated probability, or [`Prediction::NoAnswer`] when no valid
    /// span exists. The only suspension point is pool acquisition; the
    /// session is returned to the pool on every exit path.
    pub async fn predict(
        &self,
        context: &str,
        question: &str,
    ) -> Result<Prediction, PredictError> {
        let tokens = self.tokenizer.tokenize(question, context);
        let encoded = self.assembler.assemble(&tokens)?;

        let prediction = {
            let mut session = self.pool.acquire().await?;
            session.score(&encoded)?
        };

        // Answers may not start inside the question segment. Truncation
        // preserves the question, so the boundary survives assembly.
        let min_start = tokens
            .iter()
            .position(|t| t.id == self.vocabulary.separator_id())
            .unwrap_or(0);

        match self.decoder.decode(&prediction, min_start) {
            SpanSelection::NoAnswer => {
                debug!(min_start, "No valid answer span");
                Ok(Prediction::NoAnswer)
            }
            SpanSelection::Span {
                start,
                end,
                probability,
            } => {
                let mut piece_list = Vec::with_capacity(end + 1 - start);
                for &id in &encoded.input_ids[start..=end] {
                    let id = id as u32;
                    let piece = self
                        .vocabulary
                        .token_at(id)
                        .ok_or(PredictError::AnswerOutOfVocabulary { index: id })?;
                    piece_list.push(piece);
                }

                let words = untokenize(&piece_list);

                debug!(
                    start,
                    end,
                    probability,
                    word_count = words.len(),
                    "Answer span decoded"
                );

                Ok(Prediction::Answer { words, probability })
            }
        }
    }

    /// The shared vocabulary.
    pub fn vocabulary(&self) -> &Arc<Vocabulary> {
        &self.vocabulary
    }

    /// The session pool (capacity / idle introspection).
    pub fn pool(&self) -> &SessionPool<E> {
        &self.pool
    }
}
