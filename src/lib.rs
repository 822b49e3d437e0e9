//! Quanda: extractive question answering around a pooled scoring engine.
//!
//! Given a context passage and a question, [`QaPipeline::predict`] returns
//! the context span most likely to answer the question plus a calibrated
//! probability. The scoring model itself is opaque; this crate owns
//! everything around it:
//!
//! # Public API Surface
//!
//! ## Core Types (Stable)
//! - [`QaConfig`], [`ConfigError`] - Environment-backed configuration
//! - [`Vocabulary`], [`VocabularyError`] - Immutable subword vocabulary
//! - [`QaPipeline`], [`Prediction`], [`PredictError`] - The prediction
//!   operation and its outcome
//!
//! ## Tokenization
//! - [`Tokenizer`], [`Token`], [`PrefixMatcher`] - WordPiece segmentation
//! - [`untokenize`] - Subword merge for answer rendering
//!
//! ## Tensor Assembly
//! - [`InputAssembler`], [`EncodedInput`], [`TruncationPolicy`],
//!   [`EncodingError`] - Fixed-length encoding
//!
//! ## Scoring & Pooling
//! - [`ScoringEngine`], [`ScoringSession`], [`ScorePrediction`] - Engine seam
//! - [`SessionPool`], [`PoolConfig`], [`PooledSession`], [`PoolError`] -
//!   Bounded session reuse
//! - [`BertQaEngine`] - Candle BERT checkpoint binding
//! - [`StubScoringEngine`] - Deterministic engine for tests/examples
//!
//! ## Span Decoding
//! - [`SpanDecoder`], [`SpanSelection`], [`SpanCandidate`], [`softmax`]
//!
//! ## Constants
//! Sequence-length and search constants are exported for consistency across
//! modules; the engine contract depends on them.

pub mod config;
pub mod constants;
pub mod encoding;
pub mod engine;
pub mod pipeline;
pub mod span;
pub mod tokenize;
pub mod vocab;

pub use config::{ConfigError, QaConfig};
pub use constants::{
    CONTINUATION_PREFIX, DEFAULT_MAX_SPAN_LENGTH, DEFAULT_TOP_N, MAX_SEQUENCE_LENGTH,
    SEPARATOR_TOKEN, UNKNOWN_TOKEN,
};
pub use encoding::{EncodedInput, EncodingError, InputAssembler, TruncationPolicy};
pub use engine::{
    BertQaEngine, EngineError, PoolConfig, PoolError, PooledSession, ScorePrediction,
    ScoringEngine, ScoringSession, SessionPool, StubScoringEngine,
};
pub use pipeline::{Prediction, PredictError, QaPipeline};
pub use span::{SpanCandidate, SpanDecoder, SpanSelection, softmax};
pub use tokenize::{PrefixMatcher, Token, Tokenizer, untokenize};
pub use vocab::{Vocabulary, VocabularyError};
