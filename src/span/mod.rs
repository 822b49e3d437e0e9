//! Answer-span decoding.
//!
//! [`SpanDecoder`] turns the engine's raw per-position start/end scores into
//! a single best span with a softmax-calibrated probability, or an explicit
//! [`SpanSelection::NoAnswer`] when every candidate fails validation.


use std::cmp::Ordering;

use tracing::debug;

use crate::constants::{DEFAULT_MAX_SPAN_LENGTH, DEFAULT_TOP_N};
use crate::engine::ScorePrediction;

/// A start/end position pair with its combined raw score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpanCandidate {
    /// Start token position.
    pub start: usize,
    /// End token position (inclusive).
    pub end: usize,
    /// Sum of the start and end position scores.
    pub score: f32,
}

/// Outcome of span decoding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpanSelection {
    /// The best surviving candidate.
    Span {
        /// Start token position.
        start: usize,
        /// End token position (inclusive).
        end: usize,
        /// Softmax probability over the scored candidate set.
        probability: f32,
    },
    /// No candidate survived the validity constraints.
    NoAnswer,
}

impl SpanSelection {
    /// Returns `true` for a real span.
    pub fn is_span(&self) -> bool {
        matches!(self, SpanSelection::Span { .. })
    }

    /// Returns the probability (if a span was found).
    pub fn probability(&self) -> Option<f32> {
        match self {
            SpanSelection::Span { probability, .. } => Some(*probability),
            SpanSelection::NoAnswer => None,
        }
    }
}

impl std::fmt::Display for SpanSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpanSelection::Span {
                start,
                end,
                probability,
            } => write!(f, "SPAN [{start}, {end}] (probability: {probability:.4})"),
            SpanSelection::NoAnswer => write!(f, "NO_ANSWER"),
        }
    }
}

/// Selects the best answer span from raw score vectors.
#[derive(Debug, Clone)]
pub struct SpanDecoder {
    top_n: usize,
    max_span_length: usize,
}

impl Default for SpanDecoder {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            max_span_length: DEFAULT_MAX_SPAN_LENGTH,
        }
    }
}

impl SpanDecoder {
    /// Creates a decoder with explicit search parameters.
    pub fn new(top_n: usize, max_span_length: usize) -> Self {
        Self {
            top_n,
            max_span_length,
        }
    }

    /// Decodes the best `(start, end, probability)` span.
    ///
    /// `min_start` is the position of the first separator token: candidates
    /// starting inside the question segment are discarded, as are inverted
    /// spans, spans longer than the configured maximum, and the `(0, 0)`
    /// no-answer sentinel pair. Survivors are kept in generation order,
    /// capped at the top-N count, and softmax-normalized; the
    /// maximum-probability candidate wins (first on ties).
    pub fn decode(&self, prediction: &ScorePrediction, min_start: usize) -> SpanSelection {
        let best_starts = top_positions(&prediction.start_scores, self.top_n);
        let best_ends = top_positions(&prediction.end_scores, self.top_n);

        let mut candidates: Vec<SpanCandidate> = Vec::with_capacity(self.top_n);
        'generate: for &(start, start_score) in &best_starts {
            for &(end, end_score) in &best_ends {
                if !self.is_valid(start, end, min_start) {
                    continue;
                }
                candidates.push(SpanCandidate {
                    start,
                    end,
                    score: start_score + end_score,
                });
                if candidates.len() == self.top_n {
                    break 'generate;
                }
            }
        }

        debug!(
            survivors = candidates.len(),
            min_start, "Span candidates after filtering"
        );

        if candidates.is_empty() {
            return SpanSelection::NoAnswer;
        }

        let probabilities = softmax(candidates.iter().map(|c| c.score));

        let mut best = 0;
        for (position, probability) in probabilities.iter().enumerate() {
            if *probability > probabilities[best] {
                best = position;
            }
        }

        SpanSelection::Span {
            start: candidates[best].start,
            end: candidates[best].end,
            probability: probabilities[best],
        }
    }

    fn is_valid(&self, start: usize, end: usize, min_start: usize) -> bool {
        !(end < start
            || end - start > self.max_span_length
            || (start == 0 && end == 0)
            || start < min_start)
    }
}

/// Returns the `n` highest-scoring positions, descending by score, ties
/// broken by lowest position.
fn top_positions(scores: &[f32], n: usize) -> Vec<(usize, f32)> {
    let mut indexed: Vec<(usize, f32)> = scores.iter().copied().enumerate().collect();
    indexed.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then(a.0.cmp(&b.0))
    });
    indexed.truncate(n);
    indexed
}

/// Softmax over raw scores, max-subtracted for numerical stability.
pub fn softmax<I: IntoIterator<Item = f32>>(scores: I) -> Vec<f32> {
    let scores: Vec<f32> = scores.into_iter().collect();
    if scores.is_empty() {
        return Vec::new();
    }

    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exponentials: Vec<f32> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f32 = exponentials.iter().sum();

    exponentials.into_iter().map(|e| e / sum).collect()
}
