//! Cross-cutting, shared constants.
//!
//! Prefer deriving secondary constants from primary ones to avoid drift.
//!
//! # Shape Invariants
//!
//! [`MAX_SEQUENCE_LENGTH`] is a compile-time invariant shared by the input
//! assembler, the scoring-engine contract, and the span decoder. The engine
//! receives tensors of exactly this length and returns score vectors of
//! exactly this length; changing it requires a matching model export.

/// Fixed padded length of every encoded input sequence (and of the score
/// vectors the engine returns).
pub const MAX_SEQUENCE_LENGTH: usize = 256;

/// Number of top start (and, independently, end) positions considered
/// during span decoding, and the cap on scored candidates.
pub const DEFAULT_TOP_N: usize = 20;

/// Longest admissible answer span, in tokens (`end - start`).
pub const DEFAULT_MAX_SPAN_LENGTH: usize = 30;

/// Vocabulary entry emitted for words with no matching subword prefix.
pub const UNKNOWN_TOKEN: &str = "[UNK]";

/// Vocabulary entry appended after each input text.
pub const SEPARATOR_TOKEN: &str = "[SEP]";

/// Marker prefix on vocabulary entries that continue a word rather than
/// start one. Stripped during detokenization.
pub const CONTINUATION_PREFIX: &str = "##";

/// Default bound on concurrent scoring sessions when the configuration
/// does not override it.
pub fn default_pool_capacity() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get() * 2)
        .unwrap_or(4)
}
