//! Fixed-length tensor assembly.
//!
//! [`InputAssembler`] converts a token list into the four fixed-shape
//! sequences the scoring engine consumes, padding with zeros and applying an
//! explicit over-length policy. Padded length never underflows: inputs that
//! cannot fit are truncated deterministically or rejected, per
//! [`TruncationPolicy`].

mod error;


pub use error::EncodingError;

use std::str::FromStr;

use tracing::debug;

use crate::constants::MAX_SEQUENCE_LENGTH;
use crate::tokenize::{CONTEXT_SEGMENT, Token};

/// What to do when question + context exceed the fixed sequence length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TruncationPolicy {
    /// Drop context tokens from the end, preserving the full question and
    /// keeping a trailing separator. The default.
    #[default]
    TruncateContext,
    /// Fail the request with [`EncodingError::InputTooLong`].
    Reject,
}

impl FromStr for TruncationPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "truncate" | "truncate-context" => Ok(Self::TruncateContext),
            "reject" => Ok(Self::Reject),
            other => Err(other.to_string()),
        }
    }
}

/// The four fixed-shape integer sequences handed to the scoring engine.
///
/// All three per-position sequences share length
/// [`MAX_SEQUENCE_LENGTH`]; `unique_ids` is a single-element sequence. For
/// the BERT-SQuAD ONNX export these map to the `input_ids:0`,
/// `segment_ids:0`, `input_mask:0` (`[1, 256]`) and
/// `unique_ids_raw_output___9:0` (`[1]`) graph inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedInput {
    /// Vocabulary index per position; 0 in padding positions.
    pub input_ids: Vec<i64>,
    /// Segment tag per position (0 question, 1 context); 0 in padding.
    pub segment_ids: Vec<i64>,
    /// 1 for real tokens, 0 for padding.
    pub input_mask: Vec<i64>,
    /// Caller-supplied request identifier, echoed by the engine.
    pub unique_ids: Vec<i64>,
}

impl EncodedInput {
    /// Number of non-padding positions.
    pub fn token_count(&self) -> usize {
        self.input_mask.iter().filter(|&&m| m == 1).count()
    }

    /// The request identifier.
    pub fn unique_id(&self) -> i64 {
        self.unique_ids[0]
    }
}

/// Builds [`EncodedInput`] values from token lists.
#[derive(Debug, Clone)]
pub struct InputAssembler {
    max_length: usize,
    policy: TruncationPolicy,
    separator_id: u32,
}

impl InputAssembler {
    /// Creates an assembler emitting sequences of [`MAX_SEQUENCE_LENGTH`].
    ///
    /// `separator_id` is the vocabulary index written into the final slot
    /// when context truncation occurs.
    pub fn new(separator_id: u32, policy: TruncationPolicy) -> Self {
        Self {
            max_length: MAX_SEQUENCE_LENGTH,
            policy,
            separator_id,
        }
    }

    /// Assembles with the default request identifier 0.
    pub fn assemble(&self, tokens: &[Token]) -> Result<EncodedInput, EncodingError> {
        self.assemble_with_id(tokens, 0)
    }

    /// Assembles a fixed-length encoded input.
    ///
    /// Non-padding positions take each token's index, segment tag, and a
    /// mask of 1, in token order; the remainder is zero-filled. Over-length
    /// inputs follow the configured [`TruncationPolicy`].
    pub fn assemble_with_id(
        &self,
        tokens: &[Token],
        unique_id: i64,
    ) -> Result<EncodedInput, EncodingError> {
        let truncated = if tokens.len() > self.max_length {
            self.check_truncatable(tokens)?;
            true
        } else {
            false
        };

        let filled = tokens.len().min(self.max_length);
        let mut input_ids = vec![0i64; self.max_length];
        let mut segment_ids = vec![0i64; self.max_length];
        let mut input_mask = vec![0i64; self.max_length];

        for (slot, token) in tokens.iter().take(filled).enumerate() {
            input_ids[slot] = i64::from(token.id);
            segment_ids[slot] = token.segment;
            input_mask[slot] = 1;
        }

        if truncated {
            // The cut falls inside the context, so the sequence must still
            // end with its separator.
            let last = self.max_length - 1;
            input_ids[last] = i64::from(self.separator_id);
            segment_ids[last] = CONTEXT_SEGMENT;
            input_mask[last] = 1;

            debug!(
                token_count = tokens.len(),
                max_length = self.max_length,
                "Context truncated to fit fixed sequence length"
            );
        }

        Ok(EncodedInput {
            input_ids,
            segment_ids,
            input_mask,
            unique_ids: vec![unique_id],
        })
    }

    /// Rejects over-length input when the policy forbids truncation or the
    /// question itself leaves no room for any context.
    fn check_truncatable(&self, tokens: &[Token]) -> Result<(), EncodingError> {
        let question_tokens = tokens
            .iter()
            .position(|t| t.id == self.separator_id)
            .map(|sep| sep + 1)
            .unwrap_or(tokens.len());

        let too_long = EncodingError::InputTooLong {
            token_count: tokens.len(),
            max_length: self.max_length,
            question_tokens,
        };

        match self.policy {
            TruncationPolicy::Reject => Err(too_long),
            TruncationPolicy::TruncateContext => {
                // Room for the question, at least one context token, and the
                // trailing separator.
                if question_tokens + 2 > self.max_length {
                    Err(too_long)
                } else {
                    Ok(())
                }
            }
        }
    }
}
