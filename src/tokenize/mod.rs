//! WordPiece tokenization and detokenization.
//!
//! [`Tokenizer::tokenize`] turns a (question, context) pair into an ordered
//! token list ready for tensor assembly; [`untokenize`] reverses the subword
//! split for answer rendering. Greedy longest-match-first segmentation runs
//! against any [`PrefixMatcher`]; [`crate::vocab::Vocabulary`] is the
//! production matcher.

mod detok;
mod matcher;


pub use detok::untokenize;
pub use matcher::PrefixMatcher;

use std::sync::Arc;

use tracing::debug;

use crate::constants::{CONTINUATION_PREFIX, SEPARATOR_TOKEN, UNKNOWN_TOKEN};
use crate::vocab::Vocabulary;

/// Segment tag for question tokens (including the question's separator).
pub const QUESTION_SEGMENT: i64 = 0;

/// Segment tag for context tokens (including the trailing separator).
pub const CONTEXT_SEGMENT: i64 = 1;

/// One subword token: its text, vocabulary index, and segment tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Token text as it appears in the vocabulary (continuation pieces keep
    /// their `##` marker).
    pub piece: String,
    /// Vocabulary index (the unknown index for unresolved words).
    pub id: u32,
    /// 0 for the question portion, 1 for the context portion.
    pub segment: i64,
}

/// WordPiece tokenizer over a prefix-matching strategy.
pub struct Tokenizer<M = Arc<Vocabulary>> {
    matcher: M,
    unknown_id: u32,
    separator_id: u32,
    lowercase: bool,
}

impl Tokenizer<Arc<Vocabulary>> {
    /// Creates a tokenizer backed by a shared vocabulary.
    ///
    /// The vocabulary guarantees the unknown and separator sentinels exist,
    /// so tokenization itself cannot fail.
    pub fn new(vocabulary: Arc<Vocabulary>, lowercase: bool) -> Self {
        let unknown_id = vocabulary.unknown_id();
        let separator_id = vocabulary.separator_id();
        Self {
            matcher: vocabulary,
            unknown_id,
            separator_id,
            lowercase,
        }
    }
}

impl<M: PrefixMatcher> Tokenizer<M> {
    /// Creates a tokenizer over an arbitrary matching strategy.
    pub fn with_matcher(matcher: M, unknown_id: u32, separator_id: u32, lowercase: bool) -> Self {
        Self {
            matcher,
            unknown_id,
            separator_id,
            lowercase,
        }
    }

    /// Tokenizes a question and its context into one ordered sequence.
    ///
    /// Each text's words are segmented into subwords and followed by a
    /// `[SEP]` token. Question tokens (separator included) carry segment 0,
    /// context tokens segment 1. Order is the original text order.
    pub fn tokenize(&self, question: &str, context: &str) -> Vec<Token> {
        let mut tokens = Vec::new();

        for (segment, text) in [(QUESTION_SEGMENT, question), (CONTEXT_SEGMENT, context)] {
            for word in split_words(text, self.lowercase) {
                self.append_subwords(&word, segment, &mut tokens);
            }
            tokens.push(Token {
                piece: SEPARATOR_TOKEN.to_string(),
                id: self.separator_id,
                segment,
            });
        }

        debug!(
            question_len = question.len(),
            context_len = context.len(),
            token_count = tokens.len(),
            "Tokenized input pair"
        );

        tokens
    }

    /// Greedy longest-match-first segmentation of one word.
    ///
    /// If the remainder stops matching at any point, the whole word is
    /// abandoned and exactly one unknown token is emitted in its place.
    fn append_subwords(&self, word: &str, segment: i64, out: &mut Vec<Token>) {
        let emitted_before = out.len();
        let mut remaining = word;
        let mut continuation = false;

        while !remaining.is_empty() {
            match self.matcher.longest_prefix(remaining, continuation) {
                Some((id, consumed)) => {
                    let piece = if continuation {
                        format!("{CONTINUATION_PREFIX}{}", &remaining[..consumed])
                    } else {
                        remaining[..consumed].to_string()
                    };
                    out.push(Token { piece, id, segment });
                    remaining = &remaining[consumed..];
                    continuation = true;
                }
                None => {
                    out.truncate(emitted_before);
                    out.push(Token {
                        piece: UNKNOWN_TOKEN.to_string(),
                        id: self.unknown_id,
                        segment,
                    });
                    return;
                }
            }
        }
    }
}

/// Splits raw text into words: alphanumeric runs stay together, every other
/// non-whitespace character becomes a single-character word.
fn split_words(text: &str, lowercase: bool) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();

    for ch in text.chars() {
        if ch.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
        } else if ch.is_alphanumeric() {
            if lowercase {
                current.extend(ch.to_lowercase());
            } else {
                current.push(ch);
            }
        } else {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            words.push(ch.to_string());
        }
    }

    if !current.is_empty() {
        words.push(current);
    }

    words
}
