//! Subword vocabulary: ordered token list with constant-time lookup.
//!
//! The vocabulary is built once, fully, before any tokenizer is constructed,
//! and is immutable afterwards, safe for unsynchronized concurrent reads
//! behind an `Arc`.

mod error;


pub use error::VocabularyError;

use std::path::Path;

use ahash::AHashMap;
use tracing::info;

use crate::constants::{CONTINUATION_PREFIX, SEPARATOR_TOKEN, UNKNOWN_TOKEN};

/// Ordered subword vocabulary.
///
/// The position of a token in the source sequence is its index, used in every
/// encoded input. Lookup goes through a hash index; the ordered array serves
/// reverse (index → token) queries.
#[derive(Debug)]
pub struct Vocabulary {
    tokens: Vec<String>,
    index: AHashMap<String, u32>,
    unknown_id: u32,
    separator_id: u32,
}

impl Vocabulary {
    /// Builds a vocabulary from an ordered token sequence.
    ///
    /// Fails if the sequence is empty or lacks the `[UNK]` / `[SEP]`
    /// sentinels. Duplicate tokens keep their first index in the lookup
    /// direction; the ordered array keeps every entry.
    pub fn from_lines<I, S>(lines: I) -> Result<Self, VocabularyError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens: Vec<String> = lines.into_iter().map(Into::into).collect();

        if tokens.is_empty() {
            return Err(VocabularyError::Empty);
        }

        let mut index = AHashMap::with_capacity(tokens.len());
        for (position, token) in tokens.iter().enumerate() {
            index.entry(token.clone()).or_insert(position as u32);
        }

        let unknown_id = *index
            .get(UNKNOWN_TOKEN)
            .ok_or(VocabularyError::MissingSentinel {
                token: UNKNOWN_TOKEN,
            })?;
        let separator_id = *index
            .get(SEPARATOR_TOKEN)
            .ok_or(VocabularyError::MissingSentinel {
                token: SEPARATOR_TOKEN,
            })?;

        info!(entries = tokens.len(), "Vocabulary loaded");

        Ok(Self {
            tokens,
            index,
            unknown_id,
            separator_id,
        })
    }

    /// Reads a one-token-per-line vocabulary file, skipping blank lines,
    /// and builds the vocabulary. Line order defines the index space.
    pub fn read_from_file<P: AsRef<Path>>(path: P) -> Result<Self, VocabularyError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|source| VocabularyError::ReadFailed {
                path: path.to_path_buf(),
                source,
            })?;

        Self::from_lines(
            content
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(str::to_string),
        )
    }

    /// Returns the index of `token`, if present.
    #[inline]
    pub fn lookup(&self, token: &str) -> Option<u32> {
        self.index.get(token).copied()
    }

    /// Returns the token at `index`, if in range.
    #[inline]
    pub fn token_at(&self, index: u32) -> Option<&str> {
        self.tokens.get(index as usize).map(String::as_str)
    }

    /// Index of the `[UNK]` sentinel.
    #[inline]
    pub fn unknown_id(&self) -> u32 {
        self.unknown_id
    }

    /// Index of the `[SEP]` sentinel.
    #[inline]
    pub fn separator_id(&self) -> u32 {
        self.separator_id
    }

    /// Number of entries (duplicates included).
    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns `true` if the vocabulary has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Finds the longest vocabulary entry that is a prefix of `span`.
    ///
    /// With `continuation` set, entries are probed in their `##`-marked form
    /// (the returned index is the marked entry's index). Returns the entry
    /// index and the consumed byte length of `span`, or `None` when no entry
    /// prefixes the span at all.
    ///
    /// Probing walks char boundaries longest-first, so each candidate costs
    /// one hash lookup rather than a scan of the whole vocabulary.
    pub fn longest_prefix(&self, span: &str, continuation: bool) -> Option<(u32, usize)> {
        let mut probe = String::with_capacity(CONTINUATION_PREFIX.len() + span.len());

        for end in (1..=span.len()).rev() {
            if !span.is_char_boundary(end) {
                continue;
            }

            let candidate = if continuation {
                probe.clear();
                probe.push_str(CONTINUATION_PREFIX);
                probe.push_str(&span[..end]);
                probe.as_str()
            } else {
                &span[..end]
            };

            if let Some(id) = self.lookup(candidate) {
                return Some((id, end));
            }
        }

        None
    }
}
