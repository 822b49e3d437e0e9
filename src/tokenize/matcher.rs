use std::sync::Arc;

use crate::vocab::Vocabulary;

/// Strategy for finding the longest vocabulary entry that prefixes a span.
///
/// The tokenizer is generic over this seam so the greedy segmentation logic
/// exists exactly once, whatever the backing lookup structure is.
pub trait PrefixMatcher {
    /// Returns the matched entry's vocabulary index and the number of bytes
    /// of `span` it covers, or `None` if no entry prefixes `span`.
    ///
    /// `continuation` selects the `##`-marked entry space used for
    /// non-initial pieces of a word.
    fn longest_prefix(&self, span: &str, continuation: bool) -> Option<(u32, usize)>;
}

impl PrefixMatcher for Vocabulary {
    #[inline]
    fn longest_prefix(&self, span: &str, continuation: bool) -> Option<(u32, usize)> {
        Vocabulary::longest_prefix(self, span, continuation)
    }
}

impl<M: PrefixMatcher + ?Sized> PrefixMatcher for Arc<M> {
    #[inline]
    fn longest_prefix(&self, span: &str, continuation: bool) -> Option<(u32, usize)> {
        (**self).longest_prefix(span, continuation)
    }
}

impl<M: PrefixMatcher + ?Sized> PrefixMatcher for &M {
    #[inline]
    fn longest_prefix(&self, span: &str, continuation: bool) -> Option<(u32, usize)> {
        (**self).longest_prefix(span, continuation)
    }
}
