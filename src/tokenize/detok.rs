use crate::constants::CONTINUATION_PREFIX;

/// Merges subword pieces back into words.
///
/// A piece carrying the continuation marker is appended to the previous word
/// with the marker stripped; unmarked pieces start a new word. A leading
/// continuation piece (a span that begins mid-word) starts a word of its own.
pub fn untokenize<S: AsRef<str>>(pieces: &[S]) -> Vec<String> {
    let mut words: Vec<String> = Vec::with_capacity(pieces.len());

    for piece in pieces {
        let piece = piece.as_ref();
        match piece.strip_prefix(CONTINUATION_PREFIX) {
            Some(rest) => match words.last_mut() {
                Some(last) => last.push_str(rest),
                None => words.push(rest.to_string()),
            },
            None => words.push(piece.to_string()),
        }
    }

    words
}
