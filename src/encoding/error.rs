use thiserror::Error;

#[derive(Debug, Error)]
pub enum EncodingError {
    #[error(
        "input of {token_count} tokens exceeds the fixed sequence length {max_length} \
         (question occupies {question_tokens} tokens)"
    )]
    InputTooLong {
        token_count: usize,
        max_length: usize,
        question_tokens: usize,
    },
}
