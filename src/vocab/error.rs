use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VocabularyError {
    #[error("vocabulary is missing the required entry {token:?}")]
    MissingSentinel { token: &'static str },

    #[error("vocabulary is empty")]
    Empty,

    #[error("failed to read vocabulary file {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
