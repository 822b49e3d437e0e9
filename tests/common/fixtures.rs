//! Shared fixtures for integration tests.

use std::sync::Arc;

use quanda::{MAX_SEQUENCE_LENGTH, StubScoringEngine, Vocabulary};

/// Vocabulary covering the sky/color test sentences plus a few subword
/// pieces. Token positions for
/// `("What color is the sky?", "The sky is blue")`:
///
/// ```text
/// what color is the sky ? [SEP] the sky is blue [SEP]
///  0    1    2   3   4  5   6    7   8   9   10   11
/// ```
pub fn sky_vocabulary() -> Arc<Vocabulary> {
    Arc::new(
        Vocabulary::from_lines([
            "[PAD]", "[UNK]", "[SEP]", "the", "sky", "is", "blue", "what", "color", "?", "a",
            "play", "##ing",
        ])
        .expect("valid fixture vocabulary"),
    )
}

pub const SKY_QUESTION: &str = "What color is the sky?";
pub const SKY_CONTEXT: &str = "The sky is blue";

/// Position of "blue" in the fixture encoding.
pub const BLUE_POSITION: usize = 10;

/// Engine peaking on the "blue" token.
pub fn blue_engine() -> StubScoringEngine {
    StubScoringEngine::with_peaks(BLUE_POSITION, BLUE_POSITION)
}

/// Engine whose every candidate is invalid (all high end scores precede all
/// high start scores).
pub fn unanswerable_engine() -> StubScoringEngine {
    let mut start_scores = vec![-1000.0; MAX_SEQUENCE_LENGTH];
    let mut end_scores = vec![-1000.0; MAX_SEQUENCE_LENGTH];
    for i in 200..220 {
        start_scores[i] = 50.0;
    }
    for i in 0..20 {
        end_scores[i] = 50.0;
    }
    StubScoringEngine::from_scores(start_scores, end_scores)
}

/// Engine that holds the session briefly before answering, to create real
/// pool contention in stress tests.
pub fn slow_blue_engine() -> StubScoringEngine {
    StubScoringEngine::from_fn(|_| {
        std::thread::sleep(std::time::Duration::from_millis(2));
        let mut start_scores = vec![0.0; MAX_SEQUENCE_LENGTH];
        let mut end_scores = vec![0.0; MAX_SEQUENCE_LENGTH];
        start_scores[BLUE_POSITION] = 10.0;
        end_scores[BLUE_POSITION] = 10.0;
        (start_scores, end_scores)
    })
}

/// Installs a test subscriber so `RUST_LOG` controls pipeline tracing
/// during test runs. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
