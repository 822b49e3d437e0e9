use super::*;

use crate::engine::StubScoringEngine;

fn vocabulary() -> Arc<Vocabulary> {
    Arc::new(
        Vocabulary::from_lines([
            "[PAD]", "[UNK]", "[SEP]", "the", "sky", "is", "blue", "what", "color", "?",
        ])
        .expect("valid vocabulary"),
    )
}

fn pipeline(engine: StubScoringEngine) -> QaPipeline<StubScoringEngine> {
    QaPipeline::new(vocabulary(), engine, &QaConfig::default()).expect("valid pipeline")
}

// Token positions for ("What color is the sky?", "The sky is blue"):
// what color is the sky ? [SEP] the sky is blue [SEP]
//  0    1    2   3   4  5   6    7   8   9   10   11

#[tokio::test]
async fn test_predict_extracts_peaked_span() {
    let pipeline = pipeline(StubScoringEngine::with_peaks(10, 10));

    let prediction = pipeline
        .predict("The sky is blue", "What color is the sky?")
        .await
        .expect("predict");

    match prediction {
        Prediction::Answer { words, probability } => {
            assert_eq!(words, ["blue"]);
            assert!(probability > 0.9, "got {probability}");
        }
        Prediction::NoAnswer => panic!("expected an answer"),
    }
}

#[tokio::test]
async fn test_predict_multi_token_answer() {
    let pipeline = pipeline(StubScoringEngine::with_peaks(8, 10));

    let prediction = pipeline
        .predict("The sky is blue", "What color is the sky?")
        .await
        .expect("predict");

    assert_eq!(prediction.answer_text().as_deref(), Some("sky is blue"));
}

#[tokio::test]
async fn test_predict_no_answer_when_all_candidates_invalid() {
    // All high end scores sit before all high start scores: every candidate
    // pair is inverted, and nothing valid survives.
    let mut start_scores = vec![-1000.0; crate::constants::MAX_SEQUENCE_LENGTH];
    let mut end_scores = vec![-1000.0; crate::constants::MAX_SEQUENCE_LENGTH];
    for i in 200..220 {
        start_scores[i] = 50.0;
    }
    for i in 0..20 {
        end_scores[i] = 50.0;
    }

    let pipeline = pipeline(StubScoringEngine::from_scores(start_scores, end_scores));

    let prediction = pipeline
        .predict("The sky is blue", "What color is the sky?")
        .await
        .expect("predict");

    assert_eq!(prediction, Prediction::NoAnswer);
    assert!(!prediction.is_answer());
    assert_eq!(prediction.probability(), None);
}

#[tokio::test]
async fn test_predict_rejects_spans_starting_in_question() {
    // Peak inside the question segment (position 2) plus a weaker valid
    // peak in the context; the context span must win.
    let pipeline = pipeline(StubScoringEngine::from_fn(|_| {
        let mut start = vec![0.0; crate::constants::MAX_SEQUENCE_LENGTH];
        let mut end = vec![0.0; crate::constants::MAX_SEQUENCE_LENGTH];
        start[2] = 20.0;
        end[3] = 20.0;
        start[10] = 5.0;
        end[10] = 5.0;
        (start, end)
    }));

    let prediction = pipeline
        .predict("The sky is blue", "What color is the sky?")
        .await
        .expect("predict");

    assert_eq!(prediction.answer_text().as_deref(), Some("blue"));
}

#[tokio::test]
async fn test_invalid_pool_capacity_fails_construction() {
    let config = QaConfig {
        pool_capacity: 0,
        ..Default::default()
    };
    let result = QaPipeline::new(vocabulary(), StubScoringEngine::with_peaks(10, 10), &config);
    assert!(matches!(result, Err(PoolError::InvalidCapacity)));
}

#[test]
fn test_prediction_display() {
    let answer = Prediction::Answer {
        words: vec!["blue".to_string()],
        probability: 0.9876,
    };
    assert_eq!(answer.to_string(), "ANSWER \"blue\" (probability: 0.9876)");
    assert_eq!(Prediction::NoAnswer.to_string(), "NO_ANSWER");
}
