use super::*;

use std::time::Duration;

use crate::constants::MAX_SEQUENCE_LENGTH;
use crate::encoding::EncodedInput;

fn encoded_input(unique_id: i64) -> EncodedInput {
    let mut input_mask = vec![0i64; MAX_SEQUENCE_LENGTH];
    for m in input_mask.iter_mut().take(8) {
        *m = 1;
    }
    EncodedInput {
        input_ids: vec![0; MAX_SEQUENCE_LENGTH],
        segment_ids: vec![0; MAX_SEQUENCE_LENGTH],
        input_mask,
        unique_ids: vec![unique_id],
    }
}

mod prediction_tests {
    use super::*;

    #[test]
    fn test_validate_accepts_fixed_length() {
        let prediction = ScorePrediction {
            start_scores: vec![0.0; MAX_SEQUENCE_LENGTH],
            end_scores: vec![0.0; MAX_SEQUENCE_LENGTH],
            unique_id: 0,
        };
        assert!(prediction.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_short_vectors() {
        let prediction = ScorePrediction {
            start_scores: vec![0.0; 8],
            end_scores: vec![0.0; MAX_SEQUENCE_LENGTH],
            unique_id: 0,
        };
        assert!(matches!(
            prediction.validate(),
            Err(EngineError::ShapeMismatch {
                expected: MAX_SEQUENCE_LENGTH,
                actual: 8
            })
        ));
    }
}

mod stub_tests {
    use super::*;

    #[test]
    fn test_stub_peaks_at_requested_positions() {
        let engine = StubScoringEngine::with_peaks(10, 12);
        let mut session = engine.create_session().expect("session");
        let prediction = session.score(&encoded_input(0)).expect("score");

        assert_eq!(prediction.start_scores.len(), MAX_SEQUENCE_LENGTH);
        assert_eq!(prediction.start_scores[10], 10.0);
        assert_eq!(prediction.end_scores[12], 10.0);
        assert_eq!(prediction.start_scores[11], 0.0);
    }

    #[test]
    fn test_stub_is_deterministic() {
        let engine = StubScoringEngine::with_peaks(3, 4);
        let mut session = engine.create_session().expect("session");
        let first = session.score(&encoded_input(0)).expect("score");
        let second = session.score(&encoded_input(0)).expect("score");
        assert_eq!(first, second);
    }

    #[test]
    fn test_stub_echoes_unique_id() {
        let engine = StubScoringEngine::with_peaks(3, 4);
        let mut session = engine.create_session().expect("session");
        let prediction = session.score(&encoded_input(77)).expect("score");
        assert_eq!(prediction.unique_id, 77);
    }

    #[test]
    fn test_stub_from_fn_sees_the_input() {
        let engine = StubScoringEngine::from_fn(|input| {
            let mut start = vec![0.0; MAX_SEQUENCE_LENGTH];
            start[input.token_count()] = 1.0;
            (start, vec![0.0; MAX_SEQUENCE_LENGTH])
        });
        let mut session = engine.create_session().expect("session");
        let prediction = session.score(&encoded_input(0)).expect("score");
        assert_eq!(prediction.start_scores[8], 1.0);
    }

    #[test]
    fn test_stub_with_wrong_shape_fails_validation() {
        let engine = StubScoringEngine::from_scores(vec![0.0; 4], vec![0.0; 4]);
        let mut session = engine.create_session().expect("session");
        assert!(matches!(
            session.score(&encoded_input(0)),
            Err(EngineError::ShapeMismatch { .. })
        ));
    }
}

mod bert_tests {
    use super::*;

    #[test]
    fn test_load_missing_directory() {
        let result = BertQaEngine::load("/nonexistent/model/dir");
        assert!(matches!(result, Err(EngineError::ModelNotFound { .. })));
    }

    #[test]
    fn test_load_directory_without_checkpoint_files() {
        let dir = tempfile::TempDir::new().expect("create temp dir");
        let result = BertQaEngine::load(dir.path());
        match result {
            Err(EngineError::ModelLoadFailed { reason }) => {
                assert!(reason.contains("config.json"));
            }
            other => panic!("expected ModelLoadFailed, got {other:?}"),
        }
    }
}

mod pool_config_tests {
    use super::*;

    #[test]
    fn test_default_capacity_is_positive() {
        let config = PoolConfig::default();
        assert!(config.capacity >= 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let config = PoolConfig {
            capacity: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(PoolError::InvalidCapacity)));

        let engine = StubScoringEngine::with_peaks(1, 1);
        assert!(matches!(
            SessionPool::new(engine, config),
            Err(PoolError::InvalidCapacity)
        ));
    }
}

mod pool_tests {
    use super::*;

    fn pool(capacity: usize, timeout_ms: u64) -> SessionPool<StubScoringEngine> {
        SessionPool::new(
            StubScoringEngine::with_peaks(10, 12),
            PoolConfig {
                capacity,
                acquire_timeout: Duration::from_millis(timeout_ms),
            },
        )
        .expect("valid pool")
    }

    #[tokio::test]
    async fn test_acquire_and_release_recycles_session() {
        let pool = pool(2, 100);
        assert_eq!(pool.idle_count(), 0);

        {
            let mut session = pool.acquire().await.expect("acquire");
            session.score(&encoded_input(0)).expect("score");
        }

        assert_eq!(pool.idle_count(), 1);

        // The recycled session is handed out again instead of a new build.
        let _session = pool.acquire().await.expect("acquire");
        assert_eq!(pool.idle_count(), 0);
    }

    #[tokio::test]
    async fn test_exhausted_pool_times_out() {
        let pool = pool(1, 50);
        let _held = pool.acquire().await.expect("acquire");

        let result = pool.acquire().await;
        assert!(matches!(
            result,
            Err(PoolError::AcquireTimeout { waited_ms: 50 })
        ));
    }

    #[tokio::test]
    async fn test_release_unblocks_waiter() {
        let pool = pool(1, 1_000);
        let held = pool.acquire().await.expect("acquire");

        let waiter = {
            let pool = pool.clone();
            tokio::spawn(async move { pool.acquire().await.map(|_| ()) })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        drop(held);

        waiter.await.expect("join").expect("acquire after release");
    }

    #[tokio::test]
    async fn test_session_returned_after_scoring_failure() {
        let engine = StubScoringEngine::from_scores(vec![0.0; 4], vec![0.0; 4]);
        let pool = SessionPool::new(
            engine,
            PoolConfig {
                capacity: 1,
                acquire_timeout: Duration::from_millis(100),
            },
        )
        .expect("valid pool");

        {
            let mut session = pool.acquire().await.expect("acquire");
            assert!(session.score(&encoded_input(0)).is_err());
        }

        // The failing call still returned its session; the pool is usable.
        assert_eq!(pool.idle_count(), 1);
        let _session = pool.acquire().await.expect("acquire again");
    }

    #[tokio::test]
    async fn test_cancelled_waiter_leaves_pool_intact() {
        let pool = pool(1, 10_000);
        let held = pool.acquire().await.expect("acquire");

        let waiter = {
            let pool = pool.clone();
            tokio::spawn(async move { pool.acquire().await.map(|_| ()) })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        waiter.abort();
        let _ = waiter.await;

        drop(held);
        // The aborted waiter consumed nothing; the permit is available.
        let _session = pool.acquire().await.expect("acquire after abort");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_acquire_under_contention() {
        let pool = pool(2, 5_000);

        let tasks: Vec<_> = (0..32)
            .map(|i| {
                let pool = pool.clone();
                tokio::spawn(async move {
                    let mut session = pool.acquire().await.expect("acquire");
                    let prediction = session.score(&encoded_input(i)).expect("score");
                    assert_eq!(prediction.unique_id, i);
                })
            })
            .collect();

        for task in tasks {
            task.await.expect("join");
        }

        // Never more sessions than capacity were built.
        assert!(pool.idle_count() <= pool.capacity());
    }
}
