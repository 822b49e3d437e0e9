use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::time::timeout;
use tracing::debug;

use crate::constants::default_pool_capacity;

use super::error::PoolError;
use super::ScoringEngine;

/// Bounds and timing for a [`SessionPool`].
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Maximum concurrent sessions. Must be at least 1.
    pub capacity: usize,
    /// How long [`SessionPool::acquire`] waits before giving up.
    pub acquire_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            capacity: default_pool_capacity(),
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

impl PoolConfig {
    /// Creates a config with an explicit capacity and the default timeout.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ..Default::default()
        }
    }

    /// Validates bounds.
    pub fn validate(&self) -> Result<(), PoolError> {
        if self.capacity == 0 {
            return Err(PoolError::InvalidCapacity);
        }
        Ok(())
    }
}

struct PoolInner<E: ScoringEngine> {
    engine: E,
    idle: Mutex<Vec<E::Session>>,
    permits: Arc<Semaphore>,
}

/// Bounded pool of reusable scoring sessions.
///
/// Sessions are built lazily, up to `capacity`, and handed out exclusively:
/// a permit bounds concurrency, the idle list recycles sessions, and the
/// [`PooledSession`] guard returns both on every exit path (success, error,
/// or cancellation).
pub struct SessionPool<E: ScoringEngine> {
    inner: Arc<PoolInner<E>>,
    acquire_timeout: Duration,
    capacity: usize,
}

impl<E: ScoringEngine> Clone for SessionPool<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            acquire_timeout: self.acquire_timeout,
            capacity: self.capacity,
        }
    }
}

impl<E: ScoringEngine> std::fmt::Debug for SessionPool<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionPool")
            .field("capacity", &self.capacity)
            .field("idle", &self.idle_count())
            .field("acquire_timeout", &self.acquire_timeout)
            .finish()
    }
}

impl<E: ScoringEngine> SessionPool<E> {
    /// Creates a pool over a shared engine.
    pub fn new(engine: E, config: PoolConfig) -> Result<Self, PoolError> {
        config.validate()?;

        debug!(
            capacity = config.capacity,
            acquire_timeout_ms = config.acquire_timeout.as_millis() as u64,
            "Session pool created"
        );

        Ok(Self {
            inner: Arc::new(PoolInner {
                engine,
                idle: Mutex::new(Vec::with_capacity(config.capacity)),
                permits: Arc::new(Semaphore::new(config.capacity)),
            }),
            acquire_timeout: config.acquire_timeout,
            capacity: config.capacity,
        })
    }

    /// Acquires an exclusive session, waiting up to the configured timeout
    /// when the pool is at capacity.
    ///
    /// An idle session is reused if available; otherwise a new one is built
    /// via [`ScoringEngine::create_session`]. Construction failure releases
    /// the permit before the error propagates.
    pub async fn acquire(&self) -> Result<PooledSession<E>, PoolError> {
        let permit = timeout(
            self.acquire_timeout,
            Arc::clone(&self.inner.permits).acquire_owned(),
        )
        .await
        .map_err(|_| PoolError::AcquireTimeout {
            waited_ms: self.acquire_timeout.as_millis() as u64,
        })?
        .map_err(|_| PoolError::Closed)?;

        let reused = self.inner.idle.lock().pop();
        let session = match reused {
            Some(session) => session,
            None => self.inner.engine.create_session()?,
        };

        Ok(PooledSession {
            session: Some(session),
            inner: Arc::clone(&self.inner),
            _permit: permit,
        })
    }

    /// Maximum number of concurrent sessions.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Sessions currently parked in the idle list.
    pub fn idle_count(&self) -> usize {
        self.inner.idle.lock().len()
    }
}

/// Scoped session handle; returns the session to the pool on drop.
pub struct PooledSession<E: ScoringEngine> {
    session: Option<E::Session>,
    inner: Arc<PoolInner<E>>,
    // Dropped after the session is back in the idle list (field order), so a
    // waiter woken by the freed permit always finds the session available.
    _permit: OwnedSemaphorePermit,
}

impl<E: ScoringEngine> Deref for PooledSession<E> {
    type Target = E::Session;

    fn deref(&self) -> &Self::Target {
        self.session
            .as_ref()
            .unwrap_or_else(|| unreachable!("session present until drop"))
    }
}

impl<E: ScoringEngine> DerefMut for PooledSession<E> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.session
            .as_mut()
            .unwrap_or_else(|| unreachable!("session present until drop"))
    }
}

impl<E: ScoringEngine> Drop for PooledSession<E> {
    fn drop(&mut self) {
        if let Some(session) = self.session.take() {
            self.inner.idle.lock().push(session);
        }
    }
}
