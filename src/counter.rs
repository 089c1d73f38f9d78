//! Hit counter with bounded retry.
//!
//! Each call increments one named counter in the store. Connection failures
//! are retried a fixed number of times with a fixed delay; any other failure
//! is returned immediately. When the budget runs out the last connection
//! error is returned as-is.

use std::sync::Arc;
use std::time::Duration;

use redis::RedisError;
use tracing::instrument;

use crate::config::CounterConfig;
use crate::store::CounterStore;

/// Failure of a single counter operation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CounterError {
    /// The store could not be reached. Retryable.
    #[error("cache connection error: {0}")]
    Connection(String),

    /// The store was reached but the operation failed.
    #[error("cache error: {0}")]
    Store(String),
}

impl CounterError {
    pub fn is_connection(&self) -> bool {
        matches!(self, CounterError::Connection(_))
    }
}

impl From<RedisError> for CounterError {
    fn from(e: RedisError) -> Self {
        if e.is_io_error() || e.is_connection_refusal() || e.is_connection_dropped() {
            CounterError::Connection(e.to_string())
        } else {
            CounterError::Store(e.to_string())
        }
    }
}

/// Fixed-delay retry policy for connection failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts allowed after the first failure
    pub retries: u32,
    /// Wait before each extra attempt
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &CounterConfig) -> Self {
        Self {
            retries: config.retries,
            delay: config.retry_delay(),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&CounterConfig::default())
    }
}

/// Counts hits in an external store.
///
/// Cheap to clone; clones share the same store handle.
#[derive(Clone)]
pub struct HitCounter {
    store: Arc<dyn CounterStore>,
    key: String,
    policy: RetryPolicy,
}

impl HitCounter {
    pub fn new(store: Arc<dyn CounterStore>, key: impl Into<String>, policy: RetryPolicy) -> Self {
        Self {
            store,
            key: key.into(),
            policy,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Increment the counter and return its new value.
    #[instrument(name = "counter.incr", skip(self), fields(key = %self.key))]
    pub async fn increment_and_get(&self) -> Result<i64, CounterError> {
        let mut retries = self.policy.retries;
        let mut attempt = 1u32;

        loop {
            match self.store.incr(&self.key).await {
                Ok(count) => {
                    tracing::debug!(count, attempt, "Counter incremented");
                    return Ok(count);
                }
                Err(CounterError::Connection(reason)) if retries > 0 => {
                    retries -= 1;
                    tracing::warn!(
                        attempt,
                        retries_left = retries,
                        error = %reason,
                        "Cache unreachable, retrying"
                    );
                    tokio::time::sleep(self.policy.delay).await;
                    attempt += 1;
                }
                Err(err @ CounterError::Connection(_)) => {
                    tracing::error!(attempt, error = %err, "Cache unreachable, giving up");
                    return Err(err);
                }
                Err(err) => return Err(err),
            }
        }
    }
}
