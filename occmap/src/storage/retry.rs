//! Bounded retry with exponential backoff around a gateway.
//!
//! Only [`StorageError::Unavailable`] is retried. Each attempt is bounded
//! by a timeout; a timed-out attempt counts as unavailable.

use super::points::PointFeatures;
use super::types::{StorageError, StorageGateway};
use crate::coord::TileAddress;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Retry settings for store reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    base_backoff: Duration,
    attempt_timeout: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_backoff: Duration, attempt_timeout: Duration) -> Self {
        Self {
            max_retries,
            base_backoff,
            attempt_timeout,
        }
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Delay before retry number `attempt + 1`: `base * 2^attempt`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_backoff.saturating_mul(1 << attempt.min(16))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(100), Duration::from_secs(10))
    }
}

/// Wraps a gateway so transient failures are retried.
pub struct RetryingGateway<G> {
    inner: G,
    policy: RetryPolicy,
}

impl<G: StorageGateway> RetryingGateway<G> {
    pub fn new(inner: G, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn inner(&self) -> &G {
        &self.inner
    }

    async fn with_retry<T, F, Fut>(&self, op: &str, dataset_key: &str, f: F) -> Result<T, StorageError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, StorageError>>,
    {
        let mut attempt = 0;
        loop {
            let error = match tokio::time::timeout(self.policy.attempt_timeout, f()).await {
                Ok(Ok(value)) => return Ok(value),
                Ok(Err(e)) if !e.is_retryable() => return Err(e),
                Ok(Err(e)) => e,
                Err(_) => StorageError::Unavailable(format!(
                    "{} timed out after {:?}",
                    op, self.policy.attempt_timeout
                )),
            };

            if attempt >= self.policy.max_retries {
                warn!(op, dataset_key, attempts = attempt + 1, error = %error, "Store read failed, giving up");
                return Err(error);
            }

            let backoff = self.policy.backoff(attempt);
            debug!(op, dataset_key, attempt = attempt + 1, ?backoff, error = %error, "Store read failed, retrying");
            tokio::time::sleep(backoff).await;
            attempt += 1;
        }
    }
}

impl<G: StorageGateway> StorageGateway for RetryingGateway<G> {
    async fn lookup_points(&self, dataset_key: &str) -> Result<Option<PointFeatures>, StorageError> {
        self.with_retry("lookup_points", dataset_key, || {
            self.inner.lookup_points(dataset_key)
        })
        .await
    }

    async fn lookup_pretiled(
        &self,
        dataset_key: &str,
        address: &TileAddress,
    ) -> Result<Option<Vec<u8>>, StorageError> {
        self.with_retry("lookup_pretiled", dataset_key, || {
            self.inner.lookup_pretiled(dataset_key, address)
        })
        .await
    }
}
