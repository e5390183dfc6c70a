// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::future::Future;
use std::num::NonZeroUsize;
use std::time::Duration;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Strategy for re-executing a fallible asynchronous operation.
///
/// The policy is decoupled from the operation itself: the caller supplies the
/// operation as a closure and a predicate that decides which errors are worth
/// retrying.
///
/// ```ignore
/// let policy = RetryPolicy::exponential(Duration::from_millis(100), 2.0, Some(5), None);
///
/// let res = policy
///     .retry_if(|| repo.upsert_events(batch.clone()), StorageError::is_transient)
///     .await;
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(
    tag = "type",
    rename_all = "kebab-case",
    rename_all_fields = "kebab-case"
)]
pub enum RetryPolicy {
    /// Fail on the first error
    #[default]
    None,

    /// Retry with the same pause between attempts
    FixedDelay {
        interval: Duration,
        /// Number of retries after the initial attempt. Infinite if unset.
        max_attempts: Option<NonZeroUsize>,
    },

    /// Retry with a pause computed as
    /// `min(last_interval * factor, max_interval)`
    Exponential {
        initial_interval: Duration,
        factor: f32,
        /// Number of retries after the initial attempt. Infinite if unset.
        max_attempts: Option<NonZeroUsize>,
        max_interval: Option<Duration>,
    },
}

impl RetryPolicy {
    pub fn fixed_delay(interval: Duration, max_attempts: Option<usize>) -> Self {
        Self::FixedDelay {
            interval,
            max_attempts: max_attempts.and_then(NonZeroUsize::new),
        }
    }

    pub fn exponential(
        initial_interval: Duration,
        factor: f32,
        max_attempts: Option<usize>,
        max_interval: Option<Duration>,
    ) -> Self {
        Self::Exponential {
            initial_interval,
            factor,
            max_attempts: max_attempts.and_then(NonZeroUsize::new),
            max_interval,
        }
    }

    pub fn max_attempts(&self) -> Option<NonZeroUsize> {
        match self {
            RetryPolicy::None => None,
            RetryPolicy::FixedDelay { max_attempts, .. }
            | RetryPolicy::Exponential { max_attempts, .. } => *max_attempts,
        }
    }

    pub fn iter(&self) -> RetryIter {
        RetryIter {
            policy: *self,
            attempts: 0,
            last_retry: None,
        }
    }

    /// Retries the operation on every error until the policy is exhausted
    pub async fn retry<T, E, F, Fut>(self, operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.retry_if(operation, |_| true).await
    }

    /// Retries the operation only while `condition` accepts the error.
    /// Errors rejected by the condition are returned immediately.
    pub async fn retry_if<T, E, F, Fut, C>(self, mut operation: F, mut condition: C) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        C: FnMut(&E) -> bool,
    {
        let mut retry_iter = self.iter();
        loop {
            match operation().await {
                Ok(res) => return Ok(res),
                Err(err) => {
                    if !condition(&err) {
                        return Err(err);
                    }
                    let Some(pause) = retry_iter.next() else {
                        tracing::debug!(
                            attempts = retry_iter.attempts(),
                            "Retries exhausted"
                        );
                        return Err(err);
                    };
                    tracing::debug!(
                        attempt = retry_iter.attempts(),
                        pause_ms = pause.as_millis(),
                        "Operation failed, retrying after pause"
                    );
                    tokio::time::sleep(pause).await;
                }
            }
        }
    }
}

impl IntoIterator for RetryPolicy {
    type Item = Duration;
    type IntoIter = RetryIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Yields the pause before each subsequent retry
#[derive(Debug)]
pub struct RetryIter {
    policy: RetryPolicy,
    attempts: usize,
    last_retry: Option<Duration>,
}

impl RetryIter {
    /// Number of retries handed out so far
    pub fn attempts(&self) -> usize {
        self.attempts
    }
}

impl Iterator for RetryIter {
    type Item = Duration;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(max_attempts) = self.policy.max_attempts() {
            if self.attempts >= max_attempts.get() {
                return None;
            }
        }

        let next = match self.policy {
            RetryPolicy::None => return None,
            RetryPolicy::FixedDelay { interval, .. } => interval,
            RetryPolicy::Exponential {
                initial_interval,
                factor,
                max_interval,
                ..
            } => {
                let next = match self.last_retry {
                    Some(last) => scale_duration(last, factor),
                    None => initial_interval,
                };
                match max_interval {
                    Some(max_interval) => next.min(max_interval),
                    None => next,
                }
            }
        };

        self.attempts += 1;
        self.last_retry = Some(next);
        Some(next)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn scale_duration(d: Duration, factor: f32) -> Duration {
    let nanos = (d.as_nanos() as f64 * f64::from(factor)).round();
    Duration::from_nanos(nanos.clamp(0.0, u64::MAX as f64) as u64)
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////


////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
