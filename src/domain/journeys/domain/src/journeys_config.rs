// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::time::Duration;

use async_utils::RetryPolicy;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub const DEFAULT_SYNTHETIC_STEP_DAYS: u32 = 3;
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;
pub const DEFAULT_WRITE_BATCH_SIZE: usize = 5000;
pub const DEFAULT_IGNORED_AUTHOR: &str = "leetbot";

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone)]
pub struct BackfillConfig {
    /// Distance between consecutive synthetic timestamps
    pub synthetic_step: chrono::Duration,
}

impl BackfillConfig {
    pub fn new(synthetic_step_days: u32) -> Self {
        Self {
            synthetic_step: chrono::Duration::days(i64::from(synthetic_step_days)),
        }
    }
}

impl Default for BackfillConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SYNTHETIC_STEP_DAYS)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone)]
pub struct NormalizationConfig {
    pub max_concurrency: usize,
    pub write_batch_size: usize,
}

impl Default for NormalizationConfig {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            write_batch_size: DEFAULT_WRITE_BATCH_SIZE,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Accounts whose messages are never journey events (bots)
    pub ignored_authors: Vec<String>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            ignored_authors: vec![DEFAULT_IGNORED_AUTHOR.to_string()],
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Retry policy applied to ledger and store calls on transient failures
#[derive(Debug, Clone)]
pub struct StorageRetryConfig {
    pub policy: RetryPolicy,
}

impl StorageRetryConfig {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }
}

impl Default for StorageRetryConfig {
    fn default() -> Self {
        Self {
            policy: RetryPolicy::exponential(
                Duration::from_millis(200),
                2.0,
                Some(5),
                Some(Duration::from_secs(10)),
            ),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
