// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::path::PathBuf;
use std::time::Duration;

use duration_string::DurationString;
use jobstats_journeys::{
    DEFAULT_IGNORED_AUTHOR,
    DEFAULT_MAX_CONCURRENCY,
    DEFAULT_SYNTHETIC_STEP_DAYS,
    DEFAULT_WRITE_BATCH_SIZE,
};
use merge::Merge;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub const DEFAULT_DATABASE_PATH: &str = "jobstats.db";

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Merge, Serialize, Deserialize)]
#[merge(strategy = merge::option::overwrite_none)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct CLIConfig {
    /// Where journey events, the dedup ledger and the normalized store live
    pub database: Option<DatabaseConfig>,

    /// Ingestion of classifier output
    #[merge(strategy = merge::option::recurse)]
    pub ingest: Option<IngestConfig>,

    /// Synthetic stage generation
    #[merge(strategy = merge::option::recurse)]
    pub backfill: Option<BackfillConfig>,

    /// Normalization batch job
    #[merge(strategy = merge::option::recurse)]
    pub normalization: Option<NormalizationConfig>,

    /// Retries of transient storage failures
    #[merge(strategy = merge::option::recurse)]
    pub retry: Option<RetryConfig>,
}

impl CLIConfig {
    /// Config with every value unset, the shape of a freshly parsed file
    pub fn new() -> Self {
        Self {
            database: None,
            ingest: None,
            backfill: None,
            normalization: None,
            retry: None,
        }
    }

    /// Fills every unset value from the defaults
    pub fn merge_with_defaults(mut self) -> Self {
        self.merge(Self::default());
        self
    }

    pub fn validate(&self) -> Result<(), InvalidConfigError> {
        if let Some(backfill) = &self.backfill {
            if backfill.synthetic_step_days == Some(0) {
                return Err(InvalidConfigError::new(
                    "backfill.syntheticStepDays",
                    "must be at least one day",
                ));
            }
        }

        if let Some(normalization) = &self.normalization {
            if normalization.max_concurrency == Some(0) {
                return Err(InvalidConfigError::new(
                    "normalization.maxConcurrency",
                    "must be positive",
                ));
            }
            if normalization.write_batch_size == Some(0) {
                return Err(InvalidConfigError::new(
                    "normalization.writeBatchSize",
                    "must be positive",
                ));
            }
        }

        if let Some(factor) = self.retry.as_ref().and_then(|r| r.backoff_factor) {
            if !factor.is_finite() || factor < 1.0 {
                return Err(InvalidConfigError::new(
                    "retry.backoffFactor",
                    "must be a finite number not less than 1",
                ));
            }
        }

        Ok(())
    }
}

impl Default for CLIConfig {
    fn default() -> Self {
        Self {
            database: Some(DatabaseConfig::default()),
            ingest: Some(IngestConfig::default()),
            backfill: Some(BackfillConfig::default()),
            normalization: Some(NormalizationConfig::default()),
            retry: Some(RetryConfig::default()),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "camelCase")]
pub enum DatabaseConfig {
    #[serde(rename_all = "camelCase")]
    Sqlite { database_path: PathBuf },
    /// Contents are lost when the process exits
    InMemory,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::Sqlite {
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Merge, Serialize, Deserialize)]
#[merge(strategy = merge::option::overwrite_none)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct IngestConfig {
    /// Authors whose messages are never journey events
    pub ignored_authors: Option<Vec<String>>,
    /// Channel assumed for records that name neither a track nor a channel
    pub default_channel: Option<String>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            ignored_authors: Some(vec![DEFAULT_IGNORED_AUTHOR.to_string()]),
            default_channel: None,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Merge, Serialize, Deserialize)]
#[merge(strategy = merge::option::overwrite_none)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct BackfillConfig {
    /// Days between consecutive synthetic stages
    pub synthetic_step_days: Option<u32>,
}

impl Default for BackfillConfig {
    fn default() -> Self {
        Self {
            synthetic_step_days: Some(DEFAULT_SYNTHETIC_STEP_DAYS),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Merge, Serialize, Deserialize)]
#[merge(strategy = merge::option::overwrite_none)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct NormalizationConfig {
    /// Journeys normalized at the same time
    pub max_concurrency: Option<usize>,
    /// Documents per normalized store write
    pub write_batch_size: Option<usize>,
}

impl Default for NormalizationConfig {
    fn default() -> Self {
        Self {
            max_concurrency: Some(DEFAULT_MAX_CONCURRENCY),
            write_batch_size: Some(DEFAULT_WRITE_BATCH_SIZE),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Merge, Serialize, Deserialize)]
#[merge(strategy = merge::option::overwrite_none)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct RetryConfig {
    pub initial_interval: Option<DurationString>,
    pub backoff_factor: Option<f32>,
    /// Retries after the first attempt
    pub max_attempts: Option<usize>,
    pub max_interval: Option<DurationString>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            initial_interval: Some(DurationString::new(Duration::from_millis(200))),
            backoff_factor: Some(2.0),
            max_attempts: Some(5),
            max_interval: Some(DurationString::new(Duration::from_secs(10))),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Invalid config value '{key}': {reason}")]
pub struct InvalidConfigError {
    pub key: &'static str,
    pub reason: &'static str,
}

impl InvalidConfigError {
    fn new(key: &'static str, reason: &'static str) -> Self {
        Self { key, reason }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
