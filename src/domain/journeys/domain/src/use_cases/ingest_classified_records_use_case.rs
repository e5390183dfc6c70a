// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use internal_error::InternalError;
use thiserror::Error;

use crate::{ClassifiedRecord, ProcessingSource};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Idempotent intake of classifier output: every record is processed at most
/// once, no matter how many times it is replayed
#[async_trait::async_trait]
pub trait IngestClassifiedRecordsUseCase: Send + Sync {
    async fn execute(
        &self,
        records: Vec<ClassifiedRecord>,
        options: IngestOptions,
    ) -> Result<IngestSummary, IngestClassifiedRecordsError>;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// Channel the batch was harvested from, used for records that carry
    /// neither a track nor a channel of their own
    pub channel: Option<String>,
    pub source: ProcessingSource,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            channel: None,
            source: ProcessingSource::Parsing,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct IngestSummary {
    pub received: usize,
    pub already_processed: usize,
    pub ignored: usize,
    pub spam: usize,
    pub quarantined: usize,
    pub duplicates: usize,
    pub inserted: usize,
    /// Left unmarked, eligible for the next run
    pub failed: usize,
}

impl IngestSummary {
    /// Accumulates the summary of another batch of the same run
    pub fn merge(&mut self, other: &IngestSummary) {
        self.received += other.received;
        self.already_processed += other.already_processed;
        self.ignored += other.ignored;
        self.spam += other.spam;
        self.quarantined += other.quarantined;
        self.duplicates += other.duplicates;
        self.inserted += other.inserted;
        self.failed += other.failed;
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum IngestClassifiedRecordsError {
    #[error(transparent)]
    Internal(#[from] InternalError),
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
