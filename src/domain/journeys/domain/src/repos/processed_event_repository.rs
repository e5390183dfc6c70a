// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::HashMap;

use crate::{EventID, MarkProcessedOutcome, ProcessedEventEntry, ProcessedLedgerStats, StorageError};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Dedup ledger: write-once set of event ids that were already processed.
/// Existence of an entry is the only gate against reprocessing.
#[cfg_attr(any(feature = "testing", test), mockall::automock)]
#[async_trait::async_trait]
pub trait ProcessedEventRepository: Send + Sync {
    async fn is_processed(&self, event_id: &EventID) -> Result<bool, StorageError>;

    /// Batch check, the result has an entry for every requested id
    async fn are_processed(
        &self,
        event_ids: &[EventID],
    ) -> Result<HashMap<EventID, bool>, StorageError>;

    /// Safe to call concurrently for the same id: the losing writer observes
    /// [`MarkProcessedOutcome::AlreadyMarked`]
    async fn mark_processed(
        &self,
        entry: ProcessedEventEntry,
    ) -> Result<MarkProcessedOutcome, StorageError>;

    async fn get_entry(&self, event_id: &EventID)
    -> Result<Option<ProcessedEventEntry>, StorageError>;

    async fn get_stats(&self) -> Result<ProcessedLedgerStats, StorageError>;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
