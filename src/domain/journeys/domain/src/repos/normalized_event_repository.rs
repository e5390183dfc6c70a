// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use crate::{EventID, JourneyEvent, JourneyEventFilter, JourneyKey, StorageError};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Merge sink holding the backfilled view consumed by reporting.
///
/// Writes are keyed by event id: an upsert replaces the stored document with
/// the given values or inserts it when absent, never appends.
#[cfg_attr(any(feature = "testing", test), mockall::automock)]
#[async_trait::async_trait]
pub trait NormalizedEventRepository: Send + Sync {
    /// Best-effort batch: documents that violate a constraint are skipped and
    /// reported, the rest of the batch is still committed.
    ///
    /// Returns an error only when the whole batch could not be applied, in
    /// which case none of it is assumed to be written.
    async fn upsert_events(
        &self,
        events: &[JourneyEvent],
        reporting: BatchReporting,
    ) -> Result<UpsertBatchResult, StorageError>;

    async fn list_synthetic_event_ids(&self, key: &JourneyKey)
    -> Result<Vec<EventID>, StorageError>;

    /// Returns number of documents actually removed
    async fn delete_events(&self, event_ids: &[EventID]) -> Result<u64, StorageError>;

    /// Ordered by timestamp (missing last), then event id
    async fn list_events(
        &self,
        filter: &JourneyEventFilter,
    ) -> Result<Vec<JourneyEvent>, StorageError>;

    /// Ordered by stage order, then timestamp
    async fn list_journey_events(&self, key: &JourneyKey)
    -> Result<Vec<JourneyEvent>, StorageError>;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum BatchReporting {
    /// Only counts are returned
    #[default]
    Aggregate,
    /// Every failed document is listed with its reason
    PerItem,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpsertBatchResult {
    pub upserted: usize,
    pub failed: usize,
    /// Present only with [`BatchReporting::PerItem`]
    pub failures: Option<Vec<UpsertFailure>>,
}

impl UpsertBatchResult {
    pub fn new(reporting: BatchReporting) -> Self {
        Self {
            upserted: 0,
            failed: 0,
            failures: match reporting {
                BatchReporting::Aggregate => None,
                BatchReporting::PerItem => Some(Vec::new()),
            },
        }
    }

    pub fn record_success(&mut self) {
        self.upserted += 1;
    }

    pub fn record_failure(&mut self, event_id: &EventID, reason: impl Into<String>) {
        self.failed += 1;
        if let Some(failures) = self.failures.as_mut() {
            failures.push(UpsertFailure {
                event_id: event_id.clone(),
                reason: reason.into(),
            });
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertFailure {
    pub event_id: EventID,
    pub reason: String,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Rule enforced by every normalized store: synthetic documents never carry
/// a stage from the never-autogen set.
/// Returns the violation reason, if any.
pub fn check_normalized_event_constraints(event: &JourneyEvent) -> Option<String> {
    if event.event_id.is_empty() {
        return Some("Empty event id".to_string());
    }
    if event.is_synthetic && event.stage.is_never_autogen() {
        return Some(format!(
            "Synthetic event cannot have stage '{}'",
            event.stage
        ));
    }
    None
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
