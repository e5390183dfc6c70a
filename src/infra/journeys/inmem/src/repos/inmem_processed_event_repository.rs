// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Arc, Mutex};

use dill::*;
use jobstats_journeys::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Default)]
struct State {
    entries: HashMap<EventID, ProcessedEventEntry>,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct InMemoryProcessedEventRepository {
    state: Arc<Mutex<State>>,
}

#[component(pub)]
#[interface(dyn ProcessedEventRepository)]
#[scope(Singleton)]
impl InMemoryProcessedEventRepository {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State::default())),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[async_trait::async_trait]
impl ProcessedEventRepository for InMemoryProcessedEventRepository {
    async fn is_processed(&self, event_id: &EventID) -> Result<bool, StorageError> {
        let guard = self.state.lock().unwrap();
        Ok(guard.entries.contains_key(event_id))
    }

    async fn are_processed(
        &self,
        event_ids: &[EventID],
    ) -> Result<HashMap<EventID, bool>, StorageError> {
        let guard = self.state.lock().unwrap();
        Ok(event_ids
            .iter()
            .map(|id| (id.clone(), guard.entries.contains_key(id)))
            .collect())
    }

    async fn mark_processed(
        &self,
        entry: ProcessedEventEntry,
    ) -> Result<MarkProcessedOutcome, StorageError> {
        let mut guard = self.state.lock().unwrap();

        match guard.entries.entry(entry.event_id.clone()) {
            Entry::Occupied(_) => Ok(MarkProcessedOutcome::AlreadyMarked),
            Entry::Vacant(vacant) => {
                vacant.insert(entry);
                Ok(MarkProcessedOutcome::Marked)
            }
        }
    }

    async fn get_entry(
        &self,
        event_id: &EventID,
    ) -> Result<Option<ProcessedEventEntry>, StorageError> {
        let guard = self.state.lock().unwrap();
        Ok(guard.entries.get(event_id).cloned())
    }

    async fn get_stats(&self) -> Result<ProcessedLedgerStats, StorageError> {
        let guard = self.state.lock().unwrap();

        let mut stats = ProcessedLedgerStats::default();
        for entry in guard.entries.values() {
            stats.total += 1;
            *stats.by_outcome.entry(entry.outcome).or_default() += 1;
        }
        Ok(stats)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
