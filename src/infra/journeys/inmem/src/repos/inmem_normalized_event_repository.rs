// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use dill::*;
use jobstats_journeys::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Default)]
struct State {
    events: HashMap<EventID, JourneyEvent>,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct InMemoryNormalizedEventRepository {
    state: Arc<Mutex<State>>,
}

#[component(pub)]
#[interface(dyn NormalizedEventRepository)]
#[scope(Singleton)]
impl InMemoryNormalizedEventRepository {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State::default())),
        }
    }

    /// Timestamp ascending with missing timestamps last, then event id
    fn sort_by_time(events: &mut [JourneyEvent]) {
        events.sort_by(|a, b| {
            (a.timestamp.is_none(), a.timestamp, &a.event_id).cmp(&(
                b.timestamp.is_none(),
                b.timestamp,
                &b.event_id,
            ))
        });
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[async_trait::async_trait]
impl NormalizedEventRepository for InMemoryNormalizedEventRepository {
    async fn upsert_events(
        &self,
        events: &[JourneyEvent],
        reporting: BatchReporting,
    ) -> Result<UpsertBatchResult, StorageError> {
        let mut guard = self.state.lock().unwrap();

        let mut result = UpsertBatchResult::new(reporting);
        for event in events {
            if let Some(reason) = check_normalized_event_constraints(event) {
                result.record_failure(&event.event_id, reason);
                continue;
            }
            guard.events.insert(event.event_id.clone(), event.clone());
            result.record_success();
        }

        Ok(result)
    }

    async fn list_synthetic_event_ids(
        &self,
        key: &JourneyKey,
    ) -> Result<Vec<EventID>, StorageError> {
        let guard = self.state.lock().unwrap();

        let mut ids: Vec<EventID> = guard
            .events
            .values()
            .filter(|e| e.is_synthetic && e.journey_key().as_ref() == Some(key))
            .map(|e| e.event_id.clone())
            .collect();
        ids.sort();
        Ok(ids)
    }

    async fn delete_events(&self, event_ids: &[EventID]) -> Result<u64, StorageError> {
        let mut guard = self.state.lock().unwrap();

        let mut removed = 0;
        for id in event_ids {
            if guard.events.remove(id).is_some() {
                removed += 1;
            }
        }
        Ok(removed)
    }

    async fn list_events(
        &self,
        filter: &JourneyEventFilter,
    ) -> Result<Vec<JourneyEvent>, StorageError> {
        let guard = self.state.lock().unwrap();

        let mut events: Vec<JourneyEvent> = guard
            .events
            .values()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();
        Self::sort_by_time(&mut events);
        Ok(events)
    }

    async fn list_journey_events(
        &self,
        key: &JourneyKey,
    ) -> Result<Vec<JourneyEvent>, StorageError> {
        let guard = self.state.lock().unwrap();

        let mut events: Vec<JourneyEvent> = guard
            .events
            .values()
            .filter(|e| e.journey_key().as_ref() == Some(key))
            .cloned()
            .collect();
        Self::sort_by_time(&mut events);
        events.sort_by_key(|e| e.stage.sort_key());
        Ok(events)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
