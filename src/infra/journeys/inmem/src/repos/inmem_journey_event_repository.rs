// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::sync::{Arc, Mutex};

use dill::*;
use jobstats_journeys::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Default)]
struct State {
    events: BTreeMap<EventID, JourneyEvent>,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct InMemoryJourneyEventRepository {
    state: Arc<Mutex<State>>,
}

#[component(pub)]
#[interface(dyn JourneyEventRepository)]
#[scope(Singleton)]
impl InMemoryJourneyEventRepository {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State::default())),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[async_trait::async_trait]
impl JourneyEventRepository for InMemoryJourneyEventRepository {
    async fn save_event(&self, event: &JourneyEvent) -> Result<(), SaveJourneyEventError> {
        let mut guard = self.state.lock().unwrap();

        match guard.events.entry(event.event_id.clone()) {
            Entry::Occupied(_) => Err(SaveJourneyEventError::Duplicate(
                DuplicateJourneyEventError {
                    event_id: event.event_id.clone(),
                },
            )),
            Entry::Vacant(entry) => {
                entry.insert(event.clone());
                Ok(())
            }
        }
    }

    async fn find_event_by_journey_stage(
        &self,
        key: &JourneyKey,
        stage: Stage,
    ) -> Result<Option<EventID>, StorageError> {
        let guard = self.state.lock().unwrap();

        Ok(guard
            .events
            .values()
            .find(|e| e.stage == stage && e.journey_key().as_ref() == Some(key))
            .map(|e| e.event_id.clone()))
    }

    async fn get_real_events(&self) -> Result<Vec<JourneyEvent>, StorageError> {
        let guard = self.state.lock().unwrap();

        Ok(guard
            .events
            .values()
            .filter(|e| !e.event_id.is_in_synthetic_namespace())
            .cloned()
            .collect())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
