// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::BTreeMap;

use crate::{Journey, JourneyEvent, JourneyKey};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Default)]
pub struct GroupedJourneys {
    /// Ordered by journey key
    pub journeys: Vec<Journey>,
    /// Events without a well-defined journey key, never backfilled
    pub ungroupable: Vec<JourneyEvent>,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Partitions real events into journeys by (employer, candidate, track)
pub fn group_journeys(events: impl IntoIterator<Item = JourneyEvent>) -> GroupedJourneys {
    let mut by_key: BTreeMap<JourneyKey, Vec<JourneyEvent>> = BTreeMap::new();
    let mut ungroupable = Vec::new();

    for event in events {
        match event.journey_key() {
            Some(key) => by_key.entry(key).or_default().push(event),
            None => ungroupable.push(event),
        }
    }

    GroupedJourneys {
        journeys: by_key
            .into_iter()
            .map(|(key, events)| Journey::new(key, events))
            .collect(),
        ungroupable,
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
