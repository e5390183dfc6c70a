// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::{JourneyEvent, Stage, Track};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JourneyKey {
    pub employer: String,
    pub candidate: String,
    pub track: Track,
}

impl JourneyKey {
    pub fn new(employer: impl Into<String>, candidate: impl Into<String>, track: Track) -> Self {
        Self {
            employer: employer.into(),
            candidate: candidate.into(),
            track,
        }
    }
}

impl std::fmt::Display for JourneyKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.employer, self.candidate, self.track)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// All real events sharing one (employer, candidate, track) key.
/// Computed on demand, never persisted as such.
#[derive(Debug, Clone)]
pub struct Journey {
    pub key: JourneyKey,
    pub events: Vec<JourneyEvent>,
}

impl Journey {
    pub fn new(key: JourneyKey, events: Vec<JourneyEvent>) -> Self {
        Self { key, events }
    }

    fn real_events(&self) -> impl Iterator<Item = &JourneyEvent> {
        self.events.iter().filter(|e| !e.is_synthetic)
    }

    /// Distinct real stages observed in this journey
    pub fn real_stages(&self) -> BTreeSet<Stage> {
        self.real_events().map(|e| e.stage).collect()
    }

    pub fn latest_real_timestamp(&self) -> Option<DateTime<Utc>> {
        self.real_events().filter_map(|e| e.timestamp).max()
    }

    pub fn latest_real_timestamp_at(&self, stage: Stage) -> Option<DateTime<Utc>> {
        self.real_events()
            .filter(|e| e.stage == stage)
            .filter_map(|e| e.timestamp)
            .max()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
