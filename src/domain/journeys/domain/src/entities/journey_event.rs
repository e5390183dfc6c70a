// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use chrono::{DateTime, Utc};

use crate::{EventID, JourneyKey, Stage, Track};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Provenance note carried by every synthetic event
pub const SYNTHETIC_EVENT_TEXT: &str = "[Auto-generated since the user submitted next stage]";

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// One stage update of a candidate, either reported (real) or fabricated by
/// the stage backfill (synthetic)
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct JourneyEvent {
    pub event_id: EventID,
    pub employer: Option<String>,
    pub candidate: Option<String>,
    pub track: Track,
    pub stage: Stage,
    pub timestamp: Option<DateTime<Utc>>,
    pub is_synthetic: bool,
    pub text: String,
    /// Source channel of real events, absent on synthetic ones
    pub category: Option<String>,
}

impl JourneyEvent {
    /// Key of the journey this event belongs to, `None` when the employer or
    /// the candidate is missing
    pub fn journey_key(&self) -> Option<JourneyKey> {
        let employer = non_blank(self.employer.as_deref())?;
        let candidate = non_blank(self.candidate.as_deref())?;
        Some(JourneyKey::new(employer, candidate, self.track))
    }

    pub fn new_synthetic(
        key: &JourneyKey,
        stage: Stage,
        anchor: Option<DateTime<Utc>>,
        timestamp: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            event_id: EventID::synthetic(key, stage, anchor),
            employer: Some(key.employer.clone()),
            candidate: Some(key.candidate.clone()),
            track: key.track,
            stage,
            timestamp,
            is_synthetic: true,
            text: SYNTHETIC_EVENT_TEXT.to_string(),
            category: None,
        }
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
