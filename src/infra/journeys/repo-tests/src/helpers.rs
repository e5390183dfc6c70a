// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use chrono::{DateTime, Duration, TimeZone, Utc};
use jobstats_journeys::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub(crate) fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
}

pub(crate) fn real_event(
    id: &str,
    employer: &str,
    candidate: &str,
    track: Track,
    stage: Stage,
    timestamp: Option<DateTime<Utc>>,
) -> JourneyEvent {
    JourneyEvent {
        event_id: EventID::new(id),
        employer: Some(employer.to_string()),
        candidate: Some(candidate.to_string()),
        track,
        stage,
        timestamp,
        is_synthetic: false,
        text: format!("{candidate} got {stage} at {employer}"),
        category: Some("intern-2024".to_string()),
    }
}

pub(crate) fn synthetic_event(key: &JourneyKey, stage: Stage, anchor: DateTime<Utc>, steps: i64) -> JourneyEvent {
    JourneyEvent::new_synthetic(
        key,
        stage,
        Some(anchor),
        Some(anchor - Duration::days(3 * steps)),
    )
}

pub(crate) fn ids(events: &[JourneyEvent]) -> Vec<&str> {
    events.iter().map(|e| e.event_id.as_str()).collect()
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
