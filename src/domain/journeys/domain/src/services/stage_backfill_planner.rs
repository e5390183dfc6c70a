// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dill::*;
use thiserror::Error;

use crate::{BackfillConfig, EventID, Journey, JourneyEvent, JourneyKey, STAGE_ORDER, Stage};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Synthetic events computed for one journey
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackfillPlan {
    pub key: JourneyKey,
    /// Real stages of the journey that belong to the stage order
    pub present: BTreeSet<Stage>,
    /// Exclusive upper bound of the backfilled range in the stage order
    pub target_index: usize,
    /// Time synthetic timestamps and ids are derived from
    pub anchor: Option<DateTime<Utc>>,
    /// Ordered by stage order
    pub synthetic_events: Vec<JourneyEvent>,
}

impl BackfillPlan {
    fn empty(key: JourneyKey, present: BTreeSet<Stage>) -> Self {
        Self {
            key,
            present,
            target_index: 0,
            anchor: None,
            synthetic_events: Vec::new(),
        }
    }

    pub fn synthetic_ids(&self) -> BTreeSet<EventID> {
        self.synthetic_events
            .iter()
            .map(|e| e.event_id.clone())
            .collect()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Computes which earlier pipeline stages are implied by the stages a
/// candidate actually reported and materializes them as synthetic events.
///
/// The computation is a pure function of the journey's real events, so
/// planning the same journey twice yields identical ids, stages and
/// timestamps.
pub struct StageBackfillPlanner {
    config: Arc<BackfillConfig>,
}

#[component(pub)]
impl StageBackfillPlanner {
    pub fn new(config: Arc<BackfillConfig>) -> Self {
        Self { config }
    }

    pub fn plan(&self, journey: &Journey) -> BackfillPlan {
        let present: BTreeSet<Stage> = journey
            .real_stages()
            .into_iter()
            .filter(|s| s.order_index().is_some())
            .collect();

        // Covers the application-only journey as well
        if present.is_empty() {
            return BackfillPlan::empty(journey.key.clone(), present);
        }

        let (target_index, boundary_stage) = Self::target_index(&present);

        let anchor = journey
            .latest_real_timestamp_at(boundary_stage)
            .or_else(|| journey.latest_real_timestamp());

        let to_synthesize: Vec<Stage> = STAGE_ORDER[..target_index]
            .iter()
            .copied()
            .filter(|s| !s.is_never_autogen() && !present.contains(s))
            .collect();

        let mut synthetic_events = Vec::with_capacity(to_synthesize.len());

        // Walk from the boundary down, so that every synthetic stage lands
        // one step before the nearest later stage, real or synthetic
        let mut cursor = anchor;
        for stage in STAGE_ORDER[..target_index].iter().rev() {
            if to_synthesize.contains(stage) {
                cursor = cursor.map(|t| t - self.config.synthetic_step);
                synthetic_events.push(JourneyEvent::new_synthetic(
                    &journey.key,
                    *stage,
                    anchor,
                    cursor,
                ));
            } else if let Some(real_ts) = journey.latest_real_timestamp_at(*stage) {
                cursor = cursor.map(|c| c.min(real_ts));
            }
        }
        synthetic_events.reverse();

        tracing::debug!(
            journey = %journey.key,
            ?present,
            target_index,
            ?anchor,
            synthesized = synthetic_events.len(),
            "Planned stage backfill"
        );

        BackfillPlan {
            key: journey.key.clone(),
            present,
            target_index,
            anchor,
            synthetic_events,
        }
    }

    /// Highest stage-order position the backfill should reach (exclusive)
    /// together with the stage whose timestamp anchors the synthetic ones.
    ///
    /// A known rejection caps the reach at the highest real stage below it.
    /// Without such a stage the earliest screening stage is assumed.
    fn target_index(present: &BTreeSet<Stage>) -> (usize, Stage) {
        let reject_idx = order_index_of(Stage::Reject);

        if !present.contains(&Stage::Reject) {
            let boundary = present
                .iter()
                .copied()
                .max_by_key(|s| s.order_index())
                .unwrap_or(Stage::OnlineAssessment);
            return (order_index_of(boundary), boundary);
        }

        match present
            .iter()
            .copied()
            .filter(|s| order_index_of(*s) < reject_idx)
            .max_by_key(|s| s.order_index())
        {
            Some(boundary) => (order_index_of(boundary), boundary),
            None => (order_index_of(Stage::OnlineAssessment) + 1, Stage::Reject),
        }
    }

    /// Checks a plan against the journey it was computed for. A violation
    /// aborts the backfill of that journey only.
    pub fn validate(
        &self,
        journey: &Journey,
        plan: &BackfillPlan,
    ) -> Result<(), BackfillInvariantViolation> {
        let violation = |reason: String| BackfillInvariantViolation {
            key: journey.key.clone(),
            reason,
        };

        let real_stages = journey.real_stages();
        let mut seen = BTreeSet::new();
        let mut previous: Option<&JourneyEvent> = None;

        for event in &plan.synthetic_events {
            if !event.is_synthetic || !event.event_id.is_in_synthetic_namespace() {
                return Err(violation(format!(
                    "Event '{}' is not a synthetic event",
                    event.event_id
                )));
            }
            if event.journey_key().as_ref() != Some(&journey.key) {
                return Err(violation(format!(
                    "Event '{}' belongs to a different journey",
                    event.event_id
                )));
            }
            if event.stage.is_never_autogen() {
                return Err(violation(format!(
                    "Stage '{}' must never be synthesized",
                    event.stage
                )));
            }
            if real_stages.contains(&event.stage) {
                return Err(violation(format!(
                    "Stage '{}' is already reported",
                    event.stage
                )));
            }
            if !seen.insert(event.stage) {
                return Err(violation(format!(
                    "Stage '{}' is synthesized twice",
                    event.stage
                )));
            }
            if order_index_of(event.stage) >= plan.target_index {
                return Err(violation(format!(
                    "Stage '{}' is beyond the backfill boundary",
                    event.stage
                )));
            }

            if let Some(ts) = event.timestamp {
                if plan.anchor.is_some_and(|anchor| ts >= anchor) {
                    return Err(violation(format!(
                        "Synthetic stage '{}' is not earlier than the anchor",
                        event.stage
                    )));
                }
                if let Some(prev) = previous {
                    if prev.timestamp.is_some_and(|prev_ts| prev_ts >= ts) {
                        return Err(violation(format!(
                            "Synthetic stage '{}' is not later than '{}'",
                            event.stage, prev.stage
                        )));
                    }
                }
            }

            previous = Some(event);
        }

        Ok(())
    }
}

/// Only called for stages that belong to the order
fn order_index_of(stage: Stage) -> usize {
    stage.order_index().unwrap_or(usize::MAX)
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Backfill of journey '{key}' aborted: {reason}")]
pub struct BackfillInvariantViolation {
    pub key: JourneyKey,
    pub reason: String,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
