// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::HashSet;
use std::sync::Arc;

use async_utils::RetryPolicy;
use jobstats_journeys::*;

use crate::JourneyLockRegistry;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Normalizes a single journey: backfills the implied stages, writes real and
/// synthetic events to the normalized store and prunes synthetic events a
/// previous run produced that the current plan no longer contains.
///
/// Owns everything it needs so it can run on its own task.
pub struct JourneyNormalizationJob {
    pub journey: Journey,
    pub planner: Arc<StageBackfillPlanner>,
    pub normalized_event_repo: Arc<dyn NormalizedEventRepository>,
    pub lock_registry: Arc<JourneyLockRegistry>,
    pub retry_policy: RetryPolicy,
    pub write_batch_size: usize,
}

impl JourneyNormalizationJob {
    pub async fn run(self) -> JourneyNormalizationOutcome {
        let key = self.journey.key.clone();
        let _guard = self.lock_registry.lock(&key).await;

        let plan = self.planner.plan(&self.journey);
        if let Err(violation) = self.planner.validate(&self.journey, &plan) {
            tracing::error!(journey = %key, error = %violation, "Backfill plan rejected, journey left untouched");
            return JourneyNormalizationOutcome::Failed { write_failures: 0 };
        }

        let synthetic_ids = plan.synthetic_ids();

        let documents: Vec<JourneyEvent> = self
            .journey
            .events
            .iter()
            .cloned()
            .chain(plan.synthetic_events.iter().cloned())
            .collect();

        let mut failed_ids = HashSet::new();
        for chunk in documents.chunks(self.write_batch_size.max(1)) {
            let res = self
                .retry_policy
                .retry_if(
                    || {
                        self.normalized_event_repo
                            .upsert_events(chunk, BatchReporting::PerItem)
                    },
                    StorageError::is_transient,
                )
                .await;

            match res {
                Ok(batch) => {
                    for failure in batch.failures.unwrap_or_default() {
                        tracing::warn!(
                            journey = %key,
                            event_id = %failure.event_id,
                            reason = %failure.reason,
                            "Event rejected by the normalized store",
                        );
                        failed_ids.insert(failure.event_id);
                    }
                }
                Err(err) => {
                    tracing::error!(journey = %key, error = ?err, "Failed to write journey batch");
                    return JourneyNormalizationOutcome::Failed {
                        write_failures: failed_ids.len(),
                    };
                }
            }
        }

        let stale_synthetic_pruned = match self.prune_stale_synthetic(&key, &synthetic_ids).await {
            Ok(pruned) => pruned,
            Err(err) => {
                tracing::error!(journey = %key, error = ?err, "Failed to prune stale synthetic events");
                return JourneyNormalizationOutcome::Failed {
                    write_failures: failed_ids.len(),
                };
            }
        };

        let synthetic_added = synthetic_ids
            .iter()
            .filter(|id| !failed_ids.contains(*id))
            .count();
        let real_passed_through = self
            .journey
            .events
            .iter()
            .filter(|e| !failed_ids.contains(&e.event_id))
            .count();

        tracing::debug!(
            journey = %key,
            synthetic_added,
            real_passed_through,
            stale_synthetic_pruned,
            "Journey normalized",
        );

        JourneyNormalizationOutcome::Normalized {
            synthetic_added,
            real_passed_through,
            stale_synthetic_pruned,
            write_failures: failed_ids.len(),
        }
    }

    async fn prune_stale_synthetic(
        &self,
        key: &JourneyKey,
        keep: &std::collections::BTreeSet<EventID>,
    ) -> Result<u64, StorageError> {
        let stored = self
            .retry_policy
            .retry_if(
                || self.normalized_event_repo.list_synthetic_event_ids(key),
                StorageError::is_transient,
            )
            .await?;

        let stale: Vec<EventID> = stored.into_iter().filter(|id| !keep.contains(id)).collect();
        if stale.is_empty() {
            return Ok(0);
        }

        tracing::info!(journey = %key, num_stale = stale.len(), "Pruning stale synthetic events");

        self.retry_policy
            .retry_if(
                || self.normalized_event_repo.delete_events(&stale),
                StorageError::is_transient,
            )
            .await
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
