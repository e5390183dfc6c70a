// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use dill::*;
use internal_error::ResultIntoInternal;
use jobstats_journeys::*;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::{JourneyLockRegistry, JourneyNormalizationJob};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Batch pass deriving the normalized store from the event store.
///
/// Journeys are independent and run concurrently up to the configured
/// limit. A failing journey is logged and counted, never aborting the pass.
pub struct NormalizeJourneysUseCaseImpl {
    journey_event_repo: Arc<dyn JourneyEventRepository>,
    normalized_event_repo: Arc<dyn NormalizedEventRepository>,
    planner: Arc<StageBackfillPlanner>,
    lock_registry: Arc<JourneyLockRegistry>,
    normalization_config: Arc<NormalizationConfig>,
    retry_config: Arc<StorageRetryConfig>,
}

#[component(pub)]
#[interface(dyn NormalizeJourneysUseCase)]
impl NormalizeJourneysUseCaseImpl {
    pub fn new(
        journey_event_repo: Arc<dyn JourneyEventRepository>,
        normalized_event_repo: Arc<dyn NormalizedEventRepository>,
        planner: Arc<StageBackfillPlanner>,
        lock_registry: Arc<JourneyLockRegistry>,
        normalization_config: Arc<NormalizationConfig>,
        retry_config: Arc<StorageRetryConfig>,
    ) -> Self {
        Self {
            journey_event_repo,
            normalized_event_repo,
            planner,
            lock_registry,
            normalization_config,
            retry_config,
        }
    }

    /// Events without a complete journey key are copied as is
    async fn pass_through_ungroupable(
        &self,
        events: &[JourneyEvent],
        summary: &mut NormalizationSummary,
    ) {
        for chunk in events.chunks(self.normalization_config.write_batch_size.max(1)) {
            let res = self
                .retry_config
                .policy
                .retry_if(
                    || {
                        self.normalized_event_repo
                            .upsert_events(chunk, BatchReporting::Aggregate)
                    },
                    StorageError::is_transient,
                )
                .await;

            match res {
                Ok(batch) => {
                    summary.ungroupable_passed_through += batch.upserted;
                    summary.write_failures += batch.failed;
                }
                Err(err) => {
                    tracing::error!(error = ?err, batch_size = chunk.len(), "Failed to write ungroupable events");
                    summary.write_failures += chunk.len();
                }
            }
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[async_trait::async_trait]
impl NormalizeJourneysUseCase for NormalizeJourneysUseCaseImpl {
    #[tracing::instrument(level = "info", skip_all, name = "NormalizeJourneysUseCaseImpl_execute")]
    async fn execute(
        &self,
        cancellation_token: CancellationToken,
    ) -> Result<NormalizationSummary, NormalizeJourneysError> {
        let mut summary = NormalizationSummary::default();

        let events = self
            .retry_config
            .policy
            .retry_if(
                || self.journey_event_repo.get_real_events(),
                StorageError::is_transient,
            )
            .await
            .context_int_err("loading real events")?;

        let grouped = group_journeys(events);

        tracing::info!(
            num_journeys = grouped.journeys.len(),
            num_ungroupable = grouped.ungroupable.len(),
            "Normalizing journeys",
        );

        self.pass_through_ungroupable(&grouped.ungroupable, &mut summary)
            .await;

        let semaphore = Arc::new(Semaphore::new(
            self.normalization_config.max_concurrency.max(1),
        ));
        let mut join_set = tokio::task::JoinSet::new();

        for journey in grouped.journeys {
            let span = tracing::info_span!("JourneyNormalizationJob", journey = %journey.key);

            let job = JourneyNormalizationJob {
                journey,
                planner: self.planner.clone(),
                normalized_event_repo: self.normalized_event_repo.clone(),
                lock_registry: self.lock_registry.clone(),
                retry_policy: self.retry_config.policy,
                write_batch_size: self.normalization_config.write_batch_size,
            };
            let semaphore = semaphore.clone();
            let cancellation_token = cancellation_token.clone();

            join_set.spawn(
                async move {
                    // Cancellation is honored between journeys, a started
                    // journey always runs to completion
                    let permit = tokio::select! {
                        biased;
                        () = cancellation_token.cancelled() => None,
                        permit = semaphore.acquire_owned() => permit.ok(),
                    };
                    let Some(_permit) = permit else {
                        return JourneyNormalizationOutcome::Skipped;
                    };
                    if cancellation_token.is_cancelled() {
                        return JourneyNormalizationOutcome::Skipped;
                    }

                    job.run().await
                }
                .instrument(span),
            );
        }

        while let Some(res) = join_set.join_next().await {
            match res {
                Ok(outcome) => summary.merge_journey(&outcome),
                Err(err) => {
                    tracing::error!(error = ?err, "Journey normalization task crashed");
                    summary.merge_journey(&JourneyNormalizationOutcome::Failed { write_failures: 0 });
                }
            }
        }

        self.lock_registry.compact();

        summary.cancelled = cancellation_token.is_cancelled();
        if summary.cancelled {
            tracing::warn!(?summary, "Normalization cancelled");
        } else {
            tracing::info!(?summary, "Normalization finished");
        }

        Ok(summary)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
