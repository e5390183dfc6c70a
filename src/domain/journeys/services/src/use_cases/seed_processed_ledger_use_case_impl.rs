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
use time_source::SystemTimeSource;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Marks every event already present in the event store as processed, so
/// that a ledger introduced after the fact does not re-ingest them.
pub struct SeedProcessedLedgerUseCaseImpl {
    journey_event_repo: Arc<dyn JourneyEventRepository>,
    processed_event_repo: Arc<dyn ProcessedEventRepository>,
    time_source: Arc<dyn SystemTimeSource>,
    retry_config: Arc<StorageRetryConfig>,
}

#[component(pub)]
#[interface(dyn SeedProcessedLedgerUseCase)]
impl SeedProcessedLedgerUseCaseImpl {
    pub fn new(
        journey_event_repo: Arc<dyn JourneyEventRepository>,
        processed_event_repo: Arc<dyn ProcessedEventRepository>,
        time_source: Arc<dyn SystemTimeSource>,
        retry_config: Arc<StorageRetryConfig>,
    ) -> Self {
        Self {
            journey_event_repo,
            processed_event_repo,
            time_source,
            retry_config,
        }
    }
}

#[async_trait::async_trait]
impl SeedProcessedLedgerUseCase for SeedProcessedLedgerUseCaseImpl {
    #[tracing::instrument(level = "info", skip_all, name = "SeedProcessedLedgerUseCaseImpl_execute")]
    async fn execute(&self) -> Result<LedgerSeedSummary, SeedProcessedLedgerError> {
        let events = self
            .retry_config
            .policy
            .retry_if(
                || self.journey_event_repo.get_real_events(),
                StorageError::is_transient,
            )
            .await
            .context_int_err("loading real events")?;

        let mut summary = LedgerSeedSummary {
            scanned: events.len(),
            ..Default::default()
        };

        for event in events {
            let processed_at = event.timestamp.unwrap_or_else(|| self.time_source.now());

            let outcome = self
                .retry_config
                .policy
                .retry_if(
                    || {
                        self.processed_event_repo.mark_processed(ProcessedEventEntry {
                            event_id: event.event_id.clone(),
                            processed_at,
                            outcome: ClassificationOutcome::Accepted,
                            source: ProcessingSource::Migration,
                        })
                    },
                    StorageError::is_transient,
                )
                .await
                .context_int_err(format!("marking event {} as processed", event.event_id))?;

            match outcome {
                MarkProcessedOutcome::Marked => summary.newly_marked += 1,
                MarkProcessedOutcome::AlreadyMarked => summary.already_marked += 1,
            }
        }

        tracing::info!(?summary, "Processed ledger seeded");

        Ok(summary)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
