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

use dill::*;
use internal_error::ResultIntoInternal;
use jobstats_journeys::*;
use time_source::SystemTimeSource;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct IngestClassifiedRecordsUseCaseImpl {
    journey_event_repo: Arc<dyn JourneyEventRepository>,
    processed_event_repo: Arc<dyn ProcessedEventRepository>,
    time_source: Arc<dyn SystemTimeSource>,
    ingest_config: Arc<IngestConfig>,
    retry_config: Arc<StorageRetryConfig>,
}

#[component(pub)]
#[interface(dyn IngestClassifiedRecordsUseCase)]
impl IngestClassifiedRecordsUseCaseImpl {
    pub fn new(
        journey_event_repo: Arc<dyn JourneyEventRepository>,
        processed_event_repo: Arc<dyn ProcessedEventRepository>,
        time_source: Arc<dyn SystemTimeSource>,
        ingest_config: Arc<IngestConfig>,
        retry_config: Arc<StorageRetryConfig>,
    ) -> Self {
        Self {
            journey_event_repo,
            processed_event_repo,
            time_source,
            ingest_config,
            retry_config,
        }
    }

    async fn ingest_record(&self, record: &ClassifiedRecord, options: &IngestOptions) -> RecordDisposition {
        let event_id = EventID::new(record.event_id.trim());

        if record.is_authored_by(&self.ingest_config.ignored_authors) {
            return self
                .mark(&event_id, ClassificationOutcome::Ignored, options.source, RecordDisposition::Ignored)
                .await;
        }

        if record.spam {
            return self
                .mark(&event_id, ClassificationOutcome::Spam, options.source, RecordDisposition::Spam)
                .await;
        }

        let event = match record.validate(options.channel.as_deref()) {
            Ok(event) => event,
            Err(err) => {
                tracing::warn!(event_id = %event_id, error = %err, "Quarantining invalid record");
                if event_id.is_empty() {
                    // Nothing to key a ledger entry on
                    return RecordDisposition::Quarantined;
                }
                return self
                    .mark(
                        &event_id,
                        ClassificationOutcome::Quarantined,
                        options.source,
                        RecordDisposition::Quarantined,
                    )
                    .await;
            }
        };

        // The same journey step reported again under a new message id
        if let Some(key) = event.journey_key() {
            let existing = self
                .retry_config
                .policy
                .retry_if(
                    || {
                        self.journey_event_repo
                            .find_event_by_journey_stage(&key, event.stage)
                    },
                    StorageError::is_transient,
                )
                .await;

            match existing {
                Ok(Some(existing_id)) if existing_id != event.event_id => {
                    tracing::debug!(
                        event_id = %event.event_id,
                        existing_event_id = %existing_id,
                        journey = %key,
                        stage = %event.stage,
                        "Skipping duplicate journey step",
                    );
                    return self
                        .mark(
                            &event.event_id,
                            ClassificationOutcome::Duplicate,
                            options.source,
                            RecordDisposition::Duplicate,
                        )
                        .await;
                }
                Ok(_) => {}
                Err(err) => {
                    tracing::error!(event_id = %event.event_id, error = ?err, "Duplicate check failed");
                    return RecordDisposition::Failed;
                }
            }
        }

        let saved = self
            .retry_config
            .policy
            .retry_if(
                || self.journey_event_repo.save_event(&event),
                SaveJourneyEventError::is_transient,
            )
            .await;

        match saved {
            // Saved by an earlier run that did not get to mark it
            Ok(()) | Err(SaveJourneyEventError::Duplicate(_)) => {}
            Err(err) => {
                tracing::error!(event_id = %event.event_id, error = ?err, "Failed to save journey event");
                return RecordDisposition::Failed;
            }
        }

        self.mark(
            &event.event_id,
            ClassificationOutcome::Accepted,
            options.source,
            RecordDisposition::Inserted,
        )
        .await
    }

    /// Records the outcome in the ledger; an unmarked record is retried by
    /// the next run
    async fn mark(
        &self,
        event_id: &EventID,
        outcome: ClassificationOutcome,
        source: ProcessingSource,
        disposition: RecordDisposition,
    ) -> RecordDisposition {
        let res = self
            .retry_config
            .policy
            .retry_if(
                || {
                    self.processed_event_repo.mark_processed(ProcessedEventEntry {
                        event_id: event_id.clone(),
                        processed_at: self.time_source.now(),
                        outcome,
                        source,
                    })
                },
                StorageError::is_transient,
            )
            .await;

        match res {
            Ok(_) => disposition,
            Err(err) => {
                tracing::error!(event_id = %event_id, %outcome, error = ?err, "Failed to mark event as processed");
                RecordDisposition::Failed
            }
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecordDisposition {
    Ignored,
    Spam,
    Quarantined,
    Duplicate,
    Inserted,
    Failed,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[async_trait::async_trait]
impl IngestClassifiedRecordsUseCase for IngestClassifiedRecordsUseCaseImpl {
    #[tracing::instrument(level = "info", name = "IngestClassifiedRecordsUseCaseImpl_execute", skip_all, fields(num_records = records.len()))]
    async fn execute(
        &self,
        records: Vec<ClassifiedRecord>,
        options: IngestOptions,
    ) -> Result<IngestSummary, IngestClassifiedRecordsError> {
        let mut summary = IngestSummary {
            received: records.len(),
            ..Default::default()
        };

        // Within a batch the first occurrence of an id wins
        let mut seen = HashSet::new();
        let mut unique = Vec::with_capacity(records.len());
        for record in records {
            let event_id = EventID::new(record.event_id.trim());
            if !event_id.is_empty() && !seen.insert(event_id) {
                summary.already_processed += 1;
                continue;
            }
            unique.push(record);
        }

        let ids: Vec<EventID> = seen.into_iter().collect();
        let processed = self
            .retry_config
            .policy
            .retry_if(
                || self.processed_event_repo.are_processed(&ids),
                StorageError::is_transient,
            )
            .await
            .context_int_err("checking the processed ledger")?;

        for record in &unique {
            let event_id = EventID::new(record.event_id.trim());
            if processed.get(&event_id).copied().unwrap_or(false) {
                summary.already_processed += 1;
                continue;
            }

            match self.ingest_record(record, &options).await {
                RecordDisposition::Ignored => summary.ignored += 1,
                RecordDisposition::Spam => summary.spam += 1,
                RecordDisposition::Quarantined => summary.quarantined += 1,
                RecordDisposition::Duplicate => summary.duplicates += 1,
                RecordDisposition::Inserted => summary.inserted += 1,
                RecordDisposition::Failed => summary.failed += 1,
            }
        }

        tracing::info!(?summary, "Ingestion finished");

        Ok(summary)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
