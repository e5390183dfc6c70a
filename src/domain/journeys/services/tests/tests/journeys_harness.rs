// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::time::Duration;

use async_utils::RetryPolicy;
use chrono::{DateTime, TimeZone, Utc};
use dill::{Catalog, CatalogBuilder};
use jobstats_journeys::*;
use jobstats_journeys_inmem::*;
use time_source::{SystemTimeSource, SystemTimeSourceStub};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub(crate) fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
}

pub(crate) fn record(id: &str, employer: &str, candidate: &str, stage: &str, day: u32) -> ClassifiedRecord {
    ClassifiedRecord {
        event_id: id.to_string(),
        employer: Some(employer.to_string()),
        candidate: Some(candidate.to_string()),
        stage: Some(stage.to_string()),
        track: Some(Track::Intern),
        text: Some(format!("{candidate}: {stage} at {employer}")),
        timestamp: Some(at(day, 12)),
        ..Default::default()
    }
}

pub(crate) fn real_event(id: &str, employer: Option<&str>, candidate: &str, stage: Stage, day: u32) -> JourneyEvent {
    JourneyEvent {
        event_id: EventID::new(id),
        employer: employer.map(str::to_string),
        candidate: Some(candidate.to_string()),
        track: Track::Intern,
        stage,
        timestamp: Some(at(day, 12)),
        is_synthetic: false,
        text: format!("{candidate} reported {stage}"),
        category: Some("intern-2024".to_string()),
    }
}

pub(crate) fn key(employer: &str, candidate: &str) -> JourneyKey {
    JourneyKey::new(employer, candidate, Track::Intern)
}

pub(crate) fn stages(events: &[JourneyEvent]) -> Vec<(Stage, bool)> {
    events.iter().map(|e| (e.stage, e.is_synthetic)).collect()
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Default)]
pub(crate) struct JourneysHarnessOptions {
    pub mock_journey_event_repo: Option<MockJourneyEventRepository>,
    pub mock_normalized_event_repo: Option<MockNormalizedEventRepository>,
    pub max_concurrency: Option<usize>,
    pub write_batch_size: Option<usize>,
}

pub(crate) struct JourneysHarness {
    pub catalog: Catalog,
    pub time_source: SystemTimeSourceStub,
}

impl JourneysHarness {
    pub fn new() -> Self {
        Self::with_options(JourneysHarnessOptions::default())
    }

    pub fn with_options(options: JourneysHarnessOptions) -> Self {
        let time_source = SystemTimeSourceStub::new_set(at(20, 0));

        let catalog = {
            let mut b = CatalogBuilder::new();

            b.add_value(time_source.clone())
                .bind::<dyn SystemTimeSource, SystemTimeSourceStub>()
                .add_value(BackfillConfig::default())
                .add_value(IngestConfig::default())
                .add_value(NormalizationConfig {
                    max_concurrency: options.max_concurrency.unwrap_or(DEFAULT_MAX_CONCURRENCY),
                    write_batch_size: options.write_batch_size.unwrap_or(DEFAULT_WRITE_BATCH_SIZE),
                })
                .add_value(StorageRetryConfig::new(RetryPolicy::fixed_delay(
                    Duration::from_millis(1),
                    Some(3),
                )))
                .add::<InMemoryProcessedEventRepository>();

            if let Some(mock) = options.mock_journey_event_repo {
                b.add_value(mock)
                    .bind::<dyn JourneyEventRepository, MockJourneyEventRepository>();
            } else {
                b.add::<InMemoryJourneyEventRepository>();
            }

            if let Some(mock) = options.mock_normalized_event_repo {
                b.add_value(mock)
                    .bind::<dyn NormalizedEventRepository, MockNormalizedEventRepository>();
            } else {
                b.add::<InMemoryNormalizedEventRepository>();
            }

            jobstats_journeys_services::register_dependencies(&mut b);

            b.build()
        };

        Self {
            catalog,
            time_source,
        }
    }

    pub async fn save_events(&self, events: &[JourneyEvent]) {
        let repo = self.catalog.get_one::<dyn JourneyEventRepository>().unwrap();
        for event in events {
            repo.save_event(event).await.unwrap();
        }
    }

    pub async fn ingest(&self, records: Vec<ClassifiedRecord>) -> IngestSummary {
        self.catalog
            .get_one::<dyn IngestClassifiedRecordsUseCase>()
            .unwrap()
            .execute(records, IngestOptions::default())
            .await
            .unwrap()
    }

    pub async fn normalize(&self) -> NormalizationSummary {
        self.catalog
            .get_one::<dyn NormalizeJourneysUseCase>()
            .unwrap()
            .execute(tokio_util::sync::CancellationToken::new())
            .await
            .unwrap()
    }

    pub async fn journey_events(&self, key: &JourneyKey) -> Vec<JourneyEvent> {
        self.catalog
            .get_one::<dyn QueryNormalizedEventsUseCase>()
            .unwrap()
            .list_journey_events(key)
            .await
            .unwrap()
    }

    pub async fn all_normalized_events(&self) -> Vec<JourneyEvent> {
        self.catalog
            .get_one::<dyn QueryNormalizedEventsUseCase>()
            .unwrap()
            .list_events(JourneyEventFilter::default())
            .await
            .unwrap()
    }

    pub async fn ledger_entry(&self, id: &str) -> Option<ProcessedEventEntry> {
        self.catalog
            .get_one::<dyn ProcessedEventRepository>()
            .unwrap()
            .get_entry(&EventID::new(id))
            .await
            .unwrap()
    }

    pub async fn ledger_outcome(&self, id: &str) -> Option<ClassificationOutcome> {
        self.ledger_entry(id).await.map(|entry| entry.outcome)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
