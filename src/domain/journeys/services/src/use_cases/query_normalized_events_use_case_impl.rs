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

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct QueryNormalizedEventsUseCaseImpl {
    normalized_event_repo: Arc<dyn NormalizedEventRepository>,
    processed_event_repo: Arc<dyn ProcessedEventRepository>,
}

#[component(pub)]
#[interface(dyn QueryNormalizedEventsUseCase)]
impl QueryNormalizedEventsUseCaseImpl {
    pub fn new(
        normalized_event_repo: Arc<dyn NormalizedEventRepository>,
        processed_event_repo: Arc<dyn ProcessedEventRepository>,
    ) -> Self {
        Self {
            normalized_event_repo,
            processed_event_repo,
        }
    }
}

#[async_trait::async_trait]
impl QueryNormalizedEventsUseCase for QueryNormalizedEventsUseCaseImpl {
    #[tracing::instrument(level = "debug", skip_all, fields(?filter))]
    async fn list_events(
        &self,
        filter: JourneyEventFilter,
    ) -> Result<Vec<JourneyEvent>, QueryNormalizedEventsError> {
        if let (Some(from), Some(to)) = (filter.from, filter.to) {
            if from > to {
                return Err(QueryNormalizedEventsError::InvalidFilter(
                    InvalidEventFilterError { from, to },
                ));
            }
        }

        let events = self
            .normalized_event_repo
            .list_events(&filter)
            .await
            .int_err()?;

        Ok(events)
    }

    #[tracing::instrument(level = "debug", skip_all, fields(%key))]
    async fn list_journey_events(
        &self,
        key: &JourneyKey,
    ) -> Result<Vec<JourneyEvent>, QueryNormalizedEventsError> {
        let events = self
            .normalized_event_repo
            .list_journey_events(key)
            .await
            .int_err()?;

        Ok(events)
    }

    async fn get_ledger_stats(&self) -> Result<ProcessedLedgerStats, QueryNormalizedEventsError> {
        let stats = self.processed_event_repo.get_stats().await.int_err()?;
        Ok(stats)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
