// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use internal_error::InternalError;
use thiserror::Error;

use crate::{JourneyEvent, JourneyEventFilter, JourneyKey, ProcessedLedgerStats};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Read side of the normalized store and the dedup ledger
#[async_trait::async_trait]
pub trait QueryNormalizedEventsUseCase: Send + Sync {
    async fn list_events(
        &self,
        filter: JourneyEventFilter,
    ) -> Result<Vec<JourneyEvent>, QueryNormalizedEventsError>;

    async fn list_journey_events(
        &self,
        key: &JourneyKey,
    ) -> Result<Vec<JourneyEvent>, QueryNormalizedEventsError>;

    async fn get_ledger_stats(&self) -> Result<ProcessedLedgerStats, QueryNormalizedEventsError>;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum QueryNormalizedEventsError {
    #[error(transparent)]
    InvalidFilter(InvalidEventFilterError),

    #[error(transparent)]
    Internal(#[from] InternalError),
}

#[derive(Error, Debug)]
#[error("Invalid date range: {from} is after {to}")]
pub struct InvalidEventFilterError {
    pub from: chrono::NaiveDate,
    pub to: chrono::NaiveDate,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
