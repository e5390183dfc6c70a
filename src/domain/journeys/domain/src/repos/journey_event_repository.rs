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

use crate::{EventID, JourneyEvent, JourneyKey, Stage, StorageError, TransientStorageError};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Event store: durable record of what candidates actually reported
#[cfg_attr(any(feature = "testing", test), mockall::automock)]
#[async_trait::async_trait]
pub trait JourneyEventRepository: Send + Sync {
    async fn save_event(&self, event: &JourneyEvent) -> Result<(), SaveJourneyEventError>;

    /// Id of a stored event reporting the same stage for the same journey
    async fn find_event_by_journey_stage(
        &self,
        key: &JourneyKey,
        stage: Stage,
    ) -> Result<Option<EventID>, StorageError>;

    /// All stored events with ids outside of the synthetic namespace,
    /// ordered by event id
    async fn get_real_events(&self) -> Result<Vec<JourneyEvent>, StorageError>;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum SaveJourneyEventError {
    #[error(transparent)]
    Duplicate(DuplicateJourneyEventError),

    #[error(transparent)]
    Transient(#[from] TransientStorageError),

    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl SaveJourneyEventError {
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

impl From<StorageError> for SaveJourneyEventError {
    fn from(value: StorageError) -> Self {
        match value {
            StorageError::Transient(e) => Self::Transient(e),
            StorageError::Internal(e) => Self::Internal(e),
        }
    }
}

#[derive(Error, Debug)]
#[error("Event id='{event_id}' already exists")]
pub struct DuplicateJourneyEventError {
    pub event_id: EventID,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
