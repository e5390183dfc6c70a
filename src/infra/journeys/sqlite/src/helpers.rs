// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use chrono::{DateTime, Utc};
use database_common::{SqlxErrorKind, classify_sqlx_error};
use internal_error::{ErrorIntoInternal, InternalError, ResultIntoInternal};
use jobstats_journeys::{EventID, JourneyEvent, Stage, StorageError, Track};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// SQLite limits the number of bound parameters per statement
pub(crate) const MAX_IN_LIST_SIZE: usize = 500;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub(crate) fn storage_error(e: sqlx::Error) -> StorageError {
    match classify_sqlx_error(&e) {
        SqlxErrorKind::Transient => StorageError::transient(e.to_string()),
        SqlxErrorKind::UniqueViolation | SqlxErrorKind::ConstraintViolation | SqlxErrorKind::Other => {
            StorageError::Internal(e.int_err())
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(sqlx::FromRow)]
pub(crate) struct JourneyEventRowModel {
    pub event_id: String,
    pub employer: Option<String>,
    pub candidate: Option<String>,
    pub track: String,
    pub stage: String,
    pub event_time: Option<DateTime<Utc>>,
    pub is_synthetic: bool,
    pub text: String,
    pub category: Option<String>,
}

impl TryFrom<JourneyEventRowModel> for JourneyEvent {
    type Error = InternalError;

    fn try_from(row: JourneyEventRowModel) -> Result<Self, Self::Error> {
        Ok(JourneyEvent {
            event_id: EventID::new(row.event_id),
            employer: row.employer,
            candidate: row.candidate,
            track: row.track.parse::<Track>().int_err()?,
            stage: row.stage.parse::<Stage>().int_err()?,
            timestamp: row.event_time,
            is_synthetic: row.is_synthetic,
            text: row.text,
            category: row.category,
        })
    }
}

pub(crate) fn rows_into_events(
    rows: Vec<JourneyEventRowModel>,
) -> Result<Vec<JourneyEvent>, StorageError> {
    rows.into_iter()
        .map(|row| JourneyEvent::try_from(row).map_err(StorageError::Internal))
        .collect()
}

/// Columns selected by every journey event query
pub(crate) const JOURNEY_EVENT_COLUMNS: &str = r#"
    event_id,
    employer,
    candidate,
    track,
    stage,
    event_time,
    is_synthetic,
    text,
    category
"#;

/// `stage_order` column value, places the pre-stage first
pub(crate) fn stage_order(stage: Stage) -> i64 {
    i64::try_from(stage.sort_key()).unwrap_or(i64::MAX)
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
