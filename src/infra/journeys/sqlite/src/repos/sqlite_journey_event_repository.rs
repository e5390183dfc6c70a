// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use database_common::{SqlxErrorKind, classify_sqlx_error};
use dill::*;
use jobstats_journeys::*;
use sqlx::SqlitePool;

use crate::helpers::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct SqliteJourneyEventRepository {
    pool: SqlitePool,
}

#[component(pub)]
#[interface(dyn JourneyEventRepository)]
impl SqliteJourneyEventRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[async_trait::async_trait]
impl JourneyEventRepository for SqliteJourneyEventRepository {
    #[tracing::instrument(level = "debug", skip_all, fields(event_id = %event.event_id))]
    async fn save_event(&self, event: &JourneyEvent) -> Result<(), SaveJourneyEventError> {
        sqlx::query(
            r#"
            INSERT INTO journey_events (
                event_id, employer, candidate, track, stage, stage_order,
                event_time, is_synthetic, text, category
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(event.event_id.as_str())
        .bind(event.employer.as_deref())
        .bind(event.candidate.as_deref())
        .bind(event.track.to_string())
        .bind(event.stage.to_string())
        .bind(stage_order(event.stage))
        .bind(event.timestamp)
        .bind(event.is_synthetic)
        .bind(&event.text)
        .bind(event.category.as_deref())
        .execute(&self.pool)
        .await
        .map_err(|e| match classify_sqlx_error(&e) {
            SqlxErrorKind::UniqueViolation => {
                SaveJourneyEventError::Duplicate(DuplicateJourneyEventError {
                    event_id: event.event_id.clone(),
                })
            }
            _ => storage_error(e).into(),
        })?;

        Ok(())
    }

    async fn find_event_by_journey_stage(
        &self,
        key: &JourneyKey,
        stage: Stage,
    ) -> Result<Option<EventID>, StorageError> {
        let maybe_id: Option<String> = sqlx::query_scalar(
            r#"
            SELECT event_id
            FROM journey_events
            WHERE employer = $1
                AND candidate = $2
                AND track = $3
                AND stage = $4
            ORDER BY event_id
            LIMIT 1
            "#,
        )
        .bind(&key.employer)
        .bind(&key.candidate)
        .bind(key.track.to_string())
        .bind(stage.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(maybe_id.map(EventID::new))
    }

    async fn get_real_events(&self) -> Result<Vec<JourneyEvent>, StorageError> {
        let query = format!(
            r#"
            SELECT {JOURNEY_EVENT_COLUMNS}
            FROM journey_events
            WHERE substr(event_id, 1, length($1)) <> $1
            ORDER BY event_id
            "#
        );

        let rows = sqlx::query_as::<_, JourneyEventRowModel>(&query)
            .bind(SYNTHETIC_ID_PREFIX)
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error)?;

        rows_into_events(rows)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
