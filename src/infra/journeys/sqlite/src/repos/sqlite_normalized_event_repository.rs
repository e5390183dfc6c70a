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
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::helpers::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct SqliteNormalizedEventRepository {
    pool: SqlitePool,
}

#[component(pub)]
#[interface(dyn NormalizedEventRepository)]
impl SqliteNormalizedEventRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[async_trait::async_trait]
impl NormalizedEventRepository for SqliteNormalizedEventRepository {
    #[tracing::instrument(level = "debug", skip_all, fields(batch_size = events.len()))]
    async fn upsert_events(
        &self,
        events: &[JourneyEvent],
        reporting: BatchReporting,
    ) -> Result<UpsertBatchResult, StorageError> {
        let mut result = UpsertBatchResult::new(reporting);

        // A constraint failure aborts only its own statement, so the rest of
        // the batch still commits with the transaction
        let mut tx = self.pool.begin().await.map_err(storage_error)?;

        for event in events {
            if let Some(reason) = check_normalized_event_constraints(event) {
                result.record_failure(&event.event_id, reason);
                continue;
            }

            let res = sqlx::query(
                r#"
                INSERT INTO normalized_events (
                    event_id, employer, candidate, track, stage, stage_order,
                    event_time, is_synthetic, text, category
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                ON CONFLICT (event_id) DO UPDATE SET
                    employer = excluded.employer,
                    candidate = excluded.candidate,
                    track = excluded.track,
                    stage = excluded.stage,
                    stage_order = excluded.stage_order,
                    event_time = excluded.event_time,
                    is_synthetic = excluded.is_synthetic,
                    text = excluded.text,
                    category = excluded.category
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
            .execute(&mut *tx)
            .await;

            match res {
                Ok(_) => result.record_success(),
                Err(e) => match classify_sqlx_error(&e) {
                    SqlxErrorKind::UniqueViolation | SqlxErrorKind::ConstraintViolation => {
                        tracing::debug!(event_id = %event.event_id, error = %e, "Upsert rejected by constraint");
                        result.record_failure(&event.event_id, e.to_string());
                    }
                    SqlxErrorKind::Transient | SqlxErrorKind::Other => {
                        return Err(storage_error(e));
                    }
                },
            }
        }

        tx.commit().await.map_err(storage_error)?;

        Ok(result)
    }

    async fn list_synthetic_event_ids(
        &self,
        key: &JourneyKey,
    ) -> Result<Vec<EventID>, StorageError> {
        let ids: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT event_id
            FROM normalized_events
            WHERE employer = $1
                AND candidate = $2
                AND track = $3
                AND is_synthetic = 1
            ORDER BY event_id
            "#,
        )
        .bind(&key.employer)
        .bind(&key.candidate)
        .bind(key.track.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(ids.into_iter().map(EventID::new).collect())
    }

    #[tracing::instrument(level = "debug", skip_all, fields(num_ids = event_ids.len()))]
    async fn delete_events(&self, event_ids: &[EventID]) -> Result<u64, StorageError> {
        let mut removed = 0;

        for chunk in event_ids.chunks(MAX_IN_LIST_SIZE) {
            let mut query_builder =
                QueryBuilder::<Sqlite>::new("DELETE FROM normalized_events WHERE event_id IN (");
            let mut separated = query_builder.separated(", ");
            for id in chunk {
                separated.push_bind(id.as_str());
            }
            separated.push_unseparated(")");

            let res = query_builder
                .build()
                .execute(&self.pool)
                .await
                .map_err(storage_error)?;

            removed += res.rows_affected();
        }

        Ok(removed)
    }

    async fn list_events(
        &self,
        filter: &JourneyEventFilter,
    ) -> Result<Vec<JourneyEvent>, StorageError> {
        let mut query_builder = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {JOURNEY_EVENT_COLUMNS} FROM normalized_events WHERE 1 = 1"
        ));

        if !filter.employers.is_empty() {
            query_builder.push(" AND employer IN (");
            let mut separated = query_builder.separated(", ");
            for employer in &filter.employers {
                separated.push_bind(employer.as_str());
            }
            separated.push_unseparated(")");
        }

        if !filter.stages.is_empty() {
            query_builder.push(" AND stage IN (");
            let mut separated = query_builder.separated(", ");
            for stage in &filter.stages {
                separated.push_bind(stage.to_string());
            }
            separated.push_unseparated(")");
        }

        if !filter.include_synthetic {
            query_builder.push(" AND is_synthetic = 0");
        }

        // Comparisons with NULL are never true, which drops events without
        // a timestamp from date-bounded queries
        if let Some(lower_bound) = filter.lower_bound() {
            query_builder.push(" AND event_time >= ");
            query_builder.push_bind(lower_bound);
        }
        if let Some(upper_bound) = filter.upper_bound() {
            query_builder.push(" AND event_time < ");
            query_builder.push_bind(upper_bound);
        }

        query_builder.push(" ORDER BY event_time IS NULL, event_time, event_id");

        let rows = query_builder
            .build_query_as::<JourneyEventRowModel>()
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error)?;

        rows_into_events(rows)
    }

    async fn list_journey_events(
        &self,
        key: &JourneyKey,
    ) -> Result<Vec<JourneyEvent>, StorageError> {
        let query = format!(
            r#"
            SELECT {JOURNEY_EVENT_COLUMNS}
            FROM normalized_events
            WHERE employer = $1
                AND candidate = $2
                AND track = $3
            ORDER BY stage_order, event_time IS NULL, event_time, event_id
            "#
        );

        let rows = sqlx::query_as::<_, JourneyEventRowModel>(&query)
            .bind(&key.employer)
            .bind(&key.candidate)
            .bind(key.track.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error)?;

        rows_into_events(rows)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
