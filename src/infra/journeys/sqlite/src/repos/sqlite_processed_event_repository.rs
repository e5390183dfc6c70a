// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use dill::*;
use internal_error::ResultIntoInternal;
use jobstats_journeys::*;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::helpers::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct SqliteProcessedEventRepository {
    pool: SqlitePool,
}

#[component(pub)]
#[interface(dyn ProcessedEventRepository)]
impl SqliteProcessedEventRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(sqlx::FromRow)]
struct ProcessedEventRowModel {
    event_id: String,
    processed_at: DateTime<Utc>,
    outcome: String,
    source: String,
}

impl TryFrom<ProcessedEventRowModel> for ProcessedEventEntry {
    type Error = StorageError;

    fn try_from(row: ProcessedEventRowModel) -> Result<Self, Self::Error> {
        Ok(ProcessedEventEntry {
            event_id: EventID::new(row.event_id),
            processed_at: row.processed_at,
            outcome: row.outcome.parse().int_err()?,
            source: row.source.parse().int_err()?,
        })
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[async_trait::async_trait]
impl ProcessedEventRepository for SqliteProcessedEventRepository {
    async fn is_processed(&self, event_id: &EventID) -> Result<bool, StorageError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (SELECT 1 FROM processed_events WHERE event_id = $1)
            "#,
        )
        .bind(event_id.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(exists)
    }

    async fn are_processed(
        &self,
        event_ids: &[EventID],
    ) -> Result<HashMap<EventID, bool>, StorageError> {
        let mut found = HashSet::new();

        for chunk in event_ids.chunks(MAX_IN_LIST_SIZE) {
            let mut query_builder =
                QueryBuilder::<Sqlite>::new("SELECT event_id FROM processed_events WHERE event_id IN (");
            let mut separated = query_builder.separated(", ");
            for id in chunk {
                separated.push_bind(id.as_str());
            }
            separated.push_unseparated(")");

            let ids: Vec<String> = query_builder
                .build_query_scalar()
                .fetch_all(&self.pool)
                .await
                .map_err(storage_error)?;

            found.extend(ids);
        }

        Ok(event_ids
            .iter()
            .map(|id| (id.clone(), found.contains(id.as_str())))
            .collect())
    }

    #[tracing::instrument(level = "debug", skip_all, fields(event_id = %entry.event_id, outcome = %entry.outcome))]
    async fn mark_processed(
        &self,
        entry: ProcessedEventEntry,
    ) -> Result<MarkProcessedOutcome, StorageError> {
        let result = sqlx::query(
            r#"
            INSERT INTO processed_events (event_id, processed_at, outcome, source)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (event_id) DO NOTHING
            "#,
        )
        .bind(entry.event_id.as_str())
        .bind(entry.processed_at)
        .bind(entry.outcome.to_string())
        .bind(entry.source.to_string())
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        if result.rows_affected() == 0 {
            Ok(MarkProcessedOutcome::AlreadyMarked)
        } else {
            Ok(MarkProcessedOutcome::Marked)
        }
    }

    async fn get_entry(
        &self,
        event_id: &EventID,
    ) -> Result<Option<ProcessedEventEntry>, StorageError> {
        let maybe_row = sqlx::query_as::<_, ProcessedEventRowModel>(
            r#"
            SELECT event_id, processed_at, outcome, source
            FROM processed_events
            WHERE event_id = $1
            "#,
        )
        .bind(event_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        maybe_row.map(TryInto::try_into).transpose()
    }

    async fn get_stats(&self) -> Result<ProcessedLedgerStats, StorageError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT outcome, COUNT(*)
            FROM processed_events
            GROUP BY outcome
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        let mut stats = ProcessedLedgerStats::default();
        for (outcome, count) in rows {
            let outcome: ClassificationOutcome = outcome.parse().int_err()?;
            let count = u64::try_from(count).int_err()?;
            stats.total += count;
            stats.by_outcome.insert(outcome, count);
        }
        Ok(stats)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
