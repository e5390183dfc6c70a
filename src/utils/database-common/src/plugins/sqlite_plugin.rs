// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use dill::*;
use secrecy::ExposeSecret;
use sqlx::SqlitePool;
use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePoolOptions;

use crate::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

const DEFAULT_MAX_CONNECTIONS: u32 = 4;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct SqlitePlugin {}

#[component(pub)]
impl SqlitePlugin {
    pub fn new() -> Self {
        Self {}
    }

    /// Opens the pool, applies pending migrations and returns a catalog
    /// chained to `base_catalog` that can resolve `SqlitePool`
    pub async fn catalog_with_connected_pool(
        base_catalog: &Catalog,
        db_configuration: &DatabaseConfiguration,
        migrator: &Migrator,
    ) -> Result<Catalog, DatabaseError> {
        let sqlite_pool = Self::open_sqlite_pool(db_configuration)?;
        Self::run_migrations(&sqlite_pool, migrator).await?;

        Ok(CatalogBuilder::new_chained(base_catalog)
            .add_value(sqlite_pool)
            .build())
    }

    #[tracing::instrument(level = "info", skip_all, fields(database = %db_configuration.database_name))]
    pub fn open_sqlite_pool(
        db_configuration: &DatabaseConfiguration,
    ) -> Result<SqlitePool, DatabaseError> {
        let mut pool_options = SqlitePoolOptions::new().max_connections(
            db_configuration
                .max_connections
                .unwrap_or(DEFAULT_MAX_CONNECTIONS),
        );

        // In-memory database lives only as long as its single connection
        if db_configuration.is_in_memory() {
            pool_options = pool_options
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        pool_options
            .connect_lazy(db_configuration.connection_string().expose_secret())
            .map_err(DatabaseError::SqlxError)
    }

    #[tracing::instrument(level = "info", skip_all)]
    pub async fn run_migrations(
        sqlite_pool: &SqlitePool,
        migrator: &Migrator,
    ) -> Result<(), DatabaseError> {
        migrator.run(sqlite_pool).await?;
        Ok(())
    }

    /// Closes all pooled connections, waiting for in-flight queries
    pub async fn shutdown(sqlite_pool: &SqlitePool) {
        tracing::debug!("Closing SQLite pool");
        sqlite_pool.close().await;
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
