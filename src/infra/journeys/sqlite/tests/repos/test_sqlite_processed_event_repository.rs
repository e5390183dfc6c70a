// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use database_common::{DatabaseConfiguration, SqlitePlugin};
use dill::{Catalog, CatalogBuilder};
use jobstats_journeys_sqlite::{SQLITE_MIGRATOR, SqliteProcessedEventRepository};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_group::group(database, sqlite)]
#[test_log::test(tokio::test)]
async fn test_empty_processed_ledger() {
    let harness = SqliteProcessedEventRepositoryHarness::new().await;
    jobstats_journeys_repo_tests::test_empty_processed_ledger(&harness.catalog).await;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_group::group(database, sqlite)]
#[test_log::test(tokio::test)]
async fn test_mark_processed() {
    let harness = SqliteProcessedEventRepositoryHarness::new().await;
    jobstats_journeys_repo_tests::test_mark_processed(&harness.catalog).await;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_group::group(database, sqlite)]
#[test_log::test(tokio::test)]
async fn test_mark_processed_twice_is_benign() {
    let harness = SqliteProcessedEventRepositoryHarness::new().await;
    jobstats_journeys_repo_tests::test_mark_processed_twice_is_benign(&harness.catalog).await;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_group::group(database, sqlite)]
#[test_log::test(tokio::test)]
async fn test_mark_processed_concurrently() {
    let harness = SqliteProcessedEventRepositoryHarness::new().await;
    jobstats_journeys_repo_tests::test_mark_processed_concurrently(&harness.catalog).await;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_group::group(database, sqlite)]
#[test_log::test(tokio::test)]
async fn test_are_processed_batch() {
    let harness = SqliteProcessedEventRepositoryHarness::new().await;
    jobstats_journeys_repo_tests::test_are_processed_batch(&harness.catalog).await;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_group::group(database, sqlite)]
#[test_log::test(tokio::test)]
async fn test_processed_ledger_stats() {
    let harness = SqliteProcessedEventRepositoryHarness::new().await;
    jobstats_journeys_repo_tests::test_processed_ledger_stats(&harness.catalog).await;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

struct SqliteProcessedEventRepositoryHarness {
    catalog: Catalog,
}

impl SqliteProcessedEventRepositoryHarness {
    pub async fn new() -> Self {
        let base_catalog = CatalogBuilder::new().build();
        let pool_catalog = SqlitePlugin::catalog_with_connected_pool(
            &base_catalog,
            &DatabaseConfiguration::sqlite_in_memory(),
            &SQLITE_MIGRATOR,
        )
        .await
        .unwrap();

        let mut catalog_builder = CatalogBuilder::new_chained(&pool_catalog);
        catalog_builder.add::<SqliteProcessedEventRepository>();

        Self {
            catalog: catalog_builder.build(),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
