// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use dill::{Catalog, CatalogBuilder};
use jobstats_journeys_inmem::InMemoryProcessedEventRepository;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_empty_processed_ledger() {
    let harness = InMemoryProcessedEventRepositoryHarness::new();
    jobstats_journeys_repo_tests::test_empty_processed_ledger(&harness.catalog).await;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_mark_processed() {
    let harness = InMemoryProcessedEventRepositoryHarness::new();
    jobstats_journeys_repo_tests::test_mark_processed(&harness.catalog).await;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_mark_processed_twice_is_benign() {
    let harness = InMemoryProcessedEventRepositoryHarness::new();
    jobstats_journeys_repo_tests::test_mark_processed_twice_is_benign(&harness.catalog).await;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_mark_processed_concurrently() {
    let harness = InMemoryProcessedEventRepositoryHarness::new();
    jobstats_journeys_repo_tests::test_mark_processed_concurrently(&harness.catalog).await;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_are_processed_batch() {
    let harness = InMemoryProcessedEventRepositoryHarness::new();
    jobstats_journeys_repo_tests::test_are_processed_batch(&harness.catalog).await;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_processed_ledger_stats() {
    let harness = InMemoryProcessedEventRepositoryHarness::new();
    jobstats_journeys_repo_tests::test_processed_ledger_stats(&harness.catalog).await;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

struct InMemoryProcessedEventRepositoryHarness {
    catalog: Catalog,
}

impl InMemoryProcessedEventRepositoryHarness {
    pub fn new() -> Self {
        let mut catalog_builder = CatalogBuilder::new();
        catalog_builder.add::<InMemoryProcessedEventRepository>();

        Self {
            catalog: catalog_builder.build(),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
