// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use dill::{Catalog, CatalogBuilder};
use jobstats_journeys_inmem::InMemoryJourneyEventRepository;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_no_journey_events_initially() {
    let harness = InMemoryJourneyEventRepositoryHarness::new();
    jobstats_journeys_repo_tests::test_no_journey_events_initially(&harness.catalog).await;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_save_and_read_journey_events() {
    let harness = InMemoryJourneyEventRepositoryHarness::new();
    jobstats_journeys_repo_tests::test_save_and_read_journey_events(&harness.catalog).await;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_save_duplicate_journey_event() {
    let harness = InMemoryJourneyEventRepositoryHarness::new();
    jobstats_journeys_repo_tests::test_save_duplicate_journey_event(&harness.catalog).await;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_find_event_by_journey_stage() {
    let harness = InMemoryJourneyEventRepositoryHarness::new();
    jobstats_journeys_repo_tests::test_find_event_by_journey_stage(&harness.catalog).await;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_real_events_exclude_synthetic_namespace() {
    let harness = InMemoryJourneyEventRepositoryHarness::new();
    jobstats_journeys_repo_tests::test_real_events_exclude_synthetic_namespace(&harness.catalog).await;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

struct InMemoryJourneyEventRepositoryHarness {
    catalog: Catalog,
}

impl InMemoryJourneyEventRepositoryHarness {
    pub fn new() -> Self {
        let mut catalog_builder = CatalogBuilder::new();
        catalog_builder.add::<InMemoryJourneyEventRepository>();

        Self {
            catalog: catalog_builder.build(),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
