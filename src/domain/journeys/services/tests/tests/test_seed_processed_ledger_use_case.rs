// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use jobstats_journeys::*;
use pretty_assertions::assert_eq;

use super::journeys_harness::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_seed_marks_existing_events_once() {
    let harness = JourneysHarness::new();

    let mut undated = real_event("m2", Some("Acme"), "sam", Stage::Onsite, 5);
    undated.timestamp = None;
    harness
        .save_events(&[real_event("m1", Some("Acme"), "sam", Stage::OnlineAssessment, 2), undated])
        .await;

    let use_case = harness
        .catalog
        .get_one::<dyn SeedProcessedLedgerUseCase>()
        .unwrap();

    let first = use_case.execute().await.unwrap();
    assert_eq!(
        first,
        LedgerSeedSummary {
            scanned: 2,
            newly_marked: 2,
            already_marked: 0,
        }
    );

    let dated = harness.ledger_entry("m1").await.unwrap();
    assert_eq!(dated.source, ProcessingSource::Migration);
    assert_eq!(dated.outcome, ClassificationOutcome::Accepted);
    assert_eq!(dated.processed_at, at(2, 12));
    assert_eq!(harness.ledger_entry("m2").await.unwrap().processed_at, at(20, 0));

    let second = use_case.execute().await.unwrap();
    assert_eq!(second.newly_marked, 0);
    assert_eq!(second.already_marked, 2);
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_seeded_events_are_not_reingested() {
    let harness = JourneysHarness::new();
    harness
        .save_events(&[real_event("m1", Some("Acme"), "sam", Stage::OnlineAssessment, 2)])
        .await;

    harness
        .catalog
        .get_one::<dyn SeedProcessedLedgerUseCase>()
        .unwrap()
        .execute()
        .await
        .unwrap();

    let summary = harness
        .ingest(vec![record("m1", "Acme", "sam", "OA", 2)])
        .await;

    assert_eq!(summary.already_processed, 1);
    assert_eq!(summary.inserted, 0);
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
