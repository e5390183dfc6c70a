// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use internal_error::InternalError;
use jobstats_journeys::*;
use pretty_assertions::assert_eq;
use tokio_util::sync::CancellationToken;

use super::journeys_harness::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_normalize_backfills_implied_stages() {
    let harness = JourneysHarness::new();
    harness
        .save_events(&[
            real_event("m1", Some("Acme"), "sam", Stage::Onsite, 5),
            real_event("m2", Some("Initech"), "kim", Stage::Reject, 7),
            real_event("m3", None, "lee", Stage::OnlineAssessment, 2),
        ])
        .await;

    let summary = harness.normalize().await;

    assert_eq!(
        summary,
        NormalizationSummary {
            journeys_processed: 2,
            synthetic_added: 3,
            real_passed_through: 2,
            ungroupable_passed_through: 1,
            ..Default::default()
        }
    );

    assert_eq!(
        stages(&harness.journey_events(&key("Acme", "sam")).await),
        vec![
            (Stage::OnlineAssessment, true),
            (Stage::PhoneScreen, true),
            (Stage::Onsite, false),
        ]
    );

    // A bare rejection still implies the candidate got past the application
    assert_eq!(
        stages(&harness.journey_events(&key("Initech", "kim")).await),
        vec![(Stage::OnlineAssessment, true), (Stage::Reject, false)]
    );

    let all = harness.all_normalized_events().await;
    assert_eq!(all.len(), 6);
    assert!(
        all.iter()
            .filter(|e| e.is_synthetic)
            .all(|e| e.event_id.is_in_synthetic_namespace() && e.text == SYNTHETIC_EVENT_TEXT)
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_normalize_rerun_is_idempotent() {
    let harness = JourneysHarness::new();
    harness
        .save_events(&[
            real_event("m1", Some("Acme"), "sam", Stage::Application, 1),
            real_event("m2", Some("Acme"), "sam", Stage::HiringManager, 9),
        ])
        .await;

    let first = harness.normalize().await;
    let after_first = harness.all_normalized_events().await;

    let second = harness.normalize().await;
    let after_second = harness.all_normalized_events().await;

    assert_eq!(first, second);
    assert_eq!(first.synthetic_added, 3);
    assert_eq!(second.stale_synthetic_pruned, 0);
    assert_eq!(after_first, after_second);
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_normalize_keeps_journeys_apart_when_names_contain_underscores() {
    let harness = JourneysHarness::new();
    harness
        .save_events(&[
            real_event("m1", Some("A_B"), "c", Stage::Onsite, 5),
            real_event("m2", Some("A"), "B_c", Stage::Onsite, 5),
        ])
        .await;

    for _ in 0..2 {
        let summary = harness.normalize().await;
        assert_eq!(summary.synthetic_added, 4);
    }

    let expected = vec![
        (Stage::OnlineAssessment, true),
        (Stage::PhoneScreen, true),
        (Stage::Onsite, false),
    ];
    assert_eq!(
        stages(&harness.journey_events(&key("A_B", "c")).await),
        expected
    );
    assert_eq!(
        stages(&harness.journey_events(&key("A", "B_c")).await),
        expected
    );
    assert_eq!(harness.all_normalized_events().await.len(), 6);
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_normalize_prunes_superseded_synthetic_events() {
    let harness = JourneysHarness::new();
    harness
        .save_events(&[real_event("m1", Some("Acme"), "sam", Stage::Onsite, 5)])
        .await;

    harness.normalize().await;

    // The candidate reports the phone screen after the fact
    harness
        .save_events(&[real_event("m2", Some("Acme"), "sam", Stage::PhoneScreen, 3)])
        .await;

    let summary = harness.normalize().await;

    assert_eq!(summary.synthetic_added, 1);
    assert_eq!(summary.stale_synthetic_pruned, 1);
    assert_eq!(
        stages(&harness.journey_events(&key("Acme", "sam")).await),
        vec![
            (Stage::OnlineAssessment, true),
            (Stage::PhoneScreen, false),
            (Stage::Onsite, false),
        ]
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_normalize_many_journeys_concurrently() {
    let harness = JourneysHarness::with_options(JourneysHarnessOptions {
        max_concurrency: Some(3),
        write_batch_size: Some(2),
        ..Default::default()
    });

    let events: Vec<_> = (0..12)
        .map(|i| {
            real_event(
                &format!("m{i}"),
                Some("Acme"),
                &format!("candidate-{i}"),
                Stage::Onsite,
                5,
            )
        })
        .collect();
    harness.save_events(&events).await;

    let summary = harness.normalize().await;

    assert_eq!(summary.journeys_processed, 12);
    assert_eq!(summary.journeys_failed, 0);
    assert_eq!(summary.synthetic_added, 24);
    assert_eq!(summary.real_passed_through, 12);
    assert_eq!(harness.all_normalized_events().await.len(), 36);
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_normalize_cancelled_before_start() {
    let harness = JourneysHarness::new();
    harness
        .save_events(&[
            real_event("m1", Some("Acme"), "sam", Stage::Onsite, 5),
            real_event("m2", Some("Initech"), "kim", Stage::PhoneScreen, 4),
        ])
        .await;

    let cancellation_token = CancellationToken::new();
    cancellation_token.cancel();

    let summary = harness
        .catalog
        .get_one::<dyn NormalizeJourneysUseCase>()
        .unwrap()
        .execute(cancellation_token)
        .await
        .unwrap();

    assert!(summary.cancelled);
    assert_eq!(summary.journeys_skipped, 2);
    assert_eq!(summary.journeys_processed, 0);
    assert!(harness.all_normalized_events().await.is_empty());
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_normalize_retries_transient_write() {
    let attempts = Arc::new(AtomicUsize::new(0));

    let mut mock_normalized_event_repo = MockNormalizedEventRepository::new();
    {
        let attempts = attempts.clone();
        mock_normalized_event_repo
            .expect_upsert_events()
            .returning(move |events, reporting| {
                if attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                    return Err(StorageError::transient("database is locked"));
                }
                let mut result = UpsertBatchResult::new(reporting);
                events.iter().for_each(|_| result.record_success());
                Ok(result)
            });
    }
    mock_normalized_event_repo
        .expect_list_synthetic_event_ids()
        .returning(|_| Ok(vec![]));
    mock_normalized_event_repo.expect_delete_events().never();

    let harness = JourneysHarness::with_options(JourneysHarnessOptions {
        mock_normalized_event_repo: Some(mock_normalized_event_repo),
        ..Default::default()
    });
    harness
        .save_events(&[real_event("m1", Some("Acme"), "sam", Stage::PhoneScreen, 5)])
        .await;

    let summary = harness.normalize().await;

    assert_eq!(summary.journeys_processed, 1);
    assert_eq!(summary.synthetic_added, 1);
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_normalize_isolates_failing_journeys() {
    let mut mock_normalized_event_repo = MockNormalizedEventRepository::new();
    mock_normalized_event_repo
        .expect_upsert_events()
        .returning(|events, reporting| {
            if events.iter().any(|e| e.employer.as_deref() == Some("Broken")) {
                return Err(StorageError::Internal(InternalError::new(
                    std::io::Error::other("corrupted page"),
                )));
            }
            let mut result = UpsertBatchResult::new(reporting);
            for event in events {
                if event.event_id.as_str() == "m-rejected" {
                    result.record_failure(&event.event_id, "constraint violation");
                } else {
                    result.record_success();
                }
            }
            Ok(result)
        });
    mock_normalized_event_repo
        .expect_list_synthetic_event_ids()
        .returning(|_| Ok(vec![]));

    let harness = JourneysHarness::with_options(JourneysHarnessOptions {
        mock_normalized_event_repo: Some(mock_normalized_event_repo),
        ..Default::default()
    });
    harness
        .save_events(&[
            real_event("m1", Some("Broken"), "sam", Stage::Onsite, 5),
            real_event("m2", Some("Acme"), "kim", Stage::OnlineAssessment, 2),
            real_event("m-rejected", Some("Acme"), "kim", Stage::PhoneScreen, 4),
        ])
        .await;

    let summary = harness.normalize().await;

    assert_eq!(
        summary,
        NormalizationSummary {
            journeys_processed: 1,
            journeys_failed: 1,
            real_passed_through: 1,
            write_failures: 1,
            ..Default::default()
        }
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_normalize_failed_journey_converges_on_rerun() {
    let calls = Arc::new(AtomicUsize::new(0));
    let stored = Arc::new(std::sync::Mutex::new(std::collections::BTreeSet::new()));

    let mut mock_normalized_event_repo = MockNormalizedEventRepository::new();
    {
        let calls = calls.clone();
        let stored = stored.clone();
        mock_normalized_event_repo
            .expect_upsert_events()
            .returning(move |events, reporting| {
                // The second write batch of the first run fails for good
                if calls.fetch_add(1, Ordering::SeqCst) == 1 {
                    return Err(StorageError::Internal(InternalError::new(
                        std::io::Error::other("disk full"),
                    )));
                }
                let mut result = UpsertBatchResult::new(reporting);
                for event in events {
                    stored.lock().unwrap().insert(event.event_id.clone());
                    result.record_success();
                }
                Ok(result)
            });
    }
    mock_normalized_event_repo
        .expect_list_synthetic_event_ids()
        .returning(|_| Ok(vec![]));

    let harness = JourneysHarness::with_options(JourneysHarnessOptions {
        mock_normalized_event_repo: Some(mock_normalized_event_repo),
        write_batch_size: Some(1),
        ..Default::default()
    });
    harness
        .save_events(&[real_event("m1", Some("Acme"), "sam", Stage::Onsite, 5)])
        .await;

    let first = harness.normalize().await;
    assert_eq!(first.journeys_failed, 1);
    // Batches written before the failure stay in the store
    assert_eq!(stored.lock().unwrap().len(), 1);

    let second = harness.normalize().await;
    assert_eq!(second.journeys_failed, 0);
    assert_eq!(second.journeys_processed, 1);
    assert_eq!(stored.lock().unwrap().len(), 3);
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
