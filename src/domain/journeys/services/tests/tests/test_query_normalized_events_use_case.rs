// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use chrono::NaiveDate;
use jobstats_journeys::*;
use pretty_assertions::assert_eq;

use super::journeys_harness::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
}

async fn normalized_harness() -> JourneysHarness {
    let harness = JourneysHarness::new();
    harness
        .save_events(&[
            real_event("m1", Some("Acme"), "sam", Stage::Onsite, 10),
            real_event("m2", Some("Initech"), "kim", Stage::OnlineAssessment, 12),
        ])
        .await;
    harness.normalize().await;
    harness
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_list_events_by_date_range() {
    let harness = normalized_harness().await;
    let use_case = harness
        .catalog
        .get_one::<dyn QueryNormalizedEventsUseCase>()
        .unwrap();

    // The end date covers the whole day
    let events = use_case
        .list_events(JourneyEventFilter {
            from: Some(date(10)),
            to: Some(date(12)),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(
        events.iter().map(|e| e.event_id.as_str()).collect::<Vec<_>>(),
        vec!["m1", "m2"]
    );

    // Synthetic stages of sam's journey are dated 3 and 6 days before the onsite
    let events = use_case
        .list_events(JourneyEventFilter {
            to: Some(date(9)),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(
        stages(&events),
        vec![(Stage::OnlineAssessment, true), (Stage::PhoneScreen, true)]
    );
    assert_eq!(events[1].timestamp, Some(at(7, 12)));
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_list_events_filters() {
    let harness = normalized_harness().await;
    let use_case = harness
        .catalog
        .get_one::<dyn QueryNormalizedEventsUseCase>()
        .unwrap();

    let events = use_case
        .list_events(JourneyEventFilter {
            employers: vec!["Acme".to_string()],
            include_synthetic: false,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(stages(&events), vec![(Stage::Onsite, false)]);

    let events = use_case
        .list_events(JourneyEventFilter {
            stages: vec![Stage::OnlineAssessment],
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(
        stages(&events),
        vec![(Stage::OnlineAssessment, true), (Stage::OnlineAssessment, false)]
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_list_events_rejects_inverted_range() {
    let harness = JourneysHarness::new();

    let res = harness
        .catalog
        .get_one::<dyn QueryNormalizedEventsUseCase>()
        .unwrap()
        .list_events(JourneyEventFilter {
            from: Some(date(12)),
            to: Some(date(10)),
            ..Default::default()
        })
        .await;

    assert!(matches!(
        res,
        Err(QueryNormalizedEventsError::InvalidFilter(InvalidEventFilterError { from, to }))
            if from == date(12) && to == date(10)
    ));
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_ledger_stats_by_outcome() {
    let harness = JourneysHarness::new();
    harness
        .ingest(vec![
            record("m1", "Acme", "sam", "OA", 1),
            record("m2", "Acme", "sam", "Phone", 2),
            ClassifiedRecord {
                spam: true,
                ..record("m3", "Acme", "sam", "Offer", 3)
            },
        ])
        .await;

    let stats = harness
        .catalog
        .get_one::<dyn QueryNormalizedEventsUseCase>()
        .unwrap()
        .get_ledger_stats()
        .await
        .unwrap();

    assert_eq!(stats.total, 3);
    assert_eq!(stats.by_outcome.get(&ClassificationOutcome::Accepted), Some(&2));
    assert_eq!(stats.by_outcome.get(&ClassificationOutcome::Spam), Some(&1));
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
