// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::{BTreeMap, HashMap};

use dill::Catalog;
use jobstats_journeys::*;
use pretty_assertions::assert_eq;

use crate::helpers::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

fn entry(id: &str, outcome: ClassificationOutcome, day: u32) -> ProcessedEventEntry {
    ProcessedEventEntry {
        event_id: EventID::new(id),
        processed_at: at(day, 8),
        outcome,
        source: ProcessingSource::Parsing,
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_empty_processed_ledger(catalog: &Catalog) {
    let repo = catalog.get_one::<dyn ProcessedEventRepository>().unwrap();

    assert!(!repo.is_processed(&EventID::new("m-1")).await.unwrap());
    assert_eq!(repo.get_entry(&EventID::new("m-1")).await.unwrap(), None);
    assert_eq!(
        repo.get_stats().await.unwrap(),
        ProcessedLedgerStats::default()
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_mark_processed(catalog: &Catalog) {
    let repo = catalog.get_one::<dyn ProcessedEventRepository>().unwrap();

    let e = entry("m-1", ClassificationOutcome::Accepted, 1);
    assert_eq!(
        repo.mark_processed(e.clone()).await.unwrap(),
        MarkProcessedOutcome::Marked
    );

    assert!(repo.is_processed(&e.event_id).await.unwrap());
    assert_eq!(repo.get_entry(&e.event_id).await.unwrap(), Some(e));
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_mark_processed_twice_is_benign(catalog: &Catalog) {
    let repo = catalog.get_one::<dyn ProcessedEventRepository>().unwrap();

    let first = entry("m-1", ClassificationOutcome::Spam, 1);
    let second = ProcessedEventEntry {
        processed_at: at(2, 8),
        outcome: ClassificationOutcome::Accepted,
        source: ProcessingSource::Migration,
        ..first.clone()
    };

    assert_eq!(
        repo.mark_processed(first.clone()).await.unwrap(),
        MarkProcessedOutcome::Marked
    );
    assert_eq!(
        repo.mark_processed(second).await.unwrap(),
        MarkProcessedOutcome::AlreadyMarked
    );

    // Entries are write-once
    assert_eq!(repo.get_entry(&first.event_id).await.unwrap(), Some(first));
    assert_eq!(repo.get_stats().await.unwrap().total, 1);
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_mark_processed_concurrently(catalog: &Catalog) {
    const NUM_WRITERS: u32 = 8;

    let repo = catalog.get_one::<dyn ProcessedEventRepository>().unwrap();

    let mut writers = tokio::task::JoinSet::new();
    for day in 1..=NUM_WRITERS {
        let repo = repo.clone();
        writers.spawn(async move {
            repo.mark_processed(entry("m-1", ClassificationOutcome::Accepted, day))
                .await
                .unwrap()
        });
    }

    let mut marked = 0;
    let mut already_marked = 0;
    while let Some(outcome) = writers.join_next().await {
        match outcome.unwrap() {
            MarkProcessedOutcome::Marked => marked += 1,
            MarkProcessedOutcome::AlreadyMarked => already_marked += 1,
        }
    }

    assert_eq!((marked, already_marked), (1, NUM_WRITERS - 1));
    assert!(repo.is_processed(&EventID::new("m-1")).await.unwrap());
    assert_eq!(repo.get_stats().await.unwrap().total, 1);
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_are_processed_batch(catalog: &Catalog) {
    let repo = catalog.get_one::<dyn ProcessedEventRepository>().unwrap();

    repo.mark_processed(entry("m-1", ClassificationOutcome::Accepted, 1))
        .await
        .unwrap();
    repo.mark_processed(entry("m-3", ClassificationOutcome::Ignored, 1))
        .await
        .unwrap();

    let requested = vec![
        EventID::new("m-1"),
        EventID::new("m-2"),
        EventID::new("m-3"),
        EventID::new("m-4"),
    ];
    let res = repo.are_processed(&requested).await.unwrap();

    assert_eq!(
        res,
        HashMap::from([
            (EventID::new("m-1"), true),
            (EventID::new("m-2"), false),
            (EventID::new("m-3"), true),
            (EventID::new("m-4"), false),
        ])
    );

    assert!(repo.are_processed(&[]).await.unwrap().is_empty());
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_processed_ledger_stats(catalog: &Catalog) {
    let repo = catalog.get_one::<dyn ProcessedEventRepository>().unwrap();

    for (id, outcome) in [
        ("m-1", ClassificationOutcome::Accepted),
        ("m-2", ClassificationOutcome::Accepted),
        ("m-3", ClassificationOutcome::Spam),
        ("m-4", ClassificationOutcome::Quarantined),
        ("m-5", ClassificationOutcome::Duplicate),
    ] {
        repo.mark_processed(entry(id, outcome, 3)).await.unwrap();
    }

    assert_eq!(
        repo.get_stats().await.unwrap(),
        ProcessedLedgerStats {
            total: 5,
            by_outcome: BTreeMap::from([
                (ClassificationOutcome::Accepted, 2),
                (ClassificationOutcome::Spam, 1),
                (ClassificationOutcome::Quarantined, 1),
                (ClassificationOutcome::Duplicate, 1),
            ]),
        }
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
