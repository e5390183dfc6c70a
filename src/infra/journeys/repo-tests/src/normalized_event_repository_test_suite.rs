// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use chrono::NaiveDate;
use dill::Catalog;
use jobstats_journeys::*;
use pretty_assertions::assert_eq;

use crate::helpers::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_upsert_inserts_then_replaces(catalog: &Catalog) {
    let repo = catalog.get_one::<dyn NormalizedEventRepository>().unwrap();

    let event = real_event("m-1", "Acme", "sam", Track::Intern, Stage::Onsite, Some(at(4, 10)));
    let res = repo
        .upsert_events(&[event.clone()], BatchReporting::Aggregate)
        .await
        .unwrap();
    assert_eq!(
        res,
        UpsertBatchResult {
            upserted: 1,
            failed: 0,
            failures: None,
        }
    );

    // Same key again: replaced, not appended
    let mut updated = event.clone();
    updated.text = "edited".to_string();
    updated.timestamp = Some(at(5, 10));
    repo.upsert_events(&[updated.clone()], BatchReporting::Aggregate)
        .await
        .unwrap();
    repo.upsert_events(&[updated.clone()], BatchReporting::Aggregate)
        .await
        .unwrap();

    let events = repo
        .list_events(&JourneyEventFilter::default())
        .await
        .unwrap();
    assert_eq!(events, vec![updated]);
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_upsert_batch_tolerates_partial_failures(catalog: &Catalog) {
    let repo = catalog.get_one::<dyn NormalizedEventRepository>().unwrap();

    let key = JourneyKey::new("Acme", "sam", Track::Intern);
    let good_real = real_event("m-1", "Acme", "sam", Track::Intern, Stage::Onsite, Some(at(10, 12)));
    let good_synthetic = synthetic_event(&key, Stage::PhoneScreen, at(10, 12), 1);
    let bad_synthetic = synthetic_event(&key, Stage::Offer, at(10, 12), 1);

    let batch = vec![good_real.clone(), bad_synthetic.clone(), good_synthetic.clone()];

    let res = repo
        .upsert_events(&batch, BatchReporting::Aggregate)
        .await
        .unwrap();
    assert_eq!((res.upserted, res.failed, res.failures), (2, 1, None));

    let res = repo
        .upsert_events(&batch, BatchReporting::PerItem)
        .await
        .unwrap();
    assert_eq!((res.upserted, res.failed), (2, 1));
    let failures = res.failures.unwrap();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].event_id, bad_synthetic.event_id);

    let events = repo
        .list_journey_events(&key)
        .await
        .unwrap();
    assert_eq!(events, vec![good_synthetic, good_real]);
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_list_and_delete_synthetic_events(catalog: &Catalog) {
    let repo = catalog.get_one::<dyn NormalizedEventRepository>().unwrap();

    let sam = JourneyKey::new("Acme", "sam", Track::Intern);
    let sam_ng = JourneyKey::new("Acme", "sam", Track::NewGrad);

    let sam_oa = synthetic_event(&sam, Stage::OnlineAssessment, at(10, 12), 2);
    let sam_phone = synthetic_event(&sam, Stage::PhoneScreen, at(10, 12), 1);
    let sam_ng_oa = synthetic_event(&sam_ng, Stage::OnlineAssessment, at(10, 12), 1);
    let sam_real = real_event("m-1", "Acme", "sam", Track::Intern, Stage::Onsite, Some(at(10, 12)));

    repo.upsert_events(
        &[
            sam_oa.clone(),
            sam_phone.clone(),
            sam_ng_oa.clone(),
            sam_real.clone(),
        ],
        BatchReporting::Aggregate,
    )
    .await
    .unwrap();

    let mut expected = vec![sam_oa.event_id.clone(), sam_phone.event_id.clone()];
    expected.sort();
    assert_eq!(repo.list_synthetic_event_ids(&sam).await.unwrap(), expected);

    let removed = repo
        .delete_events(&[sam_oa.event_id.clone(), EventID::new("missing")])
        .await
        .unwrap();
    assert_eq!(removed, 1);

    assert_eq!(
        repo.list_synthetic_event_ids(&sam).await.unwrap(),
        vec![sam_phone.event_id.clone()]
    );
    assert_eq!(
        repo.list_synthetic_event_ids(&sam_ng).await.unwrap(),
        vec![sam_ng_oa.event_id]
    );
    assert_eq!(repo.delete_events(&[]).await.unwrap(), 0);
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_list_events_with_filter(catalog: &Catalog) {
    let repo = catalog.get_one::<dyn NormalizedEventRepository>().unwrap();

    let key = JourneyKey::new("Acme", "sam", Track::Intern);
    let a = real_event("a", "Acme", "sam", Track::Intern, Stage::Onsite, Some(at(10, 23)));
    let b = real_event("b", "Globex", "kim", Track::Intern, Stage::Offer, Some(at(11, 0)));
    let c = real_event("c", "Acme", "lee", Track::NewGrad, Stage::Reject, None);
    let d = real_event("d", "Initech", "kim", Track::Intern, Stage::OnlineAssessment, Some(at(9, 0)));
    let s = synthetic_event(&key, Stage::PhoneScreen, at(10, 23), 1);

    repo.upsert_events(
        &[a.clone(), b.clone(), c.clone(), d.clone(), s.clone()],
        BatchReporting::Aggregate,
    )
    .await
    .unwrap();

    // Unbounded: everything, missing timestamps last
    let all = repo
        .list_events(&JourneyEventFilter::default())
        .await
        .unwrap();
    assert_eq!(ids(&all), vec![s.event_id.as_str(), "d", "a", "b", "c"]);

    // End date includes the whole day, events without time never match
    let res = repo
        .list_events(&JourneyEventFilter {
            from: NaiveDate::from_ymd_opt(2024, 3, 9),
            to: NaiveDate::from_ymd_opt(2024, 3, 10),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(ids(&res), vec!["d", "a"]);

    let res = repo
        .list_events(&JourneyEventFilter {
            from: NaiveDate::from_ymd_opt(2024, 3, 11),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(ids(&res), vec!["b"]);

    let res = repo
        .list_events(&JourneyEventFilter {
            employers: vec!["Acme".to_string(), "Globex".to_string()],
            include_synthetic: false,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(ids(&res), vec!["a", "b", "c"]);

    let res = repo
        .list_events(&JourneyEventFilter {
            stages: vec![Stage::PhoneScreen, Stage::Reject],
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(ids(&res), vec![s.event_id.as_str(), "c"]);
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_list_journey_events_in_stage_order(catalog: &Catalog) {
    let repo = catalog.get_one::<dyn NormalizedEventRepository>().unwrap();

    let key = JourneyKey::new("Acme", "sam", Track::Intern);
    let reject = real_event("m-3", "Acme", "sam", Track::Intern, Stage::Reject, Some(at(2, 9)));
    let onsite = real_event("m-2", "Acme", "sam", Track::Intern, Stage::Onsite, Some(at(20, 9)));
    let app = real_event("m-1", "Acme", "sam", Track::Intern, Stage::Application, None);
    let onsite_again = real_event("m-4", "Acme", "sam", Track::Intern, Stage::Onsite, Some(at(1, 9)));
    let other = real_event("m-5", "Acme", "kim", Track::Intern, Stage::Onsite, Some(at(1, 9)));
    let oa = synthetic_event(&key, Stage::OnlineAssessment, at(20, 9), 2);

    repo.upsert_events(
        &[
            reject.clone(),
            onsite.clone(),
            app.clone(),
            onsite_again.clone(),
            other,
            oa.clone(),
        ],
        BatchReporting::Aggregate,
    )
    .await
    .unwrap();

    let events = repo.list_journey_events(&key).await.unwrap();
    assert_eq!(events, vec![app, oa, onsite_again, onsite, reject]);
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
