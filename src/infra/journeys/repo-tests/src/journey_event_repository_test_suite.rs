// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use dill::Catalog;
use jobstats_journeys::*;
use pretty_assertions::assert_eq;

use crate::helpers::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_no_journey_events_initially(catalog: &Catalog) {
    let repo = catalog.get_one::<dyn JourneyEventRepository>().unwrap();

    let events = repo.get_real_events().await.unwrap();
    assert!(events.is_empty());

    let found = repo
        .find_event_by_journey_stage(
            &JourneyKey::new("Acme", "sam", Track::Intern),
            Stage::OnlineAssessment,
        )
        .await
        .unwrap();
    assert_eq!(found, None);
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_save_and_read_journey_events(catalog: &Catalog) {
    let repo = catalog.get_one::<dyn JourneyEventRepository>().unwrap();

    let e1 = real_event("m-2", "Acme", "sam", Track::Intern, Stage::Onsite, Some(at(4, 10)));
    let e2 = real_event("m-1", "Acme", "sam", Track::Intern, Stage::OnlineAssessment, None);
    let mut e3 = real_event("m-3", "Globex", "kim", Track::NewGrad, Stage::Reject, Some(at(5, 9)));
    e3.employer = None;

    for e in [&e1, &e2, &e3] {
        repo.save_event(e).await.unwrap();
    }

    let events = repo.get_real_events().await.unwrap();
    assert_eq!(events, vec![e2, e1, e3]);
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_save_duplicate_journey_event(catalog: &Catalog) {
    let repo = catalog.get_one::<dyn JourneyEventRepository>().unwrap();

    let event = real_event("m-1", "Acme", "sam", Track::Intern, Stage::Onsite, Some(at(4, 10)));
    repo.save_event(&event).await.unwrap();

    let mut changed = event.clone();
    changed.stage = Stage::Offer;
    let res = repo.save_event(&changed).await;
    assert!(
        matches!(
            &res,
            Err(SaveJourneyEventError::Duplicate(DuplicateJourneyEventError { event_id }))
                if *event_id == event.event_id
        ),
        "{res:?}"
    );

    // First write wins
    assert_eq!(repo.get_real_events().await.unwrap(), vec![event]);
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_find_event_by_journey_stage(catalog: &Catalog) {
    let repo = catalog.get_one::<dyn JourneyEventRepository>().unwrap();

    repo.save_event(&real_event(
        "m-1",
        "Acme",
        "sam",
        Track::Intern,
        Stage::PhoneScreen,
        None,
    ))
    .await
    .unwrap();

    let intern = JourneyKey::new("Acme", "sam", Track::Intern);
    let new_grad = JourneyKey::new("Acme", "sam", Track::NewGrad);

    assert_eq!(
        repo.find_event_by_journey_stage(&intern, Stage::PhoneScreen)
            .await
            .unwrap(),
        Some(EventID::new("m-1"))
    );
    assert_eq!(
        repo.find_event_by_journey_stage(&intern, Stage::Onsite)
            .await
            .unwrap(),
        None
    );
    assert_eq!(
        repo.find_event_by_journey_stage(&new_grad, Stage::PhoneScreen)
            .await
            .unwrap(),
        None
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_real_events_exclude_synthetic_namespace(catalog: &Catalog) {
    let repo = catalog.get_one::<dyn JourneyEventRepository>().unwrap();

    let key = JourneyKey::new("Acme", "sam", Track::Intern);
    let legacy_synthetic = synthetic_event(&key, Stage::OnlineAssessment, at(10, 12), 1);
    let real = real_event("m-1", "Acme", "sam", Track::Intern, Stage::Onsite, Some(at(10, 12)));

    repo.save_event(&legacy_synthetic).await.unwrap();
    repo.save_event(&real).await.unwrap();

    let events = repo.get_real_events().await.unwrap();
    assert_eq!(ids(&events), vec!["m-1"]);
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
