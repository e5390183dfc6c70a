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

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

fn event(id: &str, employer: Option<&str>, candidate: Option<&str>, track: Track) -> JourneyEvent {
    JourneyEvent {
        event_id: EventID::new(id),
        employer: employer.map(str::to_string),
        candidate: candidate.map(str::to_string),
        track,
        stage: Stage::OnlineAssessment,
        timestamp: None,
        is_synthetic: false,
        text: String::new(),
        category: None,
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test]
fn test_groups_by_employer_candidate_and_track() {
    let grouped = group_journeys(vec![
        event("1", Some("Acme"), Some("sam"), Track::Intern),
        event("2", Some("Acme"), Some("sam"), Track::NewGrad),
        event("3", Some("Acme"), Some("sam"), Track::Intern),
        event("4", Some("Globex"), Some("sam"), Track::Intern),
        event("5", Some("Acme"), Some("kim"), Track::Intern),
    ]);

    let summary: Vec<(String, Vec<String>)> = grouped
        .journeys
        .iter()
        .map(|j| {
            (
                j.key.to_string(),
                j.events.iter().map(|e| e.event_id.to_string()).collect(),
            )
        })
        .collect();

    assert_eq!(
        summary,
        vec![
            ("Acme/kim/intern".to_string(), vec!["5".to_string()]),
            ("Acme/sam/new_grad".to_string(), vec!["2".to_string()]),
            (
                "Acme/sam/intern".to_string(),
                vec!["1".to_string(), "3".to_string()]
            ),
            ("Globex/sam/intern".to_string(), vec!["4".to_string()]),
        ]
    );
    assert!(grouped.ungroupable.is_empty());
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test]
fn test_missing_key_parts_are_passed_through() {
    let grouped = group_journeys(vec![
        event("1", None, Some("sam"), Track::Intern),
        event("2", Some("Acme"), None, Track::Intern),
        event("3", Some("  "), Some("sam"), Track::Intern),
        event("4", Some("Acme"), Some("sam"), Track::Intern),
    ]);

    assert_eq!(grouped.journeys.len(), 1);
    assert_eq!(
        grouped
            .ungroupable
            .iter()
            .map(|e| e.event_id.as_str())
            .collect::<Vec<_>>(),
        vec!["1", "2", "3"]
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test]
fn test_empty_input() {
    let grouped = group_journeys(Vec::new());
    assert!(grouped.journeys.is_empty());
    assert!(grouped.ungroupable.is_empty());
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
