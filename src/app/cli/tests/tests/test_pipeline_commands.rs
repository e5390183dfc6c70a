// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::path::PathBuf;

use chrono::NaiveDate;
use database_common::{DatabaseConfiguration, SqlitePlugin};
use dill::Catalog;
use jobstats_cli::config::CLIConfig;
use jobstats_cli::{CLIError, OutputConfig, OutputFormat, cli};
use jobstats_journeys::*;
use jobstats_journeys_sqlite::SQLITE_MIGRATOR;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

const CLASSIFIER_OUTPUT: &str = indoc::indoc!(
    r#"
    {"event_id": "1", "employer": "Acme", "candidate": "sam", "stage": "Onsite", "channel": "intern-2024", "timestamp": "2024-03-10T12:00:00Z"}
    {"msg_id": "2", "company": "Acme", "author": "kim", "stage": "OA", "timestamp": "2024-03-05T09:00:00Z"}
    this line is not a record

    {"event_id": "3", "employer": "Globex", "candidate": "leetbot", "stage": "Offer", "timestamp": "2024-03-06T09:00:00Z"}
    {"event_id": "4", "employer": "Acme", "candidate": "sam", "stage": "Lunch", "timestamp": "2024-03-06T10:00:00Z"}
    "#
);

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_group::group(database, sqlite)]
#[test_log::test(tokio::test)]
async fn test_ingest_then_normalize() {
    let harness = PipelineHarness::new(CLIConfig::default()).await;
    let input = harness.write_input(CLASSIFIER_OUTPUT);

    harness.ingest(&input, None).await.unwrap();
    harness.normalize().await.unwrap();

    let sam = harness
        .journey(JourneyKey::new("Acme", "sam", Track::Intern))
        .await;
    pretty_assertions::assert_eq!(
        sam,
        vec![
            (Stage::OnlineAssessment, true, Some(at(4, 12))),
            (Stage::PhoneScreen, true, Some(at(7, 12))),
            (Stage::Onsite, false, Some(at(10, 12))),
        ]
    );

    let kim = harness
        .journey(JourneyKey::new("Acme", "kim", Track::Intern))
        .await;
    pretty_assertions::assert_eq!(kim, vec![(Stage::OnlineAssessment, false, Some(at(5, 9)))]);

    let stats = harness.ledger_stats().await;
    pretty_assertions::assert_eq!(stats.total, 4);
    pretty_assertions::assert_eq!(stats.by_outcome.get(&ClassificationOutcome::Accepted), Some(&2));
    pretty_assertions::assert_eq!(stats.by_outcome.get(&ClassificationOutcome::Ignored), Some(&1));
    pretty_assertions::assert_eq!(
        stats.by_outcome.get(&ClassificationOutcome::Quarantined),
        Some(&1)
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_group::group(database, sqlite)]
#[test_log::test(tokio::test)]
async fn test_pipeline_rerun_changes_nothing() {
    let harness = PipelineHarness::new(CLIConfig::default()).await;
    let input = harness.write_input(CLASSIFIER_OUTPUT);

    harness.ingest(&input, None).await.unwrap();
    harness.normalize().await.unwrap();

    let events_before = harness.all_events().await;
    let stats_before = harness.ledger_stats().await;

    harness.ingest(&input, None).await.unwrap();
    harness.normalize().await.unwrap();

    pretty_assertions::assert_eq!(harness.all_events().await, events_before);
    pretty_assertions::assert_eq!(harness.ledger_stats().await, stats_before);
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_group::group(database, sqlite)]
#[test_log::test(tokio::test)]
async fn test_channel_selects_track() {
    let mut config = CLIConfig::default();
    config.ingest.as_mut().unwrap().default_channel = Some("new-grad-2025".to_string());

    let harness = PipelineHarness::new(config).await;
    let input = harness.write_input(indoc::indoc!(
        r#"
        {"event_id": "10", "employer": "Acme", "candidate": "sam", "stage": "Phone", "timestamp": "2024-03-10T12:00:00Z"}
        {"event_id": "11", "employer": "Acme", "candidate": "ali", "stage": "Onsite", "channel": "intern-2024", "timestamp": "2024-03-10T12:00:00Z"}
        "#
    ));

    harness.ingest(&input, None).await.unwrap();

    let input = harness.write_input(indoc::indoc!(
        r#"
        {"event_id": "12", "employer": "Globex", "candidate": "sam", "stage": "OA", "timestamp": "2024-03-11T12:00:00Z"}
        "#
    ));
    harness
        .ingest(&input, Some("interns-summer".to_string()))
        .await
        .unwrap();

    harness.normalize().await.unwrap();

    // Config default applies when the command names no channel
    let sam_new_grad = harness
        .journey(JourneyKey::new("Acme", "sam", Track::NewGrad))
        .await;
    pretty_assertions::assert_eq!(
        sam_new_grad
            .iter()
            .map(|(stage, synthetic, _)| (*stage, *synthetic))
            .collect::<Vec<_>>(),
        vec![
            (Stage::OnlineAssessment, true),
            (Stage::PhoneScreen, false),
        ]
    );

    // Channel on the record wins over the default
    let ali = harness
        .journey(JourneyKey::new("Acme", "ali", Track::Intern))
        .await;
    pretty_assertions::assert_eq!(ali.len(), 3);

    // Explicit channel wins over the config default
    let sam_globex = harness
        .journey(JourneyKey::new("Globex", "sam", Track::Intern))
        .await;
    pretty_assertions::assert_eq!(
        sam_globex,
        vec![(Stage::OnlineAssessment, false, Some(at(11, 12)))]
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_group::group(database, sqlite)]
#[test_log::test(tokio::test)]
async fn test_invalid_arguments_are_usage_errors() {
    let harness = PipelineHarness::new(CLIConfig::default()).await;

    let res = harness
        .run(cli::Command::Events(cli::Events {
            subcommand: cli::EventsSubCommand::List(cli::EventsList {
                employers: vec![],
                stages: vec![],
                from: NaiveDate::from_ymd_opt(2024, 3, 10),
                to: NaiveDate::from_ymd_opt(2024, 3, 1),
                real_only: false,
            }),
        }))
        .await;
    assert!(matches!(res, Err(CLIError::UsageError(_))), "{res:?}");

    let res = harness
        .ingest(&harness.temp_dir.path().join("absent.jsonl"), None)
        .await;
    assert!(matches!(res, Err(CLIError::UsageError(_))), "{res:?}");
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_group::group(database, sqlite)]
#[test_log::test(tokio::test)]
async fn test_query_commands_succeed() {
    let harness = PipelineHarness::new(CLIConfig::default()).await;
    let input = harness.write_input(CLASSIFIER_OUTPUT);

    harness.ingest(&input, None).await.unwrap();
    harness.normalize().await.unwrap();

    for command in [
        cli::Command::Events(cli::Events {
            subcommand: cli::EventsSubCommand::List(cli::EventsList {
                employers: vec!["Acme".to_string()],
                stages: vec![Stage::OnlineAssessment],
                from: NaiveDate::from_ymd_opt(2024, 3, 1),
                to: NaiveDate::from_ymd_opt(2024, 3, 31),
                real_only: true,
            }),
        }),
        cli::Command::Events(cli::Events {
            subcommand: cli::EventsSubCommand::Journey(cli::EventsJourney {
                employer: "Acme".to_string(),
                candidate: "sam".to_string(),
                track: Track::Intern,
            }),
        }),
        cli::Command::Ledger(cli::Ledger {
            subcommand: cli::LedgerSubCommand::Stats(cli::LedgerStats {}),
        }),
        cli::Command::Ledger(cli::Ledger {
            subcommand: cli::LedgerSubCommand::Seed(cli::LedgerSeed {}),
        }),
    ] {
        harness.run(command).await.unwrap();
    }

    // Every stored event already had a ledger entry
    pretty_assertions::assert_eq!(harness.ledger_stats().await.total, 4);
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Harness
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

struct PipelineHarness {
    temp_dir: tempfile::TempDir,
    catalog: Catalog,
}

impl PipelineHarness {
    async fn new(config: CLIConfig) -> Self {
        let temp_dir = tempfile::tempdir().unwrap();

        let mut base_catalog_builder = jobstats_cli::configure_base_catalog();
        base_catalog_builder.add_value(OutputConfig {
            quiet: true,
            format: OutputFormat::Json,
            ..OutputConfig::default()
        });
        jobstats_cli::register_config_in_catalog(
            &config.merge_with_defaults(),
            &mut base_catalog_builder,
        );
        let base_catalog = base_catalog_builder.build();

        let catalog = SqlitePlugin::catalog_with_connected_pool(
            &base_catalog,
            &DatabaseConfiguration::sqlite_in_memory(),
            &SQLITE_MIGRATOR,
        )
        .await
        .unwrap();

        Self { temp_dir, catalog }
    }

    fn write_input(&self, content: &str) -> PathBuf {
        let path = self.temp_dir.path().join("classified.jsonl");
        std::fs::write(&path, content).unwrap();
        path
    }

    async fn run(&self, command: cli::Command) -> Result<(), CLIError> {
        let mut command = jobstats_cli::get_command(&self.catalog, command)?;
        command.validate_args().await?;
        command.run().await
    }

    async fn ingest(&self, input: &std::path::Path, channel: Option<String>) -> Result<(), CLIError> {
        self.run(cli::Command::Ingest(cli::Ingest {
            input: input.to_path_buf(),
            channel,
        }))
        .await
    }

    async fn normalize(&self) -> Result<(), CLIError> {
        self.run(cli::Command::Normalize(cli::Normalize {})).await
    }

    fn query(&self) -> std::sync::Arc<dyn QueryNormalizedEventsUseCase> {
        self.catalog.get_one().unwrap()
    }

    async fn journey(&self, key: JourneyKey) -> Vec<(Stage, bool, Option<chrono::DateTime<chrono::Utc>>)> {
        self.query()
            .list_journey_events(&key)
            .await
            .unwrap()
            .into_iter()
            .map(|e| (e.stage, e.is_synthetic, e.timestamp))
            .collect()
    }

    async fn all_events(&self) -> Vec<JourneyEvent> {
        self.query()
            .list_events(JourneyEventFilter::default())
            .await
            .unwrap()
    }

    async fn ledger_stats(&self) -> ProcessedLedgerStats {
        self.query().get_ledger_stats().await.unwrap()
    }
}

fn at(day: u32, hour: u32) -> chrono::DateTime<chrono::Utc> {
    NaiveDate::from_ymd_opt(2024, 3, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
        .and_utc()
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
