// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::path::PathBuf;

use database_common::{DatabaseConfiguration, SqlitePlugin};
use jobstats_cli::{self, OutputConfig, cli};
use jobstats_journeys::*;
use jobstats_journeys_sqlite::SQLITE_MIGRATOR;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_group::group(database, sqlite)]
#[test_log::test(tokio::test)]
async fn test_di_use_cases_resolve() {
    let catalog = cli_catalog().await;

    catalog
        .get_one::<dyn IngestClassifiedRecordsUseCase>()
        .unwrap();
    catalog.get_one::<dyn NormalizeJourneysUseCase>().unwrap();
    catalog.get_one::<dyn SeedProcessedLedgerUseCase>().unwrap();
    catalog
        .get_one::<dyn QueryNormalizedEventsUseCase>()
        .unwrap();
    catalog.get_one::<StageBackfillPlanner>().unwrap();
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_group::group(database, sqlite)]
#[test_log::test(tokio::test)]
async fn test_di_every_command_resolves() {
    let catalog = cli_catalog().await;

    let commands = [
        cli::Command::Ingest(cli::Ingest {
            input: PathBuf::from("-"),
            channel: None,
        }),
        cli::Command::Normalize(cli::Normalize {}),
        cli::Command::Ledger(cli::Ledger {
            subcommand: cli::LedgerSubCommand::Seed(cli::LedgerSeed {}),
        }),
        cli::Command::Ledger(cli::Ledger {
            subcommand: cli::LedgerSubCommand::Stats(cli::LedgerStats {}),
        }),
        cli::Command::Events(cli::Events {
            subcommand: cli::EventsSubCommand::List(cli::EventsList {
                employers: vec![],
                stages: vec![],
                from: None,
                to: None,
                real_only: false,
            }),
        }),
        cli::Command::Events(cli::Events {
            subcommand: cli::EventsSubCommand::Journey(cli::EventsJourney {
                employer: "Acme".to_string(),
                candidate: "sam".to_string(),
                track: Track::Intern,
            }),
        }),
    ];

    for command in commands {
        let description = format!("{command:?}");
        assert!(
            jobstats_cli::get_command(&catalog, command).is_ok(),
            "Unable to construct {description}"
        );
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

async fn cli_catalog() -> dill::Catalog {
    let mut base_catalog_builder = jobstats_cli::configure_base_catalog();
    base_catalog_builder.add_value(OutputConfig::default());
    jobstats_cli::register_config_in_catalog(
        &jobstats_cli::config::CLIConfig::default(),
        &mut base_catalog_builder,
    );
    let base_catalog = base_catalog_builder.build();

    SqlitePlugin::catalog_with_connected_pool(
        &base_catalog,
        &DatabaseConfiguration::sqlite_in_memory(),
        &SQLITE_MIGRATOR,
    )
    .await
    .unwrap()
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
