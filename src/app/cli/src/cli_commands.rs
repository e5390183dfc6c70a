// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use dill::Catalog;
use jobstats_journeys::{JourneyEventFilter, JourneyKey};

use crate::IngestDefaults;
use crate::cli;
use crate::commands::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub fn get_command(catalog: &Catalog, command: cli::Command) -> Result<Box<dyn Command>, CLIError> {
    let command: Box<dyn Command> = match command {
        cli::Command::Ingest(c) => Box::new(IngestCommand::new(
            catalog.get_one()?,
            catalog.get_one()?,
            c.input,
            c.channel.or_else(|| {
                catalog
                    .get_one::<IngestDefaults>()
                    .ok()
                    .and_then(|defaults| defaults.default_channel.clone())
            }),
        )),

        cli::Command::Normalize(_) => {
            Box::new(NormalizeCommand::new(catalog.get_one()?, catalog.get_one()?))
        }

        cli::Command::Ledger(c) => match c.subcommand {
            cli::LedgerSubCommand::Seed(_) => {
                Box::new(LedgerSeedCommand::new(catalog.get_one()?, catalog.get_one()?))
            }
            cli::LedgerSubCommand::Stats(_) => {
                Box::new(LedgerStatsCommand::new(catalog.get_one()?, catalog.get_one()?))
            }
        },

        cli::Command::Events(c) => match c.subcommand {
            cli::EventsSubCommand::List(sc) => Box::new(EventsListCommand::new(
                catalog.get_one()?,
                catalog.get_one()?,
                JourneyEventFilter {
                    employers: sc.employers,
                    stages: sc.stages,
                    from: sc.from,
                    to: sc.to,
                    include_synthetic: !sc.real_only,
                },
            )),
            cli::EventsSubCommand::Journey(sc) => Box::new(EventsJourneyCommand::new(
                catalog.get_one()?,
                catalog.get_one()?,
                JourneyKey::new(sc.employer, sc.candidate, sc.track),
            )),
        },
    };

    Ok(command)
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
