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
use jobstats_journeys::{Stage, Track};

use crate::config::CONFIG_PATH_ENV_VAR;
use crate::output::OutputFormat;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, clap::Parser)]
#[command(name = crate::BINARY_NAME)]
#[command(version = crate::VERSION)]
#[command(about = "Turns classified interview reports into normalized candidate journeys")]
#[command(after_help = r#"
Typical pipeline run:

  jobstats ingest classified.jsonl --channel intern-2024
  jobstats normalize
  jobstats events list --employer Acme --from 2024-03-01

Config is read from `.jobstats.yaml` in the working directory unless a
path is given explicitly.
"#)]
pub struct Cli {
    /// Sets the level of verbosity (repeat for more)
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Path to the config file
    #[arg(long, value_name = "PATH", env = CONFIG_PATH_ENV_VAR, global = true)]
    pub config: Option<PathBuf>,

    /// Format of the command output
    #[arg(long, short = 'o', value_enum, global = true)]
    pub output_format: Option<OutputFormat>,

    #[command(subcommand)]
    pub command: Command,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    Ingest(Ingest),
    Normalize(Normalize),
    Ledger(Ledger),
    Events(Events),
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Ingests classifier output into the event store
#[derive(Debug, clap::Args)]
#[command(after_help = r#"
Each line of the input is one JSON record as produced by the classifier:

  {"event_id": "1201", "employer": "Acme", "candidate": "sam", "stage": "OA", "timestamp": "2024-03-01T12:00:00Z"}

Records already seen by an earlier run are skipped, so the same file can be
ingested again safely.
"#)]
pub struct Ingest {
    /// JSON-lines file to read, `-` for STDIN
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Channel the records were harvested from, used to derive the track
    #[arg(long, value_name = "NAME")]
    pub channel: Option<String>,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Rebuilds the normalized store, backfilling implied stages
#[derive(Debug, clap::Args)]
pub struct Normalize {}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Dedup ledger maintenance
#[derive(Debug, clap::Args)]
pub struct Ledger {
    #[command(subcommand)]
    pub subcommand: LedgerSubCommand,
}

#[derive(Debug, clap::Subcommand)]
pub enum LedgerSubCommand {
    Seed(LedgerSeed),
    Stats(LedgerStats),
}

/// Marks every stored event as processed
#[derive(Debug, clap::Args)]
pub struct LedgerSeed {}

/// Shows ledger entry counts per outcome
#[derive(Debug, clap::Args)]
pub struct LedgerStats {}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Queries the normalized store
#[derive(Debug, clap::Args)]
pub struct Events {
    #[command(subcommand)]
    pub subcommand: EventsSubCommand,
}

#[derive(Debug, clap::Subcommand)]
pub enum EventsSubCommand {
    List(EventsList),
    Journey(EventsJourney),
}

/// Lists normalized events ordered by time
#[derive(Debug, clap::Args)]
pub struct EventsList {
    /// Only events of this employer (repeatable)
    #[arg(long = "employer", value_name = "NAME")]
    pub employers: Vec<String>,

    /// Only events at this stage (repeatable)
    #[arg(long = "stage", value_name = "STAGE", value_parser = parse_stage)]
    pub stages: Vec<Stage>,

    /// First day to include
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub from: Option<NaiveDate>,

    /// Last day to include, the whole day counts
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub to: Option<NaiveDate>,

    /// Exclude synthetic events
    #[arg(long)]
    pub real_only: bool,
}

/// Shows one candidate journey in stage order
#[derive(Debug, clap::Args)]
pub struct EventsJourney {
    #[arg(value_name = "EMPLOYER")]
    pub employer: String,

    #[arg(value_name = "CANDIDATE")]
    pub candidate: String,

    #[arg(long, value_name = "TRACK", default_value = "intern", value_parser = parse_track)]
    pub track: Track,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

fn parse_stage(s: &str) -> Result<Stage, String> {
    s.parse()
        .map_err(|_| format!("Unknown stage '{s}', expected one of: App, OA, Phone/R1, Onsite, HM, Offer, Reject"))
}

fn parse_track(s: &str) -> Result<Track, String> {
    s.parse()
        .map_err(|_| format!("Unknown track '{s}', expected one of: new_grad, intern"))
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
