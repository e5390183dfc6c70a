// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_utils::RetryPolicy;
use database_common::{DatabaseConfiguration, SqlitePlugin};
use dill::*;
use jobstats_journeys_sqlite::*;
use time_source::SystemTimeSourceDefault;

use crate::error::*;
use crate::output::*;
use crate::{cli, cli_commands, config};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub const BINARY_NAME: &str = "jobstats";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_LOGGING_CONFIG: &str = "info";
const VERBOSE_LOGGING_CONFIG: &str = "debug";

/// Directory under the working directory that receives the log file
pub const RUN_INFO_DIR: &str = ".jobstats";
const LOG_FILE_NAME: &str = "jobstats.log";

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn run(args: cli::Cli) -> Result<(), CLIError> {
    let work_dir = std::env::current_dir()?;

    let output_config = configure_output_format(&args);
    let guards = configure_logging(&output_config, &work_dir.join(RUN_INFO_DIR));

    tracing::info!(
        version = VERSION,
        args = ?std::env::args().collect::<Vec<_>>(),
        work_dir = ?work_dir,
        "Initializing {BINARY_NAME}"
    );

    let result = run_command(args, &work_dir, output_config.clone()).await;

    match &result {
        Ok(()) => {
            tracing::info!("Command successful");
        }
        Err(err) => {
            tracing::error!(
                error_dbg = ?err,
                error = %err.pretty(true),
                "Command failed",
            );

            if output_config.verbosity_level == 0 {
                eprintln!("{}", err.pretty(false));
            }
        }
    }

    // Flush all logging sinks
    drop(guards);

    result
}

async fn run_command(
    args: cli::Cli,
    work_dir: &Path,
    output_config: Arc<OutputConfig>,
) -> Result<(), CLIError> {
    let config = load_config(work_dir, args.config.clone())?;

    let base_catalog = {
        let mut b = configure_base_catalog();
        b.add_value(output_config.as_ref().clone());
        register_config_in_catalog(&config, &mut b);
        b.build()
    };

    let db_configuration = db_configuration_from(&config, work_dir);
    let catalog =
        SqlitePlugin::catalog_with_connected_pool(&base_catalog, &db_configuration, &SQLITE_MIGRATOR)
            .await
            .map_err(CLIError::failure)?;

    let result = async {
        let mut command = cli_commands::get_command(&catalog, args.command)?;
        command.validate_args().await?;
        command.run().await
    }
    .await;

    if let Ok(sqlite_pool) = catalog.get_one::<sqlx::SqlitePool>() {
        SqlitePlugin::shutdown(&sqlite_pool).await;
    }

    result
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Catalog
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Services and repositories, everything except config values and the pool
pub fn configure_base_catalog() -> CatalogBuilder {
    let mut b = CatalogBuilder::new();

    b.add::<SystemTimeSourceDefault>();

    b.add::<SqliteJourneyEventRepository>();
    b.add::<SqliteProcessedEventRepository>();
    b.add::<SqliteNormalizedEventRepository>();

    jobstats_journeys_services::register_dependencies(&mut b);

    b
}

fn load_config(work_dir: &Path, explicit_path: Option<PathBuf>) -> Result<config::CLIConfig, CLIError> {
    let config_svc = config::ConfigService::new(work_dir, explicit_path);
    let config = config_svc.load_with_defaults()?;

    tracing::info!(?config, "Loaded configuration");
    Ok(config)
}

/// Expects a config merged with defaults
pub fn register_config_in_catalog(config: &config::CLIConfig, catalog_builder: &mut CatalogBuilder) {
    let ingest = config.ingest.clone().unwrap_or_default();
    catalog_builder.add_value(jobstats_journeys::IngestConfig {
        ignored_authors: ingest.ignored_authors.unwrap_or_default(),
    });
    catalog_builder.add_value(IngestDefaults {
        default_channel: ingest.default_channel,
    });

    let backfill = config.backfill.clone().unwrap_or_default();
    catalog_builder.add_value(jobstats_journeys::BackfillConfig::new(
        backfill
            .synthetic_step_days
            .unwrap_or(jobstats_journeys::DEFAULT_SYNTHETIC_STEP_DAYS),
    ));

    let normalization = config.normalization.clone().unwrap_or_default();
    catalog_builder.add_value(jobstats_journeys::NormalizationConfig {
        max_concurrency: normalization
            .max_concurrency
            .unwrap_or(jobstats_journeys::DEFAULT_MAX_CONCURRENCY),
        write_batch_size: normalization
            .write_batch_size
            .unwrap_or(jobstats_journeys::DEFAULT_WRITE_BATCH_SIZE),
    });

    let retry = config.retry.clone().unwrap_or_default();
    catalog_builder.add_value(jobstats_journeys::StorageRetryConfig::new(
        retry_policy_from(&retry),
    ));
}

fn retry_policy_from(retry: &config::RetryConfig) -> RetryPolicy {
    let initial_interval = retry
        .initial_interval
        .clone()
        .map(Into::into)
        .unwrap_or(std::time::Duration::from_millis(200));

    match retry.backoff_factor {
        Some(factor) if factor > 1.0 => RetryPolicy::exponential(
            initial_interval,
            factor,
            retry.max_attempts,
            retry.max_interval.clone().map(Into::into),
        ),
        _ => RetryPolicy::fixed_delay(initial_interval, retry.max_attempts),
    }
}

fn db_configuration_from(config: &config::CLIConfig, work_dir: &Path) -> DatabaseConfiguration {
    match config.database.clone().unwrap_or_default() {
        config::DatabaseConfig::Sqlite { database_path } => {
            let database_path = if database_path.is_absolute() {
                database_path
            } else {
                work_dir.join(database_path)
            };
            DatabaseConfiguration::sqlite_from(&database_path)
        }
        config::DatabaseConfig::InMemory => DatabaseConfiguration::sqlite_in_memory(),
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Ingestion settings that only the CLI applies
#[derive(Debug, Clone, Default)]
pub struct IngestDefaults {
    pub default_channel: Option<String>,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Logging
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

fn configure_logging(output_config: &OutputConfig, run_info_dir: &Path) -> Guards {
    use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
    use tracing_log::LogTracer;
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::layer::SubscriberExt;

    // Logging may be already initialized when running under tests
    if tracing::dispatcher::has_been_set() {
        return Guards::default();
    }

    // Use configuration from RUST_LOG env var if provided
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => match output_config.verbosity_level {
            0 | 1 => EnvFilter::new(DEFAULT_LOGGING_CONFIG),
            _ => EnvFilter::new(VERBOSE_LOGGING_CONFIG),
        },
    };

    if output_config.verbosity_level > 0 {
        // Log to STDERR
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
            .with_writer(std::io::stderr)
            .pretty()
            .init();

        return Guards::default();
    }

    // Log to file with JSON formatter
    let log_file = std::fs::create_dir_all(run_info_dir)
        .and_then(|()| std::fs::File::create(run_info_dir.join(LOG_FILE_NAME)));

    let log_file = match log_file {
        Ok(log_file) => log_file,
        Err(err) => {
            // Not being able to log is no reason to refuse the command
            if !output_config.quiet {
                eprintln!(
                    "{} unable to write log file under {}: {err}",
                    console::style("Warning:").yellow().bold(),
                    run_info_dir.display(),
                );
            }
            return Guards::default();
        }
    };

    let (appender, appender_guard) = tracing_appender::non_blocking(log_file);

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(BunyanFormattingLayer::new(BINARY_NAME.to_owned(), appender));

    // Redirect all standard logging to tracing events
    if let Err(err) = LogTracer::init() {
        eprintln!("Failed to redirect log records: {err}");
    }

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {err}");
    }

    Guards {
        appender: Some(appender_guard),
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Output format
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

fn configure_output_format(args: &cli::Cli) -> Arc<OutputConfig> {
    let is_tty = console::Term::stdout().features().is_attended();

    let format = args.output_format.unwrap_or(if is_tty {
        OutputFormat::Table
    } else {
        OutputFormat::Json
    });

    Arc::new(OutputConfig {
        quiet: args.quiet,
        verbosity_level: args.verbose,
        is_tty,
        format,
    })
}

#[allow(dead_code)]
#[derive(Default)]
struct Guards {
    appender: Option<tracing_appender::non_blocking::WorkerGuard>,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
