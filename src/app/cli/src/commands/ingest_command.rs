// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::path::PathBuf;
use std::sync::Arc;

use jobstats_journeys::*;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use super::{CLIError, Command};
use crate::OutputConfig;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Records handed to the use case at once
const INGEST_CHUNK_SIZE: usize = 1000;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct IngestCommand {
    ingest_use_case: Arc<dyn IngestClassifiedRecordsUseCase>,
    output_config: Arc<OutputConfig>,
    input: PathBuf,
    channel: Option<String>,
}

impl IngestCommand {
    pub fn new(
        ingest_use_case: Arc<dyn IngestClassifiedRecordsUseCase>,
        output_config: Arc<OutputConfig>,
        input: PathBuf,
        channel: Option<String>,
    ) -> Self {
        Self {
            ingest_use_case,
            output_config,
            input,
            channel,
        }
    }

    fn reads_stdin(&self) -> bool {
        self.input.as_os_str() == "-"
    }

    async fn ingest_from(
        &self,
        reader: impl AsyncBufRead + Unpin,
    ) -> Result<IngestReport, CLIError> {
        let mut report = IngestReport::default();
        let mut chunk = Vec::with_capacity(INGEST_CHUNK_SIZE);

        let mut lines = reader.lines();
        let mut line_no = 0;
        while let Some(line) = lines.next_line().await? {
            line_no += 1;
            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str::<ClassifiedRecord>(&line) {
                Ok(record) => chunk.push(record),
                Err(err) => {
                    tracing::warn!(line_no, error = %err, "Skipping malformed record");
                    report.malformed += 1;
                    continue;
                }
            }

            if chunk.len() == INGEST_CHUNK_SIZE {
                self.ingest_chunk(std::mem::take(&mut chunk), &mut report)
                    .await?;
            }
        }

        if !chunk.is_empty() {
            self.ingest_chunk(chunk, &mut report).await?;
        }

        Ok(report)
    }

    async fn ingest_chunk(
        &self,
        records: Vec<ClassifiedRecord>,
        report: &mut IngestReport,
    ) -> Result<(), CLIError> {
        let summary = self
            .ingest_use_case
            .execute(
                records,
                IngestOptions {
                    channel: self.channel.clone(),
                    source: ProcessingSource::Parsing,
                },
            )
            .await
            .map_err(CLIError::failure)?;

        report.summary.merge(&summary);
        Ok(())
    }
}

#[derive(Debug, Default, serde::Serialize)]
struct IngestReport {
    #[serde(flatten)]
    summary: IngestSummary,
    /// Lines that are not a classifier record
    malformed: usize,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[async_trait::async_trait(?Send)]
impl Command for IngestCommand {
    async fn validate_args(&self) -> Result<(), CLIError> {
        if !self.reads_stdin() && !self.input.is_file() {
            return Err(CLIError::usage_error(format!(
                "Input file {} does not exist",
                self.input.display()
            )));
        }
        Ok(())
    }

    async fn run(&mut self) -> Result<(), CLIError> {
        let report = if self.reads_stdin() {
            self.ingest_from(BufReader::new(tokio::io::stdin())).await?
        } else {
            let file = tokio::fs::File::open(&self.input).await?;
            self.ingest_from(BufReader::new(file)).await?
        };

        self.output_config.write_object("Ingestion", &report)?;

        if report.summary.failed > 0 {
            self.output_config.info(
                console::style(format!(
                    "{} record(s) could not be stored and will be retried on the next run",
                    report.summary.failed
                ))
                .yellow(),
            );
        }

        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
