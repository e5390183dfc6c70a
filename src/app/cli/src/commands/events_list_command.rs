// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use jobstats_journeys::*;

use super::{CLIError, Command};
use crate::output::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct EventsListCommand {
    query_use_case: Arc<dyn QueryNormalizedEventsUseCase>,
    output_config: Arc<OutputConfig>,
    filter: JourneyEventFilter,
}

impl EventsListCommand {
    pub fn new(
        query_use_case: Arc<dyn QueryNormalizedEventsUseCase>,
        output_config: Arc<OutputConfig>,
        filter: JourneyEventFilter,
    ) -> Self {
        Self {
            query_use_case,
            output_config,
            filter,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl Command for EventsListCommand {
    async fn validate_args(&self) -> Result<(), CLIError> {
        if let (Some(from), Some(to)) = (self.filter.from, self.filter.to) {
            if from > to {
                return Err(CLIError::usage_error(format!(
                    "--from {from} is after --to {to}"
                )));
            }
        }
        Ok(())
    }

    async fn run(&mut self) -> Result<(), CLIError> {
        let events = self
            .query_use_case
            .list_events(self.filter.clone())
            .await
            .map_err(|e| match e {
                QueryNormalizedEventsError::InvalidFilter(e) => CLIError::usage_error_from(e),
                e @ QueryNormalizedEventsError::Internal(_) => CLIError::failure(e),
            })?;

        write_events(&self.output_config, &events)?;

        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub(crate) fn write_events(
    output_config: &OutputConfig,
    events: &[JourneyEvent],
) -> Result<(), CLIError> {
    let mut writer = output_config.get_records_writer(events_records_format());

    for event in events {
        let record = serde_json::to_value(event).map_err(CLIError::failure)?;
        writer.write_row(&record, event_cells(event))?;
    }

    writer.finish()?;
    Ok(())
}

fn events_records_format() -> RecordsFormat {
    RecordsFormat::new(vec![
        ColumnFormat::new("Time").with_style_spec("l").with_null_value("-"),
        ColumnFormat::new("Employer").with_style_spec("l").with_null_value("-"),
        ColumnFormat::new("Candidate").with_style_spec("l").with_null_value("-"),
        ColumnFormat::new("Track").with_style_spec("l"),
        ColumnFormat::new("Stage").with_style_spec("l"),
        ColumnFormat::new("Synthetic").with_style_spec("c"),
        ColumnFormat::new("Event ID").with_style_spec("l").with_max_len(48),
    ])
}

fn event_cells(event: &JourneyEvent) -> Vec<String> {
    vec![
        event
            .timestamp
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default(),
        event.employer.clone().unwrap_or_default(),
        event.candidate.clone().unwrap_or_default(),
        event.track.to_string(),
        event.stage.to_string(),
        if event.is_synthetic { "yes" } else { "" }.to_string(),
        event.event_id.to_string(),
    ]
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
