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

pub struct LedgerStatsCommand {
    query_use_case: Arc<dyn QueryNormalizedEventsUseCase>,
    output_config: Arc<OutputConfig>,
}

impl LedgerStatsCommand {
    pub fn new(
        query_use_case: Arc<dyn QueryNormalizedEventsUseCase>,
        output_config: Arc<OutputConfig>,
    ) -> Self {
        Self {
            query_use_case,
            output_config,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl Command for LedgerStatsCommand {
    async fn run(&mut self) -> Result<(), CLIError> {
        let stats = self
            .query_use_case
            .get_ledger_stats()
            .await
            .map_err(CLIError::failure)?;

        let mut writer = self.output_config.get_records_writer(RecordsFormat::new(vec![
            ColumnFormat::new("Outcome").with_style_spec("l"),
            ColumnFormat::new("Events").with_style_spec("r"),
        ]));

        for (outcome, count) in &stats.by_outcome {
            writer.write_row(
                &serde_json::json!({ "outcome": outcome, "events": count }),
                vec![outcome.to_string(), count.to_string()],
            )?;
        }

        if self.output_config.format == OutputFormat::Table {
            writer.write_row(
                &serde_json::Value::Null,
                vec!["total".to_string(), stats.total.to_string()],
            )?;
        }

        writer.finish()?;

        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
