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

use super::{CLIError, Command, write_events};
use crate::output::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct EventsJourneyCommand {
    query_use_case: Arc<dyn QueryNormalizedEventsUseCase>,
    output_config: Arc<OutputConfig>,
    key: JourneyKey,
}

impl EventsJourneyCommand {
    pub fn new(
        query_use_case: Arc<dyn QueryNormalizedEventsUseCase>,
        output_config: Arc<OutputConfig>,
        key: JourneyKey,
    ) -> Self {
        Self {
            query_use_case,
            output_config,
            key,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl Command for EventsJourneyCommand {
    async fn run(&mut self) -> Result<(), CLIError> {
        let events = self
            .query_use_case
            .list_journey_events(&self.key)
            .await
            .map_err(CLIError::failure)?;

        if events.is_empty() {
            self.output_config
                .info(format!("No events found for journey {}", self.key));
        }

        write_events(&self.output_config, &events)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
