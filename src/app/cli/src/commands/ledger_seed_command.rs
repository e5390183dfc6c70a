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
use crate::OutputConfig;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct LedgerSeedCommand {
    seed_use_case: Arc<dyn SeedProcessedLedgerUseCase>,
    output_config: Arc<OutputConfig>,
}

impl LedgerSeedCommand {
    pub fn new(
        seed_use_case: Arc<dyn SeedProcessedLedgerUseCase>,
        output_config: Arc<OutputConfig>,
    ) -> Self {
        Self {
            seed_use_case,
            output_config,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl Command for LedgerSeedCommand {
    async fn run(&mut self) -> Result<(), CLIError> {
        let summary = self
            .seed_use_case
            .execute()
            .await
            .map_err(CLIError::failure)?;

        self.output_config.write_object("Ledger seed", &summary)?;

        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
