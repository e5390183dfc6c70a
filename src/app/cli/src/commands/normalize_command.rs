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
use tokio_util::sync::CancellationToken;

use super::{CLIError, Command, CommandInterruptedError};
use crate::OutputConfig;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct NormalizeCommand {
    normalize_use_case: Arc<dyn NormalizeJourneysUseCase>,
    output_config: Arc<OutputConfig>,
}

impl NormalizeCommand {
    pub fn new(
        normalize_use_case: Arc<dyn NormalizeJourneysUseCase>,
        output_config: Arc<OutputConfig>,
    ) -> Self {
        Self {
            normalize_use_case,
            output_config,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl Command for NormalizeCommand {
    async fn run(&mut self) -> Result<(), CLIError> {
        let cancellation_token = CancellationToken::new();

        // Journeys already started are finished, the rest are skipped
        let interrupt_listener = {
            let cancellation_token = cancellation_token.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::warn!("Interrupt received, stopping after journeys in progress");
                    cancellation_token.cancel();
                }
            })
        };

        let res = self
            .normalize_use_case
            .execute(cancellation_token)
            .await;
        interrupt_listener.abort();

        let summary = res.map_err(CLIError::failure)?;

        self.output_config
            .write_object("Normalization", &summary)?;

        if summary.cancelled {
            return Err(CLIError::Aborted(CommandInterruptedError));
        }

        if summary.journeys_failed > 0 {
            self.output_config.info(
                console::style(format!(
                    "{} journey(s) failed and may be partially applied, re-run to converge (see the log for details)",
                    summary.journeys_failed
                ))
                .yellow(),
            );
        }

        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
