// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use internal_error::InternalError;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Batch job that rebuilds the normalized store from the event store:
/// groups real events into journeys, backfills implied stages and merges
/// everything by event id.
///
/// A failure of one journey never fails the run, it is counted instead.
#[async_trait::async_trait]
pub trait NormalizeJourneysUseCase: Send + Sync {
    async fn execute(
        &self,
        cancellation_token: CancellationToken,
    ) -> Result<NormalizationSummary, NormalizeJourneysError>;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct NormalizationSummary {
    pub journeys_processed: usize,
    pub journeys_failed: usize,
    /// Journeys not started because the run was cancelled
    pub journeys_skipped: usize,
    pub synthetic_added: usize,
    pub real_passed_through: usize,
    pub ungroupable_passed_through: usize,
    pub stale_synthetic_pruned: u64,
    pub write_failures: usize,
    pub cancelled: bool,
}

impl NormalizationSummary {
    pub fn merge_journey(&mut self, outcome: &JourneyNormalizationOutcome) {
        match outcome {
            JourneyNormalizationOutcome::Normalized {
                synthetic_added,
                real_passed_through,
                stale_synthetic_pruned,
                write_failures,
            } => {
                self.journeys_processed += 1;
                self.synthetic_added += synthetic_added;
                self.real_passed_through += real_passed_through;
                self.stale_synthetic_pruned += stale_synthetic_pruned;
                self.write_failures += write_failures;
            }
            JourneyNormalizationOutcome::Failed { write_failures } => {
                self.journeys_failed += 1;
                self.write_failures += write_failures;
            }
            JourneyNormalizationOutcome::Skipped => {
                self.journeys_skipped += 1;
            }
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JourneyNormalizationOutcome {
    Normalized {
        synthetic_added: usize,
        real_passed_through: usize,
        stale_synthetic_pruned: u64,
        write_failures: usize,
    },
    Failed {
        write_failures: usize,
    },
    Skipped,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum NormalizeJourneysError {
    #[error(transparent)]
    Internal(#[from] InternalError),
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
