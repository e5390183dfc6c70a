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

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Marks every real event already present in the event store as processed,
/// so that a re-harvest of old channels does not ingest them again
#[async_trait::async_trait]
pub trait SeedProcessedLedgerUseCase: Send + Sync {
    async fn execute(&self) -> Result<LedgerSeedSummary, SeedProcessedLedgerError>;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct LedgerSeedSummary {
    pub scanned: usize,
    pub newly_marked: usize,
    pub already_marked: usize,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum SeedProcessedLedgerError {
    #[error(transparent)]
    Internal(#[from] InternalError),
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
