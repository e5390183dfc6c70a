// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod events_journey_command;
mod events_list_command;
mod ingest_command;
mod ledger_seed_command;
mod ledger_stats_command;
mod normalize_command;

pub use events_journey_command::*;
pub use events_list_command::*;
pub use ingest_command::*;
pub use ledger_seed_command::*;
pub use ledger_stats_command::*;
pub use normalize_command::*;

pub use crate::error::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[async_trait::async_trait(?Send)]
pub trait Command {
    /// Checks arguments before any work is done
    async fn validate_args(&self) -> Result<(), CLIError> {
        Ok(())
    }

    async fn run(&mut self) -> Result<(), CLIError>;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
