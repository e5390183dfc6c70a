// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod journey_grouper;
mod stage_backfill_planner;

pub use journey_grouper::*;
pub use stage_backfill_planner::*;
