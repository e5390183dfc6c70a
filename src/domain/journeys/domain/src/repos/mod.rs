// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod journey_event_repository;
mod normalized_event_repository;
mod processed_event_repository;
mod storage_error;

pub use journey_event_repository::*;
pub use normalized_event_repository::*;
pub use processed_event_repository::*;
pub use storage_error::*;
