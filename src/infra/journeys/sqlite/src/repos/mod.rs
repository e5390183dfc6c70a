// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod sqlite_journey_event_repository;
mod sqlite_normalized_event_repository;
mod sqlite_processed_event_repository;

pub use sqlite_journey_event_repository::*;
pub use sqlite_normalized_event_repository::*;
pub use sqlite_processed_event_repository::*;
