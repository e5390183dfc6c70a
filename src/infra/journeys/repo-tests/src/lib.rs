// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod journey_event_repository_test_suite;
mod normalized_event_repository_test_suite;
mod processed_event_repository_test_suite;

pub(crate) mod helpers;

pub use journey_event_repository_test_suite::*;
pub use normalized_event_repository_test_suite::*;
pub use processed_event_repository_test_suite::*;
