// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod dependencies;
mod jobs;
mod journey_lock_registry;
mod use_cases;

pub use dependencies::*;
pub use jobs::*;
pub use journey_lock_registry::*;
pub use use_cases::*;
