// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod helpers;
mod repos;

pub use repos::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Schema of all journeys tables, applied on startup
pub static SQLITE_MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../../../migrations/sqlite");

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
