// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

// Re-exports
pub use sqlx::sqlite::SqlitePoolOptions;

mod db_configuration;
mod db_error;
mod plugins;

pub use db_configuration::*;
pub use db_error::*;
pub use plugins::*;
