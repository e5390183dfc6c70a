// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

fn main() {
    // sqlx rebuilds the crate when an embedded migration changes, but not
    // when a new migration file appears, so watch the whole folder.
    //
    // NB. Working path: ./src/infra/journeys/sqlite
    println!("cargo:rerun-if-changed=../../../../migrations/sqlite");
}
