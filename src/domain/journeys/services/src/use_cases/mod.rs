// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod ingest_classified_records_use_case_impl;
mod normalize_journeys_use_case_impl;
mod query_normalized_events_use_case_impl;
mod seed_processed_ledger_use_case_impl;

pub use ingest_classified_records_use_case_impl::*;
pub use normalize_journeys_use_case_impl::*;
pub use query_normalized_events_use_case_impl::*;
pub use seed_processed_ledger_use_case_impl::*;
