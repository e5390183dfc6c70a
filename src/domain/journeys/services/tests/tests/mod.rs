// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod journeys_harness;
mod test_normalize_journeys_use_case;
mod test_query_normalized_events_use_case;
mod test_seed_processed_ledger_use_case;
