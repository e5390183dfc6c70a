// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use dill::CatalogBuilder;

use crate::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Registers the journeys services. Repositories, configs and the time source
/// are expected to be provided by the caller.
pub fn register_dependencies(catalog_builder: &mut CatalogBuilder) {
    catalog_builder.add::<jobstats_journeys::StageBackfillPlanner>();
    catalog_builder.add::<JourneyLockRegistry>();

    catalog_builder.add::<IngestClassifiedRecordsUseCaseImpl>();
    catalog_builder.add::<NormalizeJourneysUseCaseImpl>();
    catalog_builder.add::<QueryNormalizedEventsUseCaseImpl>();
    catalog_builder.add::<SeedProcessedLedgerUseCaseImpl>();
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
