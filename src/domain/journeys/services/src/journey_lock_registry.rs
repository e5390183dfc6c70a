// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use dill::*;
use jobstats_journeys::JourneyKey;
use tokio::sync::OwnedMutexGuard;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Serializes work on the same journey within the process: two
/// normalization passes never write the same journey concurrently.
pub struct JourneyLockRegistry {
    locks: Mutex<HashMap<JourneyKey, Arc<tokio::sync::Mutex<()>>>>,
}

#[component(pub)]
#[scope(Singleton)]
impl JourneyLockRegistry {
    pub fn new() -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub async fn lock(&self, key: &JourneyKey) -> JourneyLockGuard {
        let journey_lock = {
            let mut locks = self.locks.lock().unwrap();
            locks.entry(key.clone()).or_default().clone()
        };

        JourneyLockGuard {
            _guard: journey_lock.lock_owned().await,
        }
    }

    /// Drops entries nobody holds or waits for
    pub fn compact(&self) {
        let mut locks = self.locks.lock().unwrap();
        locks.retain(|_, journey_lock| Arc::strong_count(journey_lock) > 1);
    }

    pub fn len(&self) -> usize {
        self.locks.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct JourneyLockGuard {
    _guard: OwnedMutexGuard<()>,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
