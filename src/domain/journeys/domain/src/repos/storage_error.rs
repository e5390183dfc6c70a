// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use internal_error::InternalError;
use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Failure of a bounded storage call. Only transient failures are eligible
/// for retry, everything else is deterministic.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error(transparent)]
    Transient(#[from] TransientStorageError),

    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl StorageError {
    pub fn transient(reason: impl Into<String>) -> Self {
        Self::Transient(TransientStorageError {
            reason: reason.into(),
        })
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
#[error("Transient storage failure: {reason}")]
pub struct TransientStorageError {
    pub reason: String,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
