// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error(transparent)]
    SqlxError(#[from] sqlx::Error),

    #[error(transparent)]
    MigrateError(#[from] sqlx::migrate::MigrateError),
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Coarse classification of a failed statement, used by repositories to
/// decide between "benign duplicate", "retry later" and "give up"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlxErrorKind {
    /// Unique / primary key constraint was violated
    UniqueViolation,
    /// Any other constraint (`CHECK`, `NOT NULL`, foreign key, trigger abort)
    ConstraintViolation,
    /// Connection, pool or locking problem that may go away on retry
    Transient,
    /// Deterministic failure (syntax, decoding, schema mismatch)
    Other,
}

// SQLite primary result codes
// See: https://www.sqlite.org/rescode.html
const SQLITE_BUSY: &str = "5";
const SQLITE_LOCKED: &str = "6";
const SQLITE_CONSTRAINT: &str = "19";

pub fn classify_sqlx_error(e: &sqlx::Error) -> SqlxErrorKind {
    match e {
        sqlx::Error::Database(db_err) => {
            if db_err.is_unique_violation() {
                return SqlxErrorKind::UniqueViolation;
            }
            if db_err.is_check_violation()
                || db_err.is_foreign_key_violation()
                || matches!(db_err.kind(), sqlx::error::ErrorKind::NotNullViolation)
            {
                return SqlxErrorKind::ConstraintViolation;
            }

            // Extended codes keep the primary code in the lowest byte
            let primary_code = db_err
                .code()
                .and_then(|code| code.parse::<u32>().ok())
                .map(|code| (code & 0xff).to_string());

            match primary_code.as_deref() {
                Some(SQLITE_BUSY | SQLITE_LOCKED) => SqlxErrorKind::Transient,
                Some(SQLITE_CONSTRAINT) => SqlxErrorKind::ConstraintViolation,
                _ => SqlxErrorKind::Other,
            }
        }
        sqlx::Error::Io(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => SqlxErrorKind::Transient,
        _ => SqlxErrorKind::Other,
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
