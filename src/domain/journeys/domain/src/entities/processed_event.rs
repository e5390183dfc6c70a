// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::EventID;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// How ingestion disposed of an event, recorded in the dedup ledger
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    serde::Serialize,
    serde::Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ClassificationOutcome {
    /// Stored in the event store
    Accepted,
    /// Classifier flagged the record as spam
    Spam,
    /// Authored by an ignored account (bots)
    Ignored,
    /// Failed validation at the ingestion boundary
    Quarantined,
    /// Same stage already reported for the same journey
    Duplicate,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Which pipeline step created a ledger entry
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    serde::Serialize,
    serde::Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProcessingSource {
    Harvesting,
    Parsing,
    Migration,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Dedup ledger entry, written once per event id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedEventEntry {
    pub event_id: EventID,
    pub processed_at: DateTime<Utc>,
    pub outcome: ClassificationOutcome,
    pub source: ProcessingSource,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MarkProcessedOutcome {
    Marked,
    /// Another writer got there first, not an error
    AlreadyMarked,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct ProcessedLedgerStats {
    pub total: u64,
    pub by_outcome: BTreeMap<ClassificationOutcome, u64>,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
