// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use chrono::{DateTime, Utc};

use crate::{JourneyKey, Stage};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Namespace reserved for identifiers of synthetic events
pub const SYNTHETIC_ID_PREFIX: &str = "auto_";

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Globally unique event identifier, stable across re-runs.
///
/// Real events keep the identifier assigned at their origin, synthetic ones
/// derive it from the journey key, the stage and the anchor time.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct EventID(String);

impl EventID {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// `auto_<employer>_<candidate>_<track>_<stage>_<anchor-epoch-seconds>`,
    /// the epoch is `0` when the journey has no known timestamp.
    ///
    /// Employer and candidate are percent-encoded with `_` escaped as well,
    /// so the separators after the prefix always delimit the same parts.
    pub fn synthetic(key: &JourneyKey, stage: Stage, anchor: Option<DateTime<Utc>>) -> Self {
        let epoch = anchor.map_or(0, |t| t.timestamp());
        Self(format!(
            "{SYNTHETIC_ID_PREFIX}{}_{}_{}_{stage}_{epoch}",
            encode_id_part(&key.employer),
            encode_id_part(&key.candidate),
            key.track
        ))
    }

    pub fn is_in_synthetic_namespace(&self) -> bool {
        self.0.starts_with(SYNTHETIC_ID_PREFIX)
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for EventID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EventID {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EventID {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

fn encode_id_part(part: &str) -> String {
    urlencoding::encode(part).replace('_', "%5F")
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
