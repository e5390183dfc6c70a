// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::{EventID, JourneyEvent, Stage, Track};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Output of the external classifier for one harvested message.
///
/// Field aliases accept documents written by earlier pipeline versions.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ClassifiedRecord {
    #[serde(alias = "msg_id")]
    pub event_id: String,

    #[serde(default, alias = "company")]
    pub employer: Option<String>,

    #[serde(default, alias = "author")]
    pub candidate: Option<String>,

    #[serde(default)]
    pub stage: Option<String>,

    #[serde(default)]
    pub spam: bool,

    #[serde(default)]
    pub track: Option<Track>,

    #[serde(default)]
    pub new_grad: Option<bool>,

    #[serde(default)]
    pub channel: Option<String>,

    #[serde(default)]
    pub text: Option<String>,

    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl ClassifiedRecord {
    /// Explicit track wins, then the legacy `new_grad` flag, then the channel
    /// the record was harvested from
    pub fn resolve_track(&self, fallback_channel: Option<&str>) -> Track {
        if let Some(track) = self.track {
            return track;
        }
        if let Some(new_grad) = self.new_grad {
            return Track::from_new_grad_flag(new_grad);
        }
        self.channel
            .as_deref()
            .or(fallback_channel)
            .map_or(Track::Intern, Track::from_channel)
    }

    pub fn is_authored_by(&self, authors: &[String]) -> bool {
        self.candidate
            .as_deref()
            .is_some_and(|c| authors.iter().any(|a| a.eq_ignore_ascii_case(c.trim())))
    }

    /// Converts the record into a real event. Missing employer or candidate
    /// is allowed, such events are later passed through as ungroupable.
    pub fn validate(&self, fallback_channel: Option<&str>) -> Result<JourneyEvent, InvalidRecordError> {
        let event_id = EventID::new(self.event_id.trim());
        if event_id.is_empty() {
            return Err(InvalidRecordError::EmptyEventId);
        }
        if event_id.is_in_synthetic_namespace() {
            return Err(InvalidRecordError::ReservedEventId(ReservedEventIdError {
                event_id,
            }));
        }

        let label = self
            .stage
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(InvalidRecordError::MissingStage)?;

        let stage: Stage = label.parse().map_err(|_| {
            InvalidRecordError::UnknownStage(UnknownStageError {
                label: label.to_string(),
            })
        })?;

        let category = self.channel.clone().or(fallback_channel.map(str::to_string));

        Ok(JourneyEvent {
            event_id,
            employer: trimmed(self.employer.as_deref()),
            candidate: trimmed(self.candidate.as_deref()),
            track: self.resolve_track(fallback_channel),
            stage,
            timestamp: self.timestamp,
            is_synthetic: false,
            text: self.text.clone().unwrap_or_default(),
            category,
        })
    }
}

fn trimmed(s: Option<&str>) -> Option<String> {
    s.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug, PartialEq, Eq)]
pub enum InvalidRecordError {
    #[error("Record has no event id")]
    EmptyEventId,

    #[error(transparent)]
    ReservedEventId(ReservedEventIdError),

    #[error("Record has no stage")]
    MissingStage,

    #[error(transparent)]
    UnknownStage(UnknownStageError),
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Event id '{event_id}' is inside the reserved synthetic namespace")]
pub struct ReservedEventIdError {
    pub event_id: EventID,
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Unknown stage label '{label}'")]
pub struct UnknownStageError {
    pub label: String,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////


////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
