// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Sub-pipeline that keeps parallel application processes of the same
/// candidate at the same employer apart
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
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum Track {
    NewGrad,
    Intern,
}

impl Track {
    /// Channels are named after the pipeline they collect reports for,
    /// anything mentioning "grad" belongs to the new-grad track
    pub fn from_channel(channel: &str) -> Self {
        if channel.to_ascii_lowercase().contains("grad") {
            Self::NewGrad
        } else {
            Self::Intern
        }
    }

    pub fn from_new_grad_flag(new_grad: bool) -> Self {
        if new_grad { Self::NewGrad } else { Self::Intern }
    }

    pub fn is_new_grad(self) -> bool {
        self == Self::NewGrad
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
