// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// A named milestone in an interview pipeline.
///
/// Parsing is case-insensitive and accepts the labels produced by earlier
/// classifier versions (`Interview`, `Tech`, `R2`, `VO`, `Behavioral`).
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
    serde_with::SerializeDisplay,
    serde_with::DeserializeFromStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Stage {
    /// Pre-stage: the candidate applied. Tracked, but outside of the stage
    /// order and never auto-generated
    #[strum(to_string = "App")]
    Application,

    #[strum(to_string = "OA")]
    OnlineAssessment,

    #[strum(to_string = "Phone/R1", serialize = "Interview", serialize = "Tech")]
    PhoneScreen,

    #[strum(to_string = "Onsite", serialize = "R2", serialize = "VO")]
    Onsite,

    #[strum(to_string = "HM", serialize = "Behavioral")]
    HiringManager,

    #[strum(to_string = "Offer")]
    Offer,

    #[strum(to_string = "Reject")]
    Reject,
}

/// Order in which stages are expected to occur for a successful pipeline
pub const STAGE_ORDER: [Stage; 6] = [
    Stage::OnlineAssessment,
    Stage::PhoneScreen,
    Stage::Onsite,
    Stage::HiringManager,
    Stage::Offer,
    Stage::Reject,
];

/// Stages that represent intentional human action or a terminal high-value
/// outcome and therefore must never be fabricated
pub const NEVER_AUTOGEN: [Stage; 2] = [Stage::Application, Stage::Offer];

impl Stage {
    /// Position in [`STAGE_ORDER`], `None` for the pre-stage
    pub fn order_index(self) -> Option<usize> {
        STAGE_ORDER.iter().position(|s| *s == self)
    }

    pub fn is_never_autogen(self) -> bool {
        NEVER_AUTOGEN.contains(&self)
    }

    /// Sort key that places the pre-stage before everything in the order
    pub fn sort_key(self) -> usize {
        self.order_index().map_or(0, |i| i + 1)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////


////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
