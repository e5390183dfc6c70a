// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use chrono::{DateTime, Days, NaiveDate, Utc};

use crate::{JourneyEvent, Stage};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Filter over the normalized store.
///
/// Both date bounds are calendar days in UTC and both are inclusive: `to`
/// covers the whole day, i.e. `timestamp < to + 1 day`. Events without a
/// timestamp never match a date-bounded filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JourneyEventFilter {
    /// Empty means any employer
    pub employers: Vec<String>,
    /// Empty means any stage
    pub stages: Vec<Stage>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub include_synthetic: bool,
}

impl Default for JourneyEventFilter {
    fn default() -> Self {
        Self {
            employers: Vec::new(),
            stages: Vec::new(),
            from: None,
            to: None,
            include_synthetic: true,
        }
    }
}

impl JourneyEventFilter {
    /// Inclusive lower bound
    pub fn lower_bound(&self) -> Option<DateTime<Utc>> {
        self.from
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
    }

    /// Exclusive upper bound, start of the day after `to`
    pub fn upper_bound(&self) -> Option<DateTime<Utc>> {
        self.to
            .and_then(|d| d.checked_add_days(Days::new(1)))
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
    }

    pub fn is_date_bounded(&self) -> bool {
        self.from.is_some() || self.to.is_some()
    }

    pub fn matches(&self, event: &JourneyEvent) -> bool {
        if !self.include_synthetic && event.is_synthetic {
            return false;
        }

        if !self.employers.is_empty()
            && !event
                .employer
                .as_ref()
                .is_some_and(|e| self.employers.contains(e))
        {
            return false;
        }

        if !self.stages.is_empty() && !self.stages.contains(&event.stage) {
            return false;
        }

        if self.is_date_bounded() {
            let Some(ts) = event.timestamp else {
                return false;
            };
            if self.lower_bound().is_some_and(|lb| ts < lb) {
                return false;
            }
            if self.upper_bound().is_some_and(|ub| ts >= ub) {
                return false;
            }
        }

        true
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
