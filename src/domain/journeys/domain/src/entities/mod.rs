// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod classified_record;
mod event_id;
mod journey;
mod journey_event;
mod journey_event_filter;
mod processed_event;
mod stage;
mod track;

pub use classified_record::*;
pub use event_id::*;
pub use journey::*;
pub use journey_event::*;
pub use journey_event_filter::*;
pub use processed_event::*;
pub use stage::*;
pub use track::*;
