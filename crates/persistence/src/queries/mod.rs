// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-side queries.
//!
//! Each module owns the Diesel row structs for its tables and rebuilds
//! domain values from them. A row that no longer parses into a valid domain
//! value is reported as `PersistenceError::ReconstructionError`.

pub mod audit;
pub mod cars;
pub mod kyc;
pub mod listings;
pub mod pauses;
pub mod ratings;
pub mod rides;
pub mod users;

use carhive_domain::Schedule;

use crate::error::PersistenceError;

/// Rebuilds a schedule from its four stored columns.
pub(crate) fn schedule_from_columns(
    date_from: &str,
    date_to: &str,
    time_from: &str,
    time_to: &str,
) -> Result<Schedule, PersistenceError> {
    Ok(Schedule::parse(date_from, date_to, time_from, time_to)?)
}
