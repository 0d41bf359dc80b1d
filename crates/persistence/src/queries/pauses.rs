// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Pause request queries.

use carhive_domain::{PauseRequest, PauseStatus, format_date};
use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::debug;

use crate::data_models::PauseFilter;
use crate::diesel_schema::{cars, pause_requests};
use crate::error::PersistenceError;
use crate::queries::schedule_from_columns;

/// Diesel Queryable struct for pause rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = pause_requests)]
struct PauseRow {
    pause_id: i64,
    car_id: i64,
    requested_by: i64,
    reason: String,
    date_from: String,
    date_to: String,
    time_from: String,
    time_to: String,
    note: Option<String>,
    status: String,
    decided_by: Option<i64>,
}

impl PauseRow {
    fn into_pause(self) -> Result<PauseRequest, PersistenceError> {
        Ok(PauseRequest {
            pause_id: Some(self.pause_id),
            car_id: self.car_id,
            requested_by: self.requested_by,
            reason: self.reason,
            schedule: schedule_from_columns(
                &self.date_from,
                &self.date_to,
                &self.time_from,
                &self.time_to,
            )?,
            note: self.note,
            status: self.status.parse::<PauseStatus>()?,
            decided_by: self.decided_by,
        })
    }
}

/// Retrieves a pause request by ID.
///
/// # Errors
///
/// Returns an error if the query fails or the row is invalid.
/// Returns `Ok(None)` if the pause does not exist.
pub fn get_pause(
    conn: &mut SqliteConnection,
    pause_id: i64,
) -> Result<Option<PauseRequest>, PersistenceError> {
    debug!(pause_id, "Looking up pause request");

    let row: Option<PauseRow> = pause_requests::table
        .filter(pause_requests::pause_id.eq(pause_id))
        .select(PauseRow::as_select())
        .first(conn)
        .optional()?;

    row.map(PauseRow::into_pause).transpose()
}

/// Lists pause requests matching the filter, oldest first.
///
/// # Errors
///
/// Returns an error if a query fails or a row is invalid.
pub fn list_pauses(
    conn: &mut SqliteConnection,
    filter: &PauseFilter,
) -> Result<Vec<PauseRequest>, PersistenceError> {
    let mut query = pause_requests::table
        .select(PauseRow::as_select())
        .into_boxed();

    if let Some(owner_id) = filter.owner_id {
        let owned_car_ids: Vec<i64> = cars::table
            .filter(cars::owner_id.eq(owner_id))
            .select(cars::car_id)
            .load(conn)?;
        query = query.filter(pause_requests::car_id.eq_any(owned_car_ids));
    }
    if let Some(car_id) = filter.car_id {
        query = query.filter(pause_requests::car_id.eq(car_id));
    }
    if let Some(status) = filter.status {
        query = query.filter(pause_requests::status.eq(status.as_str()));
    }
    if let Some(from_date) = filter.from_date {
        query = query.filter(pause_requests::date_from.ge(format_date(from_date)));
    }
    if let Some(to_date) = filter.to_date {
        query = query.filter(pause_requests::date_to.le(format_date(to_date)));
    }

    let rows: Vec<PauseRow> = query.order(pause_requests::pause_id.asc()).load(conn)?;
    debug!(count = rows.len(), "Loaded pause requests");
    rows.into_iter().map(PauseRow::into_pause).collect()
}
