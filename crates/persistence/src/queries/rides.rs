// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking queries.

use carhive_domain::{GeoPoint, Ride, RideStatus, Route, format_date};
use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::debug;

use crate::data_models::RideFilter;
use crate::diesel_schema::rides;
use crate::error::PersistenceError;
use crate::queries::schedule_from_columns;

/// Diesel Queryable struct for ride rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = rides)]
struct RideRow {
    ride_id: i64,
    car_id: i64,
    rider_id: i64,
    from_longitude: f64,
    from_latitude: f64,
    to_longitude: f64,
    to_latitude: f64,
    date_from: String,
    date_to: String,
    time_from: String,
    time_to: String,
    status: String,
    decided_by: Option<i64>,
}

impl RideRow {
    fn into_ride(self) -> Result<Ride, PersistenceError> {
        Ok(Ride {
            ride_id: Some(self.ride_id),
            car_id: self.car_id,
            rider_id: self.rider_id,
            route: Route::new(
                GeoPoint::new(self.from_longitude, self.from_latitude)?,
                GeoPoint::new(self.to_longitude, self.to_latitude)?,
            ),
            schedule: schedule_from_columns(
                &self.date_from,
                &self.date_to,
                &self.time_from,
                &self.time_to,
            )?,
            status: self.status.parse::<RideStatus>()?,
            decided_by: self.decided_by,
        })
    }
}

/// Retrieves a ride by ID.
///
/// # Errors
///
/// Returns an error if the query fails or the row is invalid.
/// Returns `Ok(None)` if the ride does not exist.
pub fn get_ride(
    conn: &mut SqliteConnection,
    ride_id: i64,
) -> Result<Option<Ride>, PersistenceError> {
    debug!(ride_id, "Looking up ride");

    let row: Option<RideRow> = rides::table
        .filter(rides::ride_id.eq(ride_id))
        .select(RideRow::as_select())
        .first(conn)
        .optional()?;

    row.map(RideRow::into_ride).transpose()
}

/// Lists rides matching the filter, oldest first.
///
/// Date bounds compare the ISO date columns, so `from_date` keeps rides
/// starting on or after it and `to_date` keeps rides ending on or before it.
///
/// # Errors
///
/// Returns an error if the query fails or a row is invalid.
pub fn list_rides(
    conn: &mut SqliteConnection,
    filter: &RideFilter,
) -> Result<Vec<Ride>, PersistenceError> {
    let mut query = rides::table.select(RideRow::as_select()).into_boxed();

    if let Some(car_id) = filter.car_id {
        query = query.filter(rides::car_id.eq(car_id));
    }
    if let Some(rider_id) = filter.rider_id {
        query = query.filter(rides::rider_id.eq(rider_id));
    }
    if let Some(status) = filter.status {
        query = query.filter(rides::status.eq(status.as_str()));
    }
    if let Some(from_date) = filter.from_date {
        query = query.filter(rides::date_from.ge(format_date(from_date)));
    }
    if let Some(to_date) = filter.to_date {
        query = query.filter(rides::date_to.le(format_date(to_date)));
    }

    let rows: Vec<RideRow> = query.order(rides::ride_id.asc()).load(conn)?;
    debug!(count = rows.len(), "Loaded rides");
    rows.into_iter().map(RideRow::into_ride).collect()
}
