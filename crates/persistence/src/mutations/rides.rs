// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking mutations.

use carhive::TransitionResult;
use carhive_domain::{Ride, format_date, format_time};
use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::info;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::diesel_schema::rides;
use crate::error::PersistenceError;
use crate::mutations::{current_timestamp, expect_one_row, persist_with_audit};

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = rides, treat_none_as_null = true)]
struct RideValues {
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
    status: &'static str,
    decided_by: Option<i64>,
    updated_at: String,
}

fn write_ride(conn: &mut SqliteConnection, ride: &Ride) -> Result<i64, PersistenceError> {
    let values: RideValues = RideValues {
        car_id: ride.car_id,
        rider_id: ride.rider_id,
        from_longitude: ride.route.from.longitude,
        from_latitude: ride.route.from.latitude,
        to_longitude: ride.route.to.longitude,
        to_latitude: ride.route.to.latitude,
        date_from: format_date(ride.schedule.date.from()),
        date_to: format_date(ride.schedule.date.to()),
        time_from: format_time(ride.schedule.time.from()),
        time_to: format_time(ride.schedule.time.to()),
        status: ride.status.as_str(),
        decided_by: ride.decided_by,
        updated_at: current_timestamp()?,
    };

    if let Some(ride_id) = ride.ride_id {
        let updated: usize = diesel::update(rides::table.filter(rides::ride_id.eq(ride_id)))
            .set(&values)
            .execute(conn)?;
        expect_one_row(updated, "ride", ride_id)?;
        return Ok(ride_id);
    }

    diesel::insert_into(rides::table).values(&values).execute(conn)?;
    let ride_id: i64 = get_last_insert_rowid(conn)?;
    info!(ride_id, car_id = ride.car_id, rider_id = ride.rider_id, "Ride requested");
    Ok(ride_id)
}

/// Persists a ride transition and its audit event.
///
/// # Returns
///
/// The ride ID.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn persist_ride_transition(
    conn: &mut SqliteConnection,
    result: &TransitionResult<Ride>,
) -> Result<i64, PersistenceError> {
    persist_with_audit(conn, result, result.new_state.ride_id, "ride", write_ride)
}
