// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Car catalog queries.

use carhive_domain::{
    AvailabilityHold, Car, CarDetails, CarDocuments, Category, Fuel, PauseStatus, PublicationStatus,
    RideStatus, Schedule, Transmission,
};
use diesel::prelude::*;
use diesel::SqliteConnection;
use num_traits::ToPrimitive;
use tracing::debug;

use crate::data_models::CarFilter;
use crate::diesel_schema::{cars, pause_requests, rides};
use crate::error::PersistenceError;
use crate::queries::schedule_from_columns;

/// Diesel Queryable struct for car rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = cars)]
struct CarRow {
    car_id: i64,
    owner_id: Option<i64>,
    name: String,
    brand: String,
    model: String,
    year: i32,
    color: String,
    registration_number: String,
    category: String,
    transmission: String,
    fuel: String,
    seats: i32,
    hourly_rate: i64,
    price_per_day: i64,
    km_per_hour: i64,
    images_json: String,
    video: Option<String>,
    insurance: String,
    pollution: String,
    tax: String,
    registration_book: String,
    publication_status: String,
    availability_hold: String,
}

impl CarRow {
    fn into_car(self) -> Result<Car, PersistenceError> {
        let year: u16 = self.year.to_u16().ok_or_else(|| {
            PersistenceError::ReconstructionError(format!(
                "car {} has year {}",
                self.car_id, self.year
            ))
        })?;
        let seats: u8 = self.seats.to_u8().ok_or_else(|| {
            PersistenceError::ReconstructionError(format!(
                "car {} has {} seats",
                self.car_id, self.seats
            ))
        })?;
        let images: Vec<String> = serde_json::from_str(&self.images_json)?;

        Ok(Car {
            car_id: Some(self.car_id),
            owner_id: self.owner_id,
            details: CarDetails {
                name: self.name,
                brand: self.brand,
                model: self.model,
                year,
                color: self.color,
                registration_number: self.registration_number,
                category: self.category.parse::<Category>()?,
                transmission: self.transmission.parse::<Transmission>()?,
                fuel: self.fuel.parse::<Fuel>()?,
                seats,
                hourly_rate: self.hourly_rate,
                price_per_day: self.price_per_day,
                km_per_hour: self.km_per_hour,
            },
            images,
            video: self.video,
            documents: CarDocuments {
                insurance: self.insurance,
                pollution: self.pollution,
                tax: self.tax,
                registration_book: self.registration_book,
            },
            publication: self.publication_status.parse::<PublicationStatus>()?,
            hold: self.availability_hold.parse::<AvailabilityHold>()?,
        })
    }
}

/// Retrieves a car by ID, deleted or not.
///
/// # Errors
///
/// Returns an error if the query fails or the row is invalid.
/// Returns `Ok(None)` if the car does not exist.
pub fn get_car(conn: &mut SqliteConnection, car_id: i64) -> Result<Option<Car>, PersistenceError> {
    debug!(car_id, "Looking up car");

    let row: Option<CarRow> = cars::table
        .filter(cars::car_id.eq(car_id))
        .select(CarRow::as_select())
        .first(conn)
        .optional()?;

    row.map(CarRow::into_car).transpose()
}

/// Lists cars matching the stored-column filter, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails or a row is invalid.
pub fn list_cars(
    conn: &mut SqliteConnection,
    filter: &CarFilter,
) -> Result<Vec<Car>, PersistenceError> {
    let mut query = cars::table.select(CarRow::as_select()).into_boxed();

    if let Some(owner_id) = filter.owner_id {
        query = query.filter(cars::owner_id.eq(owner_id));
    }
    if let Some(publication) = filter.publication {
        query = query.filter(cars::publication_status.eq(publication.as_str()));
    }
    if !filter.include_deleted {
        query = query.filter(cars::publication_status.ne(PublicationStatus::Delete.as_str()));
    }

    let rows: Vec<CarRow> = query.order(cars::car_id.asc()).load(conn)?;
    debug!(count = rows.len(), "Loaded cars");
    rows.into_iter().map(CarRow::into_car).collect()
}

/// Returns whether a registration number is already taken by another car.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn registration_number_taken(
    conn: &mut SqliteConnection,
    registration_number: &str,
    excluding_car_id: Option<i64>,
) -> Result<bool, PersistenceError> {
    let mut query = cars::table
        .filter(cars::registration_number.eq(registration_number))
        .into_boxed();
    if let Some(car_id) = excluding_car_id {
        query = query.filter(cars::car_id.ne(car_id));
    }
    let count: i64 = query.count().get_result(conn)?;
    Ok(count > 0)
}

/// Windows of the car's approved rides and approved pauses, the inputs
/// computed availability needs.
///
/// # Errors
///
/// Returns an error if a query fails or a stored window is invalid.
pub fn get_blocking_windows(
    conn: &mut SqliteConnection,
    car_id: i64,
) -> Result<(Vec<Schedule>, Vec<Schedule>), PersistenceError> {
    let ride_rows: Vec<(String, String, String, String)> = rides::table
        .filter(rides::car_id.eq(car_id))
        .filter(rides::status.eq(RideStatus::Approve.as_str()))
        .select((
            rides::date_from,
            rides::date_to,
            rides::time_from,
            rides::time_to,
        ))
        .load(conn)?;

    let pause_rows: Vec<(String, String, String, String)> = pause_requests::table
        .filter(pause_requests::car_id.eq(car_id))
        .filter(pause_requests::status.eq(PauseStatus::Approved.as_str()))
        .select((
            pause_requests::date_from,
            pause_requests::date_to,
            pause_requests::time_from,
            pause_requests::time_to,
        ))
        .load(conn)?;

    let to_schedules = |rows: Vec<(String, String, String, String)>| {
        rows.iter()
            .map(|(df, dt, tf, tt)| schedule_from_columns(df, dt, tf, tt))
            .collect::<Result<Vec<Schedule>, PersistenceError>>()
    };

    Ok((to_schedules(ride_rows)?, to_schedules(pause_rows)?))
}
