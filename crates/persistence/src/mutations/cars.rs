// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Car catalog mutations.

use carhive::TransitionResult;
use carhive_domain::Car;
use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::info;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::diesel_schema::cars;
use crate::error::PersistenceError;
use crate::mutations::{current_timestamp, expect_one_row, persist_with_audit};

/// Column values written for a car, on insert and on update alike.
#[derive(Insertable, AsChangeset)]
#[diesel(table_name = cars, treat_none_as_null = true)]
struct CarValues<'a> {
    owner_id: Option<i64>,
    name: &'a str,
    brand: &'a str,
    model: &'a str,
    year: i32,
    color: &'a str,
    registration_number: &'a str,
    category: &'a str,
    transmission: &'a str,
    fuel: &'a str,
    seats: i32,
    hourly_rate: i64,
    price_per_day: i64,
    km_per_hour: i64,
    images_json: String,
    video: Option<&'a str>,
    insurance: &'a str,
    pollution: &'a str,
    tax: &'a str,
    registration_book: &'a str,
    publication_status: &'a str,
    availability_hold: &'a str,
    updated_at: String,
}

impl<'a> CarValues<'a> {
    fn from_car(car: &'a Car) -> Result<Self, PersistenceError> {
        Ok(Self {
            owner_id: car.owner_id,
            name: &car.details.name,
            brand: &car.details.brand,
            model: &car.details.model,
            year: i32::from(car.details.year),
            color: &car.details.color,
            registration_number: &car.details.registration_number,
            category: car.details.category.as_str(),
            transmission: car.details.transmission.as_str(),
            fuel: car.details.fuel.as_str(),
            seats: i32::from(car.details.seats),
            hourly_rate: car.details.hourly_rate,
            price_per_day: car.details.price_per_day,
            km_per_hour: car.details.km_per_hour,
            images_json: serde_json::to_string(&car.images)?,
            video: car.video.as_deref(),
            insurance: &car.documents.insurance,
            pollution: &car.documents.pollution,
            tax: &car.documents.tax,
            registration_book: &car.documents.registration_book,
            publication_status: car.publication.as_str(),
            availability_hold: car.hold.as_str(),
            updated_at: current_timestamp()?,
        })
    }
}

fn write_car(conn: &mut SqliteConnection, car: &Car) -> Result<i64, PersistenceError> {
    let values: CarValues<'_> = CarValues::from_car(car)?;

    if let Some(car_id) = car.car_id {
        let updated: usize = diesel::update(cars::table.filter(cars::car_id.eq(car_id)))
            .set(&values)
            .execute(conn)?;
        expect_one_row(updated, "car", car_id)?;
        return Ok(car_id);
    }

    diesel::insert_into(cars::table).values(&values).execute(conn)?;
    let car_id: i64 = get_last_insert_rowid(conn)?;
    info!(
        car_id,
        registration_number = %car.details.registration_number,
        "Car created"
    );
    Ok(car_id)
}

/// Persists a car transition and its audit event.
///
/// # Returns
///
/// The car ID (newly assigned for submissions).
///
/// # Errors
///
/// Returns `PersistenceError::UniqueViolation` for a taken registration
/// number, or another error if the write fails.
pub fn persist_car_transition(
    conn: &mut SqliteConnection,
    result: &TransitionResult<Car>,
) -> Result<i64, PersistenceError> {
    persist_with_audit(conn, result, result.new_state.car_id, "car", write_car)
}
