// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Rating queries.

use carhive_domain::Rating;
use diesel::prelude::*;
use diesel::SqliteConnection;
use num_traits::ToPrimitive;

use crate::diesel_schema::ratings;
use crate::error::PersistenceError;

/// Diesel Queryable struct for rating rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = ratings)]
struct RatingRow {
    rating_id: i64,
    author_id: i64,
    car_id: Option<i64>,
    rider_id: Option<i64>,
    rate: i32,
    review: String,
}

impl RatingRow {
    fn into_rating(self) -> Result<Rating, PersistenceError> {
        let rate: u8 = self.rate.to_u8().ok_or_else(|| {
            PersistenceError::ReconstructionError(format!(
                "rating {} has rate {}",
                self.rating_id, self.rate
            ))
        })?;
        Ok(Rating {
            rating_id: Some(self.rating_id),
            author_id: self.author_id,
            car_id: self.car_id,
            rider_id: self.rider_id,
            rate,
            review: self.review,
        })
    }
}

/// Retrieves a rating by ID.
///
/// # Errors
///
/// Returns an error if the query fails or the row is invalid.
pub fn get_rating(
    conn: &mut SqliteConnection,
    rating_id: i64,
) -> Result<Option<Rating>, PersistenceError> {
    let row: Option<RatingRow> = ratings::table
        .filter(ratings::rating_id.eq(rating_id))
        .select(RatingRow::as_select())
        .first(conn)
        .optional()?;

    row.map(RatingRow::into_rating).transpose()
}

/// Lists ratings about a car and/or a rider, newest first.
///
/// # Errors
///
/// Returns an error if the query fails or a row is invalid.
pub fn list_ratings(
    conn: &mut SqliteConnection,
    car_id: Option<i64>,
    rider_id: Option<i64>,
) -> Result<Vec<Rating>, PersistenceError> {
    let mut query = ratings::table.select(RatingRow::as_select()).into_boxed();
    if let Some(car_id) = car_id {
        query = query.filter(ratings::car_id.eq(car_id));
    }
    if let Some(rider_id) = rider_id {
        query = query.filter(ratings::rider_id.eq(rider_id));
    }

    let rows: Vec<RatingRow> = query.order(ratings::rating_id.desc()).load(conn)?;
    rows.into_iter().map(RatingRow::into_rating).collect()
}

/// All scores given to a car, for averaging.
///
/// # Errors
///
/// Returns an error if the query fails or a stored score is out of range.
pub fn car_rates(conn: &mut SqliteConnection, car_id: i64) -> Result<Vec<u8>, PersistenceError> {
    let rates: Vec<i32> = ratings::table
        .filter(ratings::car_id.eq(car_id))
        .select(ratings::rate)
        .load(conn)?;

    rates
        .into_iter()
        .map(|rate| {
            rate.to_u8().ok_or_else(|| {
                PersistenceError::ReconstructionError(format!("car {car_id} has rate {rate}"))
            })
        })
        .collect()
}
