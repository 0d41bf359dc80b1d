// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Rating mutations. Ratings are not workflow records and carry no audit
//! events.

use carhive_domain::Rating;
use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::info;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::diesel_schema::ratings;
use crate::error::PersistenceError;
use crate::mutations::expect_one_row;

/// Stores a new rating.
///
/// # Errors
///
/// Returns `PersistenceError::ForeignKeyViolation` if a target does not
/// exist, or another error if the insert fails.
pub fn create_rating(
    conn: &mut SqliteConnection,
    rating: &Rating,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(ratings::table)
        .values((
            ratings::author_id.eq(rating.author_id),
            ratings::car_id.eq(rating.car_id),
            ratings::rider_id.eq(rating.rider_id),
            ratings::rate.eq(i32::from(rating.rate)),
            ratings::review.eq(&rating.review),
        ))
        .execute(conn)?;

    let rating_id: i64 = get_last_insert_rowid(conn)?;
    info!(rating_id, author_id = rating.author_id, "Rating created");
    Ok(rating_id)
}

/// Deletes a rating.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no rating has the ID.
pub fn delete_rating(conn: &mut SqliteConnection, rating_id: i64) -> Result<(), PersistenceError> {
    let deleted: usize = diesel::delete(ratings::table.filter(ratings::rating_id.eq(rating_id)))
        .execute(conn)?;
    expect_one_row(deleted, "rating", rating_id)?;
    info!(rating_id, "Rating deleted");
    Ok(())
}
