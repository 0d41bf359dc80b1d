// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Listing mutations.

use carhive::TransitionResult;
use carhive_domain::{CarListing, format_date};
use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::info;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::diesel_schema::car_listings;
use crate::error::PersistenceError;
use crate::mutations::{current_timestamp, expect_one_row, persist_with_audit};

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = car_listings, treat_none_as_null = true)]
struct ListingValues<'a> {
    car_id: i64,
    city: &'a str,
    parking_location: &'a str,
    price_per_day: i64,
    approved_price_per_day: Option<i64>,
    rental_from: String,
    rental_to: String,
    delivery_available: i32,
    fleet_by: Option<i64>,
    updated_at: String,
}

fn write_listing(
    conn: &mut SqliteConnection,
    listing: &CarListing,
) -> Result<i64, PersistenceError> {
    let values: ListingValues<'_> = ListingValues {
        car_id: listing.car_id,
        city: &listing.city,
        parking_location: &listing.parking_location,
        price_per_day: listing.price_per_day,
        approved_price_per_day: listing.approved_price_per_day,
        rental_from: format_date(listing.rental_period.from()),
        rental_to: format_date(listing.rental_period.to()),
        delivery_available: i32::from(listing.delivery_available),
        fleet_by: listing.fleet_by,
        updated_at: current_timestamp()?,
    };

    if let Some(listing_id) = listing.listing_id {
        let updated: usize =
            diesel::update(car_listings::table.filter(car_listings::listing_id.eq(listing_id)))
                .set(&values)
                .execute(conn)?;
        expect_one_row(updated, "listing", listing_id)?;
        return Ok(listing_id);
    }

    diesel::insert_into(car_listings::table)
        .values(&values)
        .execute(conn)?;
    let listing_id: i64 = get_last_insert_rowid(conn)?;
    info!(listing_id, car_id = listing.car_id, "Listing created");
    Ok(listing_id)
}

/// Persists a listing transition and its audit event.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn persist_listing_transition(
    conn: &mut SqliteConnection,
    result: &TransitionResult<CarListing>,
) -> Result<i64, PersistenceError> {
    persist_with_audit(
        conn,
        result,
        result.new_state.listing_id,
        "listing",
        write_listing,
    )
}
