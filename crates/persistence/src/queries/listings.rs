// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Listing queries.

use carhive_domain::{CarListing, DateRange};
use diesel::prelude::*;
use diesel::SqliteConnection;

use crate::data_models::ListingFilter;
use crate::diesel_schema::car_listings;
use crate::error::PersistenceError;

/// Diesel Queryable struct for listing rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = car_listings)]
struct ListingRow {
    listing_id: i64,
    car_id: i64,
    city: String,
    parking_location: String,
    price_per_day: i64,
    approved_price_per_day: Option<i64>,
    rental_from: String,
    rental_to: String,
    delivery_available: i32,
    fleet_by: Option<i64>,
}

impl ListingRow {
    fn into_listing(self) -> Result<CarListing, PersistenceError> {
        Ok(CarListing {
            listing_id: Some(self.listing_id),
            car_id: self.car_id,
            city: self.city,
            parking_location: self.parking_location,
            price_per_day: self.price_per_day,
            approved_price_per_day: self.approved_price_per_day,
            rental_period: DateRange::parse(&self.rental_from, &self.rental_to)?,
            delivery_available: self.delivery_available != 0,
            fleet_by: self.fleet_by,
        })
    }
}

/// Retrieves a listing by ID.
///
/// # Errors
///
/// Returns an error if the query fails or the row is invalid.
/// Returns `Ok(None)` if the listing does not exist.
pub fn get_listing(
    conn: &mut SqliteConnection,
    listing_id: i64,
) -> Result<Option<CarListing>, PersistenceError> {
    let row: Option<ListingRow> = car_listings::table
        .filter(car_listings::listing_id.eq(listing_id))
        .select(ListingRow::as_select())
        .first(conn)
        .optional()?;

    row.map(ListingRow::into_listing).transpose()
}

/// Lists listings matching the stored-column filter, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails or a row is invalid.
pub fn list_listings(
    conn: &mut SqliteConnection,
    filter: &ListingFilter,
) -> Result<Vec<CarListing>, PersistenceError> {
    let mut query = car_listings::table
        .select(ListingRow::as_select())
        .into_boxed();

    if let Some(car_id) = filter.car_id {
        query = query.filter(car_listings::car_id.eq(car_id));
    }
    if let Some(city) = filter.city.as_deref() {
        // SQLite LIKE is case-insensitive for ASCII
        query = query.filter(car_listings::city.like(format!("%{}%", city.trim())));
    }
    if let Some(delivery) = filter.delivery_available {
        query = query.filter(car_listings::delivery_available.eq(i32::from(delivery)));
    }

    let rows: Vec<ListingRow> = query.order(car_listings::listing_id.asc()).load(conn)?;
    rows.into_iter().map(ListingRow::into_listing).collect()
}
