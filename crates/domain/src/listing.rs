// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::schedule::DateRange;
use crate::validation::{validate_non_negative, validate_required};
use std::cmp::Ordering;
use std::str::FromStr;

/// A city-scoped rental offer for a car.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarListing {
    pub listing_id: Option<i64>,
    pub car_id: i64,
    pub city: String,
    pub parking_location: String,
    /// Owner asking price, minor currency units.
    pub price_per_day: i64,
    /// Admin override; wins over the asking price when set.
    pub approved_price_per_day: Option<i64>,
    pub rental_period: DateRange,
    pub delivery_available: bool,
    /// Fleet owner operating the listing. Admin-assigned.
    pub fleet_by: Option<i64>,
}

impl CarListing {
    /// # Errors
    ///
    /// Returns an error for a blank city or parking location, or a negative
    /// price.
    pub fn new(
        car_id: i64,
        city: &str,
        parking_location: &str,
        price_per_day: i64,
        rental_period: DateRange,
        delivery_available: bool,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            listing_id: None,
            car_id,
            city: validate_required("city", city)?,
            parking_location: validate_required("parking_location", parking_location)?,
            price_per_day: validate_non_negative("price_per_day", price_per_day)?,
            approved_price_per_day: None,
            rental_period,
            delivery_available,
            fleet_by: None,
        })
    }

    /// Sets or clears the admin price override.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NegativeAmount` for negative prices.
    pub fn set_approved_price(&mut self, price: Option<i64>) -> Result<(), DomainError> {
        self.approved_price_per_day = match price {
            Some(price) => Some(validate_non_negative("approved_price_per_day", price)?),
            None => None,
        };
        Ok(())
    }

    /// The price riders are charged.
    #[must_use]
    pub fn effective_price(&self) -> i64 {
        self.approved_price_per_day.unwrap_or(self.price_per_day)
    }

    /// True when the requested period fits inside the rental period.
    #[must_use]
    pub fn covers(&self, period: &DateRange) -> bool {
        self.rental_period.contains_range(period)
    }

    /// True when `city` matches case-insensitively as a substring.
    #[must_use]
    pub fn in_city(&self, city: &str) -> bool {
        self.city
            .to_lowercase()
            .contains(&city.trim().to_lowercase())
    }
}

/// Ordering requested for listing searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingSort {
    PriceLowToHigh,
    PriceHighToLow,
    RatingsHighToLow,
}

impl ListingSort {
    /// Orders two listings given their effective prices and average ratings.
    /// Unrated listings sort after rated ones.
    #[must_use]
    pub fn compare(
        &self,
        (price_a, rating_a): (i64, Option<f64>),
        (price_b, rating_b): (i64, Option<f64>),
    ) -> Ordering {
        match self {
            Self::PriceLowToHigh => price_a.cmp(&price_b),
            Self::PriceHighToLow => price_b.cmp(&price_a),
            Self::RatingsHighToLow => {
                let a: f64 = rating_a.unwrap_or(-1.0);
                let b: f64 = rating_b.unwrap_or(-1.0);
                b.total_cmp(&a)
            }
        }
    }
}

impl FromStr for ListingSort {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "price_low_to_high" => Ok(Self::PriceLowToHigh),
            "price_high_to_low" => Ok(Self::PriceHighToLow),
            "ratings_high_to_low" => Ok(Self::RatingsHighToLow),
            _ => Err(DomainError::InvalidField {
                field: String::from("sort"),
                message: format!("unknown sort '{s}'"),
            }),
        }
    }
}
