// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;

/// A score out of five with an optional review, about a car, a rider, or both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rating {
    pub rating_id: Option<i64>,
    pub author_id: i64,
    pub car_id: Option<i64>,
    pub rider_id: Option<i64>,
    pub rate: u8,
    pub review: String,
}

impl Rating {
    /// # Errors
    ///
    /// Returns `DomainError::MissingRatingTarget` when neither target is set,
    /// or `DomainError::InvalidRating` when `rate` is outside 0..=5.
    pub fn new(
        author_id: i64,
        car_id: Option<i64>,
        rider_id: Option<i64>,
        rate: i64,
        review: &str,
    ) -> Result<Self, DomainError> {
        if car_id.is_none() && rider_id.is_none() {
            return Err(DomainError::MissingRatingTarget);
        }
        let rate: u8 = u8::try_from(rate)
            .ok()
            .filter(|r| *r <= 5)
            .ok_or(DomainError::InvalidRating(rate))?;

        Ok(Self {
            rating_id: None,
            author_id,
            car_id,
            rider_id,
            rate,
            review: review.trim().to_string(),
        })
    }
}

/// Mean of the given scores, or `None` for an empty slice.
#[must_use]
pub fn average_rate(rates: &[u8]) -> Option<f64> {
    if rates.is_empty() {
        return None;
    }
    let total: u32 = rates.iter().map(|r| u32::from(*r)).sum();
    let count: u32 = u32::try_from(rates.len()).ok()?;
    Some(f64::from(total) / f64::from(count))
}
