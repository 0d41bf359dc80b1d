// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};

/// A WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

impl GeoPoint {
    /// Creates a coordinate, checking both axes.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCoordinate` if longitude is outside
    /// [-180, 180], latitude outside [-90, 90], or either is not finite.
    pub fn new(longitude: f64, latitude: f64) -> Result<Self, DomainError> {
        check_axis("longitude", longitude, 180.0)?;
        check_axis("latitude", latitude, 90.0)?;
        Ok(Self {
            longitude,
            latitude,
        })
    }
}

fn check_axis(axis: &'static str, value: f64, bound: f64) -> Result<(), DomainError> {
    if value.is_finite() && (-bound..=bound).contains(&value) {
        Ok(())
    } else {
        Err(DomainError::InvalidCoordinate {
            axis,
            value: value.to_string(),
        })
    }
}

/// Pick-up and drop-off points of a ride.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub from: GeoPoint,
    pub to: GeoPoint,
}

impl Route {
    #[must_use]
    pub const fn new(from: GeoPoint, to: GeoPoint) -> Self {
        Self { from, to }
    }
}
