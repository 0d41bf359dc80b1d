// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ride (booking) lifecycle.
//!
//! Stored status is one of `pending`, `approve`, `reject`. A fourth status,
//! `ongoing`, is presented but never stored: an approved ride is ongoing
//! while the marketplace clock is inside its window.

use crate::error::DomainError;
use crate::geo::Route;
use crate::schedule::Schedule;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::PrimitiveDateTime;

/// Persisted ride status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RideStatus {
    Pending,
    Approve,
    Reject,
}

impl RideStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approve => "approve",
            Self::Reject => "reject",
        }
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approve" | "approved" => Ok(Self::Approve),
            "reject" | "rejected" => Ok(Self::Reject),
            _ => Err(DomainError::InvalidStatus {
                kind: "ride",
                value: s.to_string(),
            }),
        }
    }

    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Reject)
    }

    /// Validates a status change.
    ///
    /// Permitted: `pending -> approve | reject`, `approve -> reject | pending`.
    /// Callers treat a change to the current status as a no-op before asking.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` when leaving `reject`.
    pub fn validate_transition(&self, new_status: Self) -> Result<(), DomainError> {
        let valid: bool = match self {
            Self::Pending => matches!(new_status, Self::Approve | Self::Reject),
            Self::Approve => matches!(new_status, Self::Reject | Self::Pending),
            Self::Reject => false,
        };

        if valid {
            Ok(())
        } else {
            Err(DomainError::InvalidStatusTransition {
                entity: "ride",
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: String::from("rejected rides are final"),
            })
        }
    }
}

impl FromStr for RideStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

/// Status as shown to callers, with the derived `ongoing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresentedRideStatus {
    Pending,
    Approve,
    Reject,
    Ongoing,
}

impl PresentedRideStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Ongoing => "ongoing",
        }
    }

    /// The stored status rows with this presented status are kept under.
    #[must_use]
    pub const fn stored(&self) -> RideStatus {
        match self {
            Self::Pending => RideStatus::Pending,
            Self::Approve | Self::Ongoing => RideStatus::Approve,
            Self::Reject => RideStatus::Reject,
        }
    }
}

impl FromStr for PresentedRideStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("ongoing") {
            return Ok(Self::Ongoing);
        }
        Ok(match RideStatus::parse_str(s)? {
            RideStatus::Pending => Self::Pending,
            RideStatus::Approve => Self::Approve,
            RideStatus::Reject => Self::Reject,
        })
    }
}

/// A booking of one car by one rider.
#[derive(Debug, Clone, PartialEq)]
pub struct Ride {
    pub ride_id: Option<i64>,
    pub car_id: i64,
    pub rider_id: i64,
    pub route: Route,
    pub schedule: Schedule,
    pub status: RideStatus,
    pub decided_by: Option<i64>,
}

impl Ride {
    /// A new booking request; always starts `pending`.
    #[must_use]
    pub const fn request(car_id: i64, rider_id: i64, route: Route, schedule: Schedule) -> Self {
        Self {
            ride_id: None,
            car_id,
            rider_id,
            route,
            schedule,
            status: RideStatus::Pending,
            decided_by: None,
        }
    }

    /// Derives the presented status at marketplace-local `now`.
    #[must_use]
    pub fn presented_status(&self, now: PrimitiveDateTime) -> PresentedRideStatus {
        match self.status {
            RideStatus::Pending => PresentedRideStatus::Pending,
            RideStatus::Reject => PresentedRideStatus::Reject,
            RideStatus::Approve if self.schedule.contains(now) => PresentedRideStatus::Ongoing,
            RideStatus::Approve => PresentedRideStatus::Approve,
        }
    }

    /// Compact description used in audit snapshots.
    #[must_use]
    pub fn snapshot(&self) -> String {
        format!(
            "ride_id={},car_id={},rider_id={},window={}..{},status={}",
            self.ride_id
                .map_or_else(|| String::from("new"), |id| id.to_string()),
            self.car_id,
            self.rider_id,
            self.schedule.starts_at(),
            self.schedule.ends_at(),
            self.status.as_str()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::GeoPoint;
    use time::macros::datetime;

    fn approved_ride() -> Ride {
        let point: GeoPoint = match GeoPoint::new(77.59, 12.97) {
            Ok(p) => p,
            Err(e) => panic!("{e}"),
        };
        let schedule: Schedule =
            match Schedule::parse("2024-06-01", "2024-06-02", "09:00", "17:00") {
                Ok(s) => s,
                Err(e) => panic!("{e}"),
            };
        let mut ride: Ride = Ride::request(1, 2, Route::new(point, point), schedule);
        ride.status = RideStatus::Approve;
        ride
    }

    #[test]
    fn test_pending_can_be_approved_or_rejected() {
        assert!(
            RideStatus::Pending
                .validate_transition(RideStatus::Approve)
                .is_ok()
        );
        assert!(
            RideStatus::Pending
                .validate_transition(RideStatus::Reject)
                .is_ok()
        );
    }

    #[test]
    fn test_approve_can_be_reverted_or_rejected() {
        assert!(
            RideStatus::Approve
                .validate_transition(RideStatus::Reject)
                .is_ok()
        );
        assert!(
            RideStatus::Approve
                .validate_transition(RideStatus::Pending)
                .is_ok()
        );
    }

    #[test]
    fn test_reject_is_final() {
        assert!(RideStatus::Reject.is_terminal());
        assert!(
            RideStatus::Reject
                .validate_transition(RideStatus::Approve)
                .is_err()
        );
        assert!(
            RideStatus::Reject
                .validate_transition(RideStatus::Pending)
                .is_err()
        );
    }

    #[test]
    fn test_ongoing_is_derived_inside_window() {
        let ride: Ride = approved_ride();
        assert_eq!(
            ride.presented_status(datetime!(2024-05-20 10:00)),
            PresentedRideStatus::Approve
        );
        assert_eq!(
            ride.presented_status(datetime!(2024-06-01 09:00)),
            PresentedRideStatus::Ongoing
        );
        assert_eq!(
            ride.presented_status(datetime!(2024-06-02 17:00)),
            PresentedRideStatus::Ongoing
        );
        assert_eq!(
            ride.presented_status(datetime!(2024-06-02 17:01)),
            PresentedRideStatus::Approve
        );
    }

    #[test]
    fn test_pending_ride_is_never_ongoing() {
        let mut ride: Ride = approved_ride();
        ride.status = RideStatus::Pending;
        assert_eq!(
            ride.presented_status(datetime!(2024-06-01 12:00)),
            PresentedRideStatus::Pending
        );
    }

    #[test]
    fn test_presented_status_parsing() {
        assert_eq!("Ongoing".parse(), Ok(PresentedRideStatus::Ongoing));
        assert_eq!("approved".parse(), Ok(PresentedRideStatus::Approve));
        assert_eq!(PresentedRideStatus::Ongoing.stored(), RideStatus::Approve);
        assert!("done".parse::<PresentedRideStatus>().is_err());
    }
}
