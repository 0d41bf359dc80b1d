// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Computed car availability.
//!
//! Availability is a pure function of the car's publication status, its admin
//! hold, and the windows of its approved rides and approved pauses. It is
//! derived on every read and never stored, so a decision on one booking can
//! never clobber the effect of another, and lapsed windows stop blocking the
//! car without any sweeper.

use crate::car::{AvailabilityHold, AvailabilityStatus, PublicationStatus};
use crate::schedule::Schedule;
use time::PrimitiveDateTime;

/// Everything availability depends on.
#[derive(Debug, Clone, Copy)]
pub struct AvailabilityInputs<'a> {
    pub publication: PublicationStatus,
    pub hold: AvailabilityHold,
    /// Windows of rides whose stored status is `approve`.
    pub approved_rides: &'a [Schedule],
    /// Windows of pauses whose status is `approved`.
    pub approved_pauses: &'a [Schedule],
}

/// Resolves a car's availability at marketplace-local `now`.
///
/// Precedence, first match wins:
/// 1. not approved: unavailable
/// 2. maintenance hold: maintenance
/// 3. unavailable hold: unavailable
/// 4. an approved ride or pause whose window has not ended: unavailable
/// 5. otherwise: available
#[must_use]
pub fn compute_availability(
    inputs: &AvailabilityInputs<'_>,
    now: PrimitiveDateTime,
) -> AvailabilityStatus {
    if inputs.publication != PublicationStatus::Approved {
        return AvailabilityStatus::Unavailable;
    }

    match inputs.hold {
        AvailabilityHold::Maintenance => return AvailabilityStatus::Maintenance,
        AvailabilityHold::Unavailable => return AvailabilityStatus::Unavailable,
        AvailabilityHold::None => {}
    }

    let blocked: bool = inputs
        .approved_rides
        .iter()
        .chain(inputs.approved_pauses)
        .any(|window| !window.has_ended(now));

    if blocked {
        AvailabilityStatus::Unavailable
    } else {
        AvailabilityStatus::Available
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn window(date_from: &str, date_to: &str) -> Schedule {
        match Schedule::parse(date_from, date_to, "09:00", "17:00") {
            Ok(s) => s,
            Err(e) => panic!("{e}"),
        }
    }

    fn inputs<'a>(
        publication: PublicationStatus,
        hold: AvailabilityHold,
        rides: &'a [Schedule],
        pauses: &'a [Schedule],
    ) -> AvailabilityInputs<'a> {
        AvailabilityInputs {
            publication,
            hold,
            approved_rides: rides,
            approved_pauses: pauses,
        }
    }

    const NOW: PrimitiveDateTime = datetime!(2024-05-20 12:00);

    #[test]
    fn test_only_approved_cars_can_be_available() {
        for publication in [
            PublicationStatus::Pending,
            PublicationStatus::Rejected,
            PublicationStatus::Block,
            PublicationStatus::Delete,
        ] {
            let status: AvailabilityStatus = compute_availability(
                &inputs(publication, AvailabilityHold::None, &[], &[]),
                NOW,
            );
            assert_eq!(status, AvailabilityStatus::Unavailable);
        }
    }

    #[test]
    fn test_approved_car_without_constraints_is_available() {
        let status: AvailabilityStatus = compute_availability(
            &inputs(
                PublicationStatus::Approved,
                AvailabilityHold::None,
                &[],
                &[],
            ),
            NOW,
        );
        assert_eq!(status, AvailabilityStatus::Available);
    }

    #[test]
    fn test_hold_overrides_bookings() {
        let rides: [Schedule; 1] = [window("2024-06-01", "2024-06-02")];
        assert_eq!(
            compute_availability(
                &inputs(
                    PublicationStatus::Approved,
                    AvailabilityHold::Maintenance,
                    &rides,
                    &[]
                ),
                NOW
            ),
            AvailabilityStatus::Maintenance
        );
    }

    #[test]
    fn test_future_approved_ride_blocks_car() {
        let rides: [Schedule; 1] = [window("2024-06-01", "2024-06-02")];
        assert_eq!(
            compute_availability(
                &inputs(
                    PublicationStatus::Approved,
                    AvailabilityHold::None,
                    &rides,
                    &[]
                ),
                NOW
            ),
            AvailabilityStatus::Unavailable
        );
    }

    #[test]
    fn test_lapsed_windows_no_longer_block() {
        let rides: [Schedule; 1] = [window("2024-05-01", "2024-05-02")];
        let pauses: [Schedule; 1] = [window("2024-05-10", "2024-05-19")];
        assert_eq!(
            compute_availability(
                &inputs(
                    PublicationStatus::Approved,
                    AvailabilityHold::None,
                    &rides,
                    &pauses
                ),
                NOW
            ),
            AvailabilityStatus::Available
        );
    }

    #[test]
    fn test_active_pause_blocks_car() {
        let pauses: [Schedule; 1] = [window("2024-05-19", "2024-05-21")];
        assert_eq!(
            compute_availability(
                &inputs(
                    PublicationStatus::Approved,
                    AvailabilityHold::None,
                    &[],
                    &pauses
                ),
                NOW
            ),
            AvailabilityStatus::Unavailable
        );
    }
}
