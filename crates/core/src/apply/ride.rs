// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{event, missing_target, unexpected_target};
use crate::command::RideCommand;
use crate::error::CoreError;
use crate::state::{RideContext, TransitionResult};
use carhive_audit::{Actor, AuditEvent, EntityKind};
use carhive_domain::{Car, DomainError, PublicationStatus, Ride, RideStatus, Route, Schedule};

/// Applies a booking command.
///
/// # Arguments
///
/// * `context` - The booked car, the rider's KYC record and the car's other
///   approved rides
/// * `current` - The stored ride, or `None` for a new request
/// * `command` - The command to apply
/// * `actor` - The identity performing the command
///
/// # Errors
///
/// Returns an error if:
/// - The car is deleted or not approved
/// - The rider's KYC is missing or not approved
/// - The ride is no longer editable
/// - The status change is not permitted
/// - Approving would overlap another approved ride of the same car
pub fn apply_ride(
    context: &RideContext<'_>,
    current: Option<&Ride>,
    command: RideCommand,
    actor: Actor,
) -> Result<TransitionResult<Ride>, CoreError> {
    match (current, command) {
        (
            None,
            RideCommand::Request {
                car_id,
                route,
                schedule,
            },
        ) => {
            check_bookable(context, car_id)?;
            check_kyc(context)?;

            let ride: Ride = Ride::request(car_id, actor.user_id, route, schedule);
            let audit_event: AuditEvent = event(
                actor,
                "RequestRide",
                Some(format!(
                    "Requested car {car_id} for {}..{}",
                    schedule.starts_at(),
                    schedule.ends_at()
                )),
                EntityKind::Ride,
                None,
                String::from("none"),
                ride.snapshot(),
            );
            Ok(TransitionResult::applied(ride, audit_event))
        }
        (Some(_), RideCommand::Request { .. }) => Err(unexpected_target("ride")),
        (None, _) => Err(missing_target("ride")),
        (Some(ride), RideCommand::Update { route, schedule }) => {
            update(ride, route, schedule, actor)
        }
        (Some(ride), RideCommand::Decide { status }) => decide(context, ride, status, actor),
    }
}

fn check_bookable(context: &RideContext<'_>, car_id: i64) -> Result<(), DomainError> {
    let car: &Car = context.car;
    if car.is_deleted() {
        return Err(DomainError::CarDeleted(car_id));
    }
    if car.publication != PublicationStatus::Approved {
        return Err(DomainError::CarNotBookable {
            car_id,
            status: car.publication.as_str().to_string(),
        });
    }
    Ok(())
}

fn check_kyc(context: &RideContext<'_>) -> Result<(), DomainError> {
    match context.rider_kyc {
        Some(record) if record.is_approved() => Ok(()),
        Some(record) => Err(DomainError::KycNotApproved {
            status: Some(record.status.as_str().to_string()),
        }),
        None => Err(DomainError::KycNotApproved { status: None }),
    }
}

fn update(
    ride: &Ride,
    route: Option<Route>,
    schedule: Option<Schedule>,
    actor: Actor,
) -> Result<TransitionResult<Ride>, CoreError> {
    if ride.status != RideStatus::Pending {
        return Err(DomainError::RideLocked {
            ride_id: ride.ride_id.unwrap_or_default(),
            status: ride.status.as_str().to_string(),
        }
        .into());
    }
    if route.is_none() && schedule.is_none() {
        return Err(DomainError::EmptyUpdate.into());
    }

    let mut updated: Ride = ride.clone();
    if let Some(route) = route {
        updated.route = route;
    }
    if let Some(schedule) = schedule {
        updated.schedule = schedule;
    }
    if updated == *ride {
        return Ok(TransitionResult::unchanged(updated));
    }

    let audit_event: AuditEvent = event(
        actor,
        "UpdateRide",
        None,
        EntityKind::Ride,
        ride.ride_id,
        ride.snapshot(),
        updated.snapshot(),
    );
    Ok(TransitionResult::applied(updated, audit_event))
}

fn decide(
    context: &RideContext<'_>,
    ride: &Ride,
    status: RideStatus,
    actor: Actor,
) -> Result<TransitionResult<Ride>, CoreError> {
    if ride.status == status {
        return Ok(TransitionResult::unchanged(ride.clone()));
    }
    ride.status.validate_transition(status)?;

    if status == RideStatus::Approve {
        check_bookable(context, ride.car_id)?;
        if let Some(conflict) = context.approved_rides.iter().find(|other| {
            other.ride_id != ride.ride_id
                && other.car_id == ride.car_id
                && other.status == RideStatus::Approve
                && other.schedule.overlaps(&ride.schedule)
        }) {
            return Err(DomainError::RideOverlap {
                car_id: ride.car_id,
                conflicting_ride_id: conflict.ride_id.unwrap_or_default(),
            }
            .into());
        }
    }

    let mut updated: Ride = ride.clone();
    updated.status = status;
    updated.decided_by = Some(actor.user_id);

    let action: &str = match status {
        RideStatus::Approve => "ApproveRide",
        RideStatus::Reject => "RejectRide",
        RideStatus::Pending => "ReopenRide",
    };
    let audit_event: AuditEvent = event(
        actor,
        action,
        Some(format!(
            "Ride {} -> {}",
            ride.status.as_str(),
            status.as_str()
        )),
        EntityKind::Ride,
        ride.ride_id,
        ride.snapshot(),
        updated.snapshot(),
    );
    Ok(TransitionResult::applied(updated, audit_event))
}
