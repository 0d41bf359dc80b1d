// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{event, missing_target, unexpected_target};
use crate::command::CarCommand;
use crate::error::CoreError;
use crate::state::TransitionResult;
use carhive_audit::{Actor, AuditEvent, EntityKind};
use carhive_domain::{AvailabilityHold, Car, CarPatch, DomainError, PublicationStatus};

/// Applies a catalog command to a car.
///
/// # Arguments
///
/// * `current` - The stored car, or `None` for a submission
/// * `command` - The command to apply
/// * `actor` - The identity performing the command
///
/// # Errors
///
/// Returns an error if:
/// - The command is invalid for the current record
/// - The car is deleted
/// - Validation of the submitted or merged attributes fails
pub fn apply_car(
    current: Option<&Car>,
    command: CarCommand,
    actor: Actor,
) -> Result<TransitionResult<Car>, CoreError> {
    match (current, command) {
        (None, CarCommand::Submit { draft, owner_id }) => {
            let car: Car = Car::submit(&draft, owner_id)?;
            let audit_event: AuditEvent = event(
                actor,
                "SubmitCar",
                Some(format!(
                    "Submitted {} {} ({})",
                    car.details.brand, car.details.model, car.details.registration_number
                )),
                EntityKind::Car,
                None,
                String::from("none"),
                car.snapshot(),
            );
            Ok(TransitionResult::applied(car, audit_event))
        }
        (Some(_), CarCommand::Submit { .. }) => Err(unexpected_target("car")),
        (None, _) => Err(missing_target("car")),
        (Some(car), CarCommand::Update { patch }) => update(car, &patch, actor),
        (Some(car), CarCommand::Decide { action }) => {
            let target: PublicationStatus = action.target_status();
            car.publication.validate_transition(target)?;
            // Approval lifts any admin hold.
            let hold: AvailabilityHold = if target == PublicationStatus::Approved {
                AvailabilityHold::None
            } else {
                car.hold
            };
            if car.publication == target && car.hold == hold {
                return Ok(TransitionResult::unchanged(car.clone()));
            }

            let mut updated: Car = car.clone();
            updated.publication = target;
            updated.hold = hold;
            let audit_event: AuditEvent = event(
                actor,
                action.name(),
                Some(format!(
                    "Publication {} -> {}",
                    car.publication.as_str(),
                    target.as_str()
                )),
                EntityKind::Car,
                car.car_id,
                car.snapshot(),
                updated.snapshot(),
            );
            Ok(TransitionResult::applied(updated, audit_event))
        }
        (Some(car), CarCommand::SetAvailability { availability }) => {
            if car.is_deleted() {
                return Err(DomainError::CarDeleted(car.require_id()?).into());
            }
            let hold: AvailabilityHold = availability.as_hold();
            if car.hold == hold {
                return Ok(TransitionResult::unchanged(car.clone()));
            }

            let mut updated: Car = car.clone();
            updated.hold = hold;
            let audit_event: AuditEvent = event(
                actor,
                "SetCarAvailability",
                Some(format!("Availability set to {}", availability.as_str())),
                EntityKind::Car,
                car.car_id,
                car.snapshot(),
                updated.snapshot(),
            );
            Ok(TransitionResult::applied(updated, audit_event))
        }
    }
}

fn update(car: &Car, patch: &CarPatch, actor: Actor) -> Result<TransitionResult<Car>, CoreError> {
    let updated: Car = patch.apply_to(car)?;
    if updated == *car {
        return Ok(TransitionResult::unchanged(updated));
    }
    let audit_event: AuditEvent = event(
        actor,
        "UpdateCar",
        None,
        EntityKind::Car,
        car.car_id,
        car.snapshot(),
        updated.snapshot(),
    );
    Ok(TransitionResult::applied(updated, audit_event))
}
