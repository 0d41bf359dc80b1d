// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Fleet catalog handlers.

use carhive::{CarCommand, TransitionResult, apply_car};
use carhive_domain::{
    AvailabilityStatus, Car, CarAction, CarPatch, DomainError, Page, Paged, PublicationStatus,
    Role,
};
use carhive_persistence::{CarFilter, Persistence};
use time::PrimitiveDateTime;
use tracing::info;

use super::{availability_of, load_live_car, page_of, present_car, require_fleet_owner};
use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
use crate::request_response::{
    CarInfo, CarQuery, PagedResponse, SetAvailabilityRequest, StatusRequest, SubmitCarRequest,
    UpdateCarRequest,
};

fn load_car(persistence: &mut Persistence, car_id: i64) -> Result<Car, ApiError> {
    persistence
        .get_car(car_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| super::not_found("Car", car_id))
}

fn ensure_registration_free(
    persistence: &mut Persistence,
    car: &Car,
) -> Result<(), ApiError> {
    let registration_number: &str = &car.details.registration_number;
    let taken: bool = persistence
        .registration_number_taken(registration_number, car.car_id)
        .map_err(translate_persistence_error)?;
    if taken {
        return Err(translate_domain_error(DomainError::DuplicateRegistration(
            registration_number.to_string(),
        )));
    }
    Ok(())
}

/// Stores a car transition and presents the resulting car.
fn commit(
    persistence: &mut Persistence,
    result: TransitionResult<Car>,
    now: PrimitiveDateTime,
) -> Result<CarInfo, ApiError> {
    let car_id: i64 = persistence
        .persist_car_transition(&result)
        .map_err(translate_persistence_error)?;
    let mut car: Car = result.new_state;
    car.car_id = Some(car_id);

    let availability: AvailabilityStatus = availability_of(persistence, &car, now)?;
    present_car(&car, availability, true)
}

/// Availability of `car` if a non-admin caller may see it: approved and
/// available right now.
pub(crate) fn publicly_visible(
    persistence: &mut Persistence,
    car: &Car,
    now: PrimitiveDateTime,
) -> Result<Option<AvailabilityStatus>, ApiError> {
    if car.publication != PublicationStatus::Approved {
        return Ok(None);
    }
    let availability: AvailabilityStatus = availability_of(persistence, car, now)?;
    Ok((availability == AvailabilityStatus::Available).then_some(availability))
}

/// Submits a car for review.
///
/// Fleet owners always own what they submit. Admins may name the owning
/// fleet owner or leave the car unowned.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `actor` - The submitting identity
/// * `request` - The car attributes and documents
/// * `now` - Marketplace-local wall clock
///
/// # Errors
///
/// Returns an error if:
/// - The actor is a rider
/// - A non-admin names an owner other than themselves
/// - The named owner is not a fleet owner
/// - Any attribute, image count or document is invalid
/// - The registration number is already listed
pub fn submit_car(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request: &SubmitCarRequest,
    now: PrimitiveDateTime,
) -> Result<CarInfo, ApiError> {
    AuthorizationService::authorize_list_cars_for_rent(actor, "submit car")?;

    let owner_id: Option<i64> = if actor.is_admin() {
        if let Some(owner_id) = request.owner_id {
            require_fleet_owner(persistence, owner_id)?;
        }
        request.owner_id
    } else {
        if request.owner_id.is_some_and(|id| id != actor.user_id) {
            return Err(ApiError::Unauthorized {
                action: String::from("submit car"),
                reason: String::from("only admins may assign another owner"),
            });
        }
        Some(actor.user_id)
    };

    let result: TransitionResult<Car> = apply_car(
        None,
        CarCommand::Submit {
            draft: request.to_draft(),
            owner_id,
        },
        actor.to_audit_actor(),
    )
    .map_err(translate_core_error)?;
    ensure_registration_free(persistence, &result.new_state)?;

    let info: CarInfo = commit(persistence, result, now)?;
    info!(car_id = info.car_id, owner_id = ?owner_id, "Car submitted");
    Ok(info)
}

/// Lists cars visible to the caller.
///
/// Non-admins see approved cars that are available right now, without
/// owners. Fleet owners passing `mine` see all of their own non-deleted
/// cars instead. Admins see every non-deleted car and may filter by owner,
/// publication status and computed availability.
///
/// # Errors
///
/// Returns an error if a filter value or the page is invalid, or a rider
/// asks for `mine`.
pub fn list_cars(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    query: &CarQuery,
    now: PrimitiveDateTime,
) -> Result<PagedResponse<CarInfo>, ApiError> {
    let page: Page = page_of(query.page, query.page_size)?;

    let mut visible: Vec<CarInfo> = Vec::new();
    if actor.is_admin() {
        let publication: Option<PublicationStatus> = query
            .status
            .as_deref()
            .map(str::parse)
            .transpose()
            .map_err(translate_domain_error)?;
        let availability: Option<AvailabilityStatus> = query
            .availability_status
            .as_deref()
            .map(str::parse)
            .transpose()
            .map_err(translate_domain_error)?;

        let cars: Vec<Car> = persistence
            .list_cars(&CarFilter {
                owner_id: query.owner_id,
                publication,
                include_deleted: false,
            })
            .map_err(translate_persistence_error)?;
        for car in &cars {
            let computed: AvailabilityStatus = availability_of(persistence, car, now)?;
            if availability.is_none_or(|wanted| wanted == computed) {
                visible.push(present_car(car, computed, true)?);
            }
        }
    } else if query.mine == Some(true) {
        AuthorizationService::authorize_list_cars_for_rent(actor, "list own cars")?;
        let cars: Vec<Car> = persistence
            .list_cars(&CarFilter {
                owner_id: Some(actor.user_id),
                ..CarFilter::default()
            })
            .map_err(translate_persistence_error)?;
        for car in &cars {
            let computed: AvailabilityStatus = availability_of(persistence, car, now)?;
            visible.push(present_car(car, computed, true)?);
        }
    } else {
        let cars: Vec<Car> = persistence
            .list_cars(&CarFilter {
                publication: Some(PublicationStatus::Approved),
                ..CarFilter::default()
            })
            .map_err(translate_persistence_error)?;
        for car in &cars {
            if let Some(computed) = publicly_visible(persistence, car, now)? {
                visible.push(present_car(car, computed, false)?);
            }
        }
    }

    let paged: Paged<CarInfo> = page.slice(visible);
    Ok(paged.into())
}

/// Retrieves one car under the same visibility rules as [`list_cars`].
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` for deleted cars and for cars the
/// caller may not see.
pub fn get_car(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    car_id: i64,
    now: PrimitiveDateTime,
) -> Result<CarInfo, ApiError> {
    let car: Car = load_live_car(persistence, car_id)?;

    let owns: bool = actor.role == Role::FleetOwner && car.owner_id == Some(actor.user_id);
    if actor.is_admin() || owns {
        let computed: AvailabilityStatus = availability_of(persistence, &car, now)?;
        return present_car(&car, computed, true);
    }

    match publicly_visible(persistence, &car, now)? {
        Some(computed) => present_car(&car, computed, false),
        None => Err(super::not_found("Car", car_id)),
    }
}

/// Edits a car.
///
/// # Errors
///
/// Returns an error if:
/// - The car does not exist
/// - The actor neither administers nor owns the car
/// - A non-admin touches the owner or the availability hold
/// - The new owner is not a fleet owner
/// - The car is deleted or a changed value is invalid
/// - The new registration number belongs to another car
pub fn update_car(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    car_id: i64,
    request: &UpdateCarRequest,
    now: PrimitiveDateTime,
) -> Result<CarInfo, ApiError> {
    let car: Car = load_car(persistence, car_id)?;
    AuthorizationService::authorize_manage_car(actor, &car, "update car")?;

    let patch: CarPatch = request.to_patch().map_err(translate_domain_error)?;
    if patch.touches_admin_fields() {
        AuthorizationService::require_admin(actor, "change car owner or availability")?;
    }
    if let Some(owner_id) = patch.owner_id {
        require_fleet_owner(persistence, owner_id)?;
    }

    let result: TransitionResult<Car> = apply_car(
        Some(&car),
        CarCommand::Update { patch },
        actor.to_audit_actor(),
    )
    .map_err(translate_core_error)?;
    if result.new_state.details.registration_number != car.details.registration_number {
        ensure_registration_free(persistence, &result.new_state)?;
    }

    let info: CarInfo = commit(persistence, result, now)?;
    info!(car_id, "Car updated");
    Ok(info)
}

/// Applies an admin publication decision.
///
/// # Errors
///
/// Returns an error if the actor is not an admin, the car does not exist,
/// or the car is already deleted.
pub fn decide_car(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    car_id: i64,
    action: CarAction,
    now: PrimitiveDateTime,
) -> Result<CarInfo, ApiError> {
    AuthorizationService::require_admin(actor, "decide car")?;
    let car: Car = load_car(persistence, car_id)?;

    let result: TransitionResult<Car> = apply_car(
        Some(&car),
        CarCommand::Decide { action },
        actor.to_audit_actor(),
    )
    .map_err(translate_core_error)?;

    let changed: bool = !result.is_noop();
    let info: CarInfo = commit(persistence, result, now)?;
    if changed {
        info!(car_id, action = action.name(), status = %info.status, "Car publication changed");
    }
    Ok(info)
}

/// Sets a car's publication status by name.
///
/// # Errors
///
/// Returns an error if the status is unknown, or as [`decide_car`].
pub fn set_car_status(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    car_id: i64,
    request: &StatusRequest,
    now: PrimitiveDateTime,
) -> Result<CarInfo, ApiError> {
    let status: PublicationStatus = request.status.parse().map_err(translate_domain_error)?;
    let action: CarAction = match status {
        PublicationStatus::Approved => CarAction::Approve,
        PublicationStatus::Delete => CarAction::Delete,
        other => CarAction::SetStatus(other),
    };
    decide_car(persistence, actor, car_id, action, now)
}

/// Soft-deletes a car. Deleted cars disappear from every read path.
///
/// # Errors
///
/// As [`decide_car`].
pub fn delete_car(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    car_id: i64,
    now: PrimitiveDateTime,
) -> Result<CarInfo, ApiError> {
    decide_car(persistence, actor, car_id, CarAction::Delete, now)
}

/// Sets or clears the admin availability hold.
///
/// # Errors
///
/// Returns an error if the actor is not an admin, the availability is
/// unknown, or the car does not exist or is deleted.
pub fn set_car_availability(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    car_id: i64,
    request: &SetAvailabilityRequest,
    now: PrimitiveDateTime,
) -> Result<CarInfo, ApiError> {
    AuthorizationService::require_admin(actor, "set car availability")?;
    let availability: AvailabilityStatus = request
        .availability_status
        .parse()
        .map_err(translate_domain_error)?;
    let car: Car = load_car(persistence, car_id)?;

    let result: TransitionResult<Car> = apply_car(
        Some(&car),
        CarCommand::SetAvailability { availability },
        actor.to_audit_actor(),
    )
    .map_err(translate_core_error)?;

    let info: CarInfo = commit(persistence, result, now)?;
    info!(car_id, hold = availability.as_str(), "Car availability hold set");
    Ok(info)
}

