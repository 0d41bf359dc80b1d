// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking handlers.

use carhive::{RideCommand, RideContext, TransitionResult, apply_ride};
use carhive_audit::EntityKind;
use carhive_domain::{
    Car, DateRange, KycKind, KycRecord, Page, Paged, PresentedRideStatus, Ride, RideStatus, Role,
    Route, Schedule, TimeRange, parse_date,
};
use carhive_persistence::{Persistence, RideFilter};
use time::{Date, PrimitiveDateTime};
use tracing::info;

use super::{last_decision_at, load_live_car, not_found, page_of, present_ride};
use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
use crate::request_response::{
    CreateRideRequest, DateRangeDto, LocationDto, PagedResponse, RideInfo, RideQuery,
    StatusRequest, TimeRangeDto, UpdateRideRequest,
};

/// Audit actions that record an admin decision on a ride.
const DECISION_ACTIONS: [&str; 3] = ["ApproveRide", "RejectRide", "ReopenRide"];

fn load_ride(persistence: &mut Persistence, ride_id: i64) -> Result<Ride, ApiError> {
    persistence
        .get_ride(ride_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| not_found("Ride", ride_id))
}

fn decided_at(persistence: &mut Persistence, ride_id: i64) -> Result<Option<String>, ApiError> {
    last_decision_at(persistence, EntityKind::Ride, ride_id, &DECISION_ACTIONS)
}

fn parse_optional_date(value: Option<&str>) -> Result<Option<Date>, ApiError> {
    value
        .map(parse_date)
        .transpose()
        .map_err(translate_domain_error)
}

/// Books a car for the calling rider.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `actor` - The booking rider
/// * `request` - Car, route and window
/// * `now` - Marketplace-local wall clock
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not a rider, or has no approved rider KYC
/// - The car does not exist or is deleted
/// - The car is not approved
/// - A coordinate, date or time is invalid
pub fn create_ride(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request: &CreateRideRequest,
    now: PrimitiveDateTime,
) -> Result<RideInfo, ApiError> {
    AuthorizationService::authorize_book_ride(actor)?;
    let car: Car = load_live_car(persistence, request.car_id)?;
    let rider_kyc: Option<KycRecord> = persistence
        .get_kyc_for_user(actor.user_id, KycKind::Rider)
        .map_err(translate_persistence_error)?;

    let route: Route = request.location.to_route().map_err(translate_domain_error)?;
    let date: DateRange = request.date.to_range().map_err(translate_domain_error)?;
    let time: TimeRange = request.time.to_range().map_err(translate_domain_error)?;

    let context: RideContext<'_> = RideContext {
        car: &car,
        rider_kyc: rider_kyc.as_ref(),
        approved_rides: &[],
    };
    let result: TransitionResult<Ride> = apply_ride(
        &context,
        None,
        RideCommand::Request {
            car_id: request.car_id,
            route,
            schedule: Schedule::new(date, time),
        },
        actor.to_audit_actor(),
    )
    .map_err(translate_core_error)?;

    let ride_id: i64 = persistence
        .persist_ride_transition(&result)
        .map_err(translate_persistence_error)?;
    let mut ride: Ride = result.new_state;
    ride.ride_id = Some(ride_id);

    info!(ride_id, car_id = ride.car_id, rider_id = ride.rider_id, "Ride requested");
    present_ride(&ride, now, None)
}

/// Edits a pending booking. Only the booking rider may.
///
/// A new date range is paired with the stored time range and vice versa.
///
/// # Errors
///
/// Returns an error if:
/// - The ride does not exist or belongs to someone else
/// - The ride is no longer pending
/// - Nothing was supplied, or a supplied part is invalid
pub fn update_ride(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    ride_id: i64,
    request: &UpdateRideRequest,
    now: PrimitiveDateTime,
) -> Result<RideInfo, ApiError> {
    let ride: Ride = load_ride(persistence, ride_id)?;
    AuthorizationService::authorize_edit_ride(actor, &ride)?;

    let route: Option<Route> = request
        .location
        .as_ref()
        .map(LocationDto::to_route)
        .transpose()
        .map_err(translate_domain_error)?;
    let date: Option<DateRange> = request
        .date
        .as_ref()
        .map(DateRangeDto::to_range)
        .transpose()
        .map_err(translate_domain_error)?;
    let time: Option<TimeRange> = request
        .time
        .as_ref()
        .map(TimeRangeDto::to_range)
        .transpose()
        .map_err(translate_domain_error)?;
    let schedule: Option<Schedule> = match (date, time) {
        (None, None) => None,
        (date, time) => Some(Schedule::new(
            date.unwrap_or(ride.schedule.date),
            time.unwrap_or(ride.schedule.time),
        )),
    };

    let car: Car = persistence
        .get_car(ride.car_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| not_found("Car", ride.car_id))?;
    let context: RideContext<'_> = RideContext {
        car: &car,
        rider_kyc: None,
        approved_rides: &[],
    };
    let result: TransitionResult<Ride> = apply_ride(
        &context,
        Some(&ride),
        RideCommand::Update { route, schedule },
        actor.to_audit_actor(),
    )
    .map_err(translate_core_error)?;

    persistence
        .persist_ride_transition(&result)
        .map_err(translate_persistence_error)?;
    if !result.is_noop() {
        info!(ride_id, "Ride updated");
    }

    let decided: Option<String> = decided_at(persistence, ride_id)?;
    present_ride(&result.new_state, now, decided)
}

/// Records an admin decision on a ride: `approve`, `reject` or `pending`.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not an admin
/// - The status is unknown or the transition is not allowed
/// - Approving a ride whose car is not bookable
/// - Approving would overlap another approved ride of the same car
pub fn decide_ride(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    ride_id: i64,
    request: &StatusRequest,
    now: PrimitiveDateTime,
) -> Result<RideInfo, ApiError> {
    AuthorizationService::require_admin(actor, "decide ride")?;
    let status: RideStatus = request.status.parse().map_err(translate_domain_error)?;
    let ride: Ride = load_ride(persistence, ride_id)?;

    let car: Car = persistence
        .get_car(ride.car_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| not_found("Car", ride.car_id))?;
    let approved_rides: Vec<Ride> = persistence
        .list_rides(&RideFilter {
            car_id: Some(ride.car_id),
            status: Some(RideStatus::Approve),
            ..RideFilter::default()
        })
        .map_err(translate_persistence_error)?;

    let context: RideContext<'_> = RideContext {
        car: &car,
        rider_kyc: None,
        approved_rides: &approved_rides,
    };
    let result: TransitionResult<Ride> = apply_ride(
        &context,
        Some(&ride),
        RideCommand::Decide { status },
        actor.to_audit_actor(),
    )
    .map_err(translate_core_error)?;

    persistence
        .persist_ride_transition(&result)
        .map_err(translate_persistence_error)?;
    if !result.is_noop() {
        info!(
            ride_id,
            car_id = ride.car_id,
            from = ride.status.as_str(),
            to = status.as_str(),
            "Ride decided"
        );
    }

    let decided: Option<String> = decided_at(persistence, ride_id)?;
    present_ride(&result.new_state, now, decided)
}

/// Retrieves a ride for its rider or an admin.
///
/// # Errors
///
/// Returns an error if the ride does not exist or the caller may not see it.
pub fn get_ride(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    ride_id: i64,
    now: PrimitiveDateTime,
) -> Result<RideInfo, ApiError> {
    let ride: Ride = load_ride(persistence, ride_id)?;
    AuthorizationService::authorize_view_ride(actor, &ride)?;

    let decided: Option<String> = decided_at(persistence, ride_id)?;
    present_ride(&ride, now, decided)
}

/// Lists rides. Riders see their own; admins see all and may filter by
/// rider.
///
/// Status filters apply to the presented status, so `ongoing` and
/// `approve` split the stored `approve` rows by the current clock. Paging
/// happens after that split.
///
/// # Errors
///
/// Returns an error if the caller is a fleet owner, or a filter or the page
/// is invalid.
pub fn list_rides(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    query: &RideQuery,
    now: PrimitiveDateTime,
) -> Result<PagedResponse<RideInfo>, ApiError> {
    let rider_id: Option<i64> = match actor.role {
        Role::Admin => query.rider_id,
        Role::Rider => Some(actor.user_id),
        Role::FleetOwner => {
            return Err(ApiError::Unauthorized {
                action: String::from("list rides"),
                reason: String::from("rider or admin role required"),
            });
        }
    };
    let page: Page = page_of(query.page, query.page_size)?;
    let presented: Option<PresentedRideStatus> = query
        .status
        .as_deref()
        .map(str::parse)
        .transpose()
        .map_err(translate_domain_error)?;

    let rides: Vec<Ride> = persistence
        .list_rides(&RideFilter {
            car_id: query.car_id,
            rider_id,
            status: presented.map(|status| status.stored()),
            from_date: parse_optional_date(query.date_from.as_deref())?,
            to_date: parse_optional_date(query.date_to.as_deref())?,
        })
        .map_err(translate_persistence_error)?;

    let matching: Vec<Ride> = rides
        .into_iter()
        .filter(|ride| presented.is_none_or(|wanted| ride.presented_status(now) == wanted))
        .collect();
    let paged: Paged<Ride> = page.slice(matching);

    let mut items: Vec<RideInfo> = Vec::with_capacity(paged.items.len());
    for ride in &paged.items {
        let decided: Option<String> = match ride.ride_id {
            Some(ride_id) => decided_at(persistence, ride_id)?,
            None => None,
        };
        items.push(present_ride(ride, now, decided)?);
    }

    Ok(PagedResponse {
        items,
        page: paged.page,
        page_size: paged.page_size,
        total: paged.total,
    })
}
