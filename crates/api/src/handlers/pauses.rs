// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Pause request handlers.
//!
//! An approved pause keeps its car unavailable until the window ends. There
//! is no expiry job; availability is derived from the window on every read.

use carhive::{PauseCommand, PauseContext, TransitionResult, apply_pause};
use carhive_domain::{
    Car, DateRange, Page, Paged, PauseRequest, PauseStatus, Schedule, TimeRange, parse_date,
};
use carhive_persistence::{PauseFilter, Persistence};
use time::Date;
use tracing::info;

use super::{load_live_car, not_found, page_of, present_pause};
use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
use crate::request_response::{
    CreatePauseRequest, DecidePauseRequest, PagedResponse, PauseInfo, PauseQuery,
};

fn load_pause(persistence: &mut Persistence, pause_id: i64) -> Result<PauseRequest, ApiError> {
    persistence
        .get_pause(pause_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| not_found("Pause request", pause_id))
}

/// Requests a pause for a car.
///
/// Admin requests are approved on creation; fleet-owner requests wait for
/// review.
///
/// # Errors
///
/// Returns an error if:
/// - The car does not exist or is deleted
/// - The actor neither administers nor owns the car
/// - The reason is blank or the window is invalid
pub fn create_pause(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request: &CreatePauseRequest,
) -> Result<PauseInfo, ApiError> {
    let car: Car = load_live_car(persistence, request.car_id)?;
    AuthorizationService::authorize_manage_car(actor, &car, "pause car")?;

    let date: DateRange = request.date.to_range().map_err(translate_domain_error)?;
    let time: TimeRange = request.time.to_range().map_err(translate_domain_error)?;

    let result: TransitionResult<PauseRequest> = apply_pause(
        &PauseContext { car: &car },
        None,
        PauseCommand::Request {
            car_id: request.car_id,
            reason: request.reason.clone(),
            schedule: Schedule::new(date, time),
            note: request.additional_note.clone(),
        },
        actor.to_audit_actor(),
    )
    .map_err(translate_core_error)?;

    let pause_id: i64 = persistence
        .persist_pause_transition(&result)
        .map_err(translate_persistence_error)?;
    let mut pause: PauseRequest = result.new_state;
    pause.pause_id = Some(pause_id);

    info!(
        pause_id,
        car_id = pause.car_id,
        status = pause.status.as_str(),
        "Pause requested"
    );
    present_pause(&pause)
}

/// Records an admin decision on a pause. Without a status the pause is
/// approved.
///
/// # Errors
///
/// Returns an error if the actor is not an admin, the pause or its car
/// does not exist, the car is deleted, or the transition is not allowed.
pub fn decide_pause(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    pause_id: i64,
    request: &DecidePauseRequest,
) -> Result<PauseInfo, ApiError> {
    AuthorizationService::require_admin(actor, "decide pause")?;
    let status: PauseStatus = request
        .status
        .as_deref()
        .map_or(Ok(PauseStatus::Approved), str::parse)
        .map_err(translate_domain_error)?;
    let pause: PauseRequest = load_pause(persistence, pause_id)?;
    let car: Car = load_live_car(persistence, pause.car_id)?;

    let result: TransitionResult<PauseRequest> = apply_pause(
        &PauseContext { car: &car },
        Some(&pause),
        PauseCommand::Decide { status },
        actor.to_audit_actor(),
    )
    .map_err(translate_core_error)?;

    persistence
        .persist_pause_transition(&result)
        .map_err(translate_persistence_error)?;
    if !result.is_noop() {
        info!(pause_id, to = status.as_str(), "Pause decided");
    }
    present_pause(&result.new_state)
}

/// Retrieves a pause for an admin or the owner of its car.
///
/// # Errors
///
/// Returns an error if the pause does not exist, its car is deleted, or the
/// caller may not see it.
pub fn get_pause(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    pause_id: i64,
) -> Result<PauseInfo, ApiError> {
    let pause: PauseRequest = load_pause(persistence, pause_id)?;
    let car: Car = load_live_car(persistence, pause.car_id)?;
    AuthorizationService::authorize_manage_car(actor, &car, "view pause")?;
    present_pause(&pause)
}

/// Lists pauses. Fleet owners see pauses of their own cars only.
///
/// # Errors
///
/// Returns an error if the caller is a rider, or a filter or the page is
/// invalid.
pub fn list_pauses(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    query: &PauseQuery,
) -> Result<PagedResponse<PauseInfo>, ApiError> {
    AuthorizationService::authorize_list_cars_for_rent(actor, "list pauses")?;
    let page: Page = page_of(query.page, query.page_size)?;

    let status: Option<PauseStatus> = query
        .status
        .as_deref()
        .map(str::parse)
        .transpose()
        .map_err(translate_domain_error)?;
    let from_date: Option<Date> = query
        .from_date
        .as_deref()
        .map(parse_date)
        .transpose()
        .map_err(translate_domain_error)?;
    let to_date: Option<Date> = query
        .to_date
        .as_deref()
        .map(parse_date)
        .transpose()
        .map_err(translate_domain_error)?;

    let pauses: Vec<PauseRequest> = persistence
        .list_pauses(&PauseFilter {
            car_id: query.car_id,
            owner_id: (!actor.is_admin()).then_some(actor.user_id),
            status,
            from_date,
            to_date,
        })
        .map_err(translate_persistence_error)?;

    let paged: Paged<PauseRequest> = page.slice(pauses);
    let mut items: Vec<PauseInfo> = Vec::with_capacity(paged.items.len());
    for pause in &paged.items {
        items.push(present_pause(pause)?);
    }
    Ok(PagedResponse {
        items,
        page: paged.page,
        page_size: paged.page_size,
        total: paged.total,
    })
}
