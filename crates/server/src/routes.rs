// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Route handlers.
//!
//! Each handler resolves the caller, takes the marketplace clock when the
//! workflow needs it, locks persistence for the whole operation and wraps
//! the result in the response envelope.

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    routing::{delete, get, patch, post, put},
};
use carhive_api::{
    AuditEventInfo, CarInfo, CarQuery, CreateListingRequest, CreatePauseRequest,
    CreateRatingRequest, CreateRideRequest, DecidePauseRequest, FleetOwnerKycRequest,
    KycDecisionRequest, KycInfo, KycQuery, ListRatingsResponse, ListingInfo, ListingQuery,
    LoginRequest, LoginResponse, PagedResponse, PauseInfo, PauseQuery, RatingInfo, RatingQuery,
    RegisterRequest, RideInfo, RideQuery, RiderKycRequest, SetAvailabilityRequest,
    SetListingPriceRequest, StatusRequest, SubmitCarRequest, UpdateCarRequest, UpdateRideRequest,
    UserInfo, UserQuery, translate_domain_error,
};
use carhive_domain::{CarAction, KycDraft, KycKind};
use serde::Serialize;
use time::PrimitiveDateTime;
use tracing::info;

use crate::AppState;
use crate::envelope::{Reply, created, ok};
use crate::error::HttpError;
use crate::session::SessionActor;

type Handled<T> = Result<Reply<T>, HttpError>;

fn parse_kind(kind: &str) -> Result<KycKind, HttpError> {
    kind.parse()
        .map_err(|e| HttpError::from(translate_domain_error(e)))
}

// ============================================================================
// Health and identity
// ============================================================================

#[derive(Debug, Clone, Serialize)]
struct Health {
    status: &'static str,
}

async fn handle_health() -> Reply<Health> {
    ok("Service is healthy", Health { status: "ok" })
}

async fn handle_register(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Handled<UserInfo> {
    info!(email = %req.email, role = %req.role, "Handling register request");
    let mut persistence = app_state.persistence.lock().await;
    let user: UserInfo = carhive_api::register(&mut persistence, &req)?;
    Ok(created("Registered successfully", user))
}

async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<LoginRequest>,
) -> Handled<LoginResponse> {
    let mut persistence = app_state.persistence.lock().await;
    let response: LoginResponse =
        carhive_api::login(&mut persistence, &req, app_state.session_ttl)?;
    Ok(ok("Logged in", response))
}

async fn handle_logout(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(_, token): SessionActor,
) -> Handled<()> {
    let mut persistence = app_state.persistence.lock().await;
    carhive_api::logout(&mut persistence, &token)?;
    Ok(ok("Logged out", ()))
}

async fn handle_whoami(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
) -> Handled<UserInfo> {
    let mut persistence = app_state.persistence.lock().await;
    let user: UserInfo = carhive_api::whoami(&mut persistence, &actor)?;
    Ok(ok("Current identity", user))
}

async fn handle_list_users(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Query(query): Query<UserQuery>,
) -> Handled<Vec<UserInfo>> {
    let mut persistence = app_state.persistence.lock().await;
    let users: Vec<UserInfo> = carhive_api::list_users(&mut persistence, &actor, &query)?;
    Ok(ok("Users", users))
}

// ============================================================================
// Cars
// ============================================================================

async fn handle_submit_car(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Json(req): Json<SubmitCarRequest>,
) -> Handled<CarInfo> {
    let now: PrimitiveDateTime = app_state.now()?;
    let mut persistence = app_state.persistence.lock().await;
    let car: CarInfo = carhive_api::submit_car(&mut persistence, &actor, &req, now)?;
    Ok(created("Car submitted for review", car))
}

async fn handle_list_cars(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Query(query): Query<CarQuery>,
) -> Handled<PagedResponse<CarInfo>> {
    let now: PrimitiveDateTime = app_state.now()?;
    let mut persistence = app_state.persistence.lock().await;
    let cars: PagedResponse<CarInfo> =
        carhive_api::list_cars(&mut persistence, &actor, &query, now)?;
    Ok(ok("Cars", cars))
}

async fn handle_get_car(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Path(car_id): Path<i64>,
) -> Handled<CarInfo> {
    let now: PrimitiveDateTime = app_state.now()?;
    let mut persistence = app_state.persistence.lock().await;
    let car: CarInfo = carhive_api::get_car(&mut persistence, &actor, car_id, now)?;
    Ok(ok("Car", car))
}

async fn handle_update_car(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Path(car_id): Path<i64>,
    Json(req): Json<UpdateCarRequest>,
) -> Handled<CarInfo> {
    let now: PrimitiveDateTime = app_state.now()?;
    let mut persistence = app_state.persistence.lock().await;
    let car: CarInfo = carhive_api::update_car(&mut persistence, &actor, car_id, &req, now)?;
    Ok(ok("Car updated", car))
}

async fn handle_delete_car(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Path(car_id): Path<i64>,
) -> Handled<CarInfo> {
    let now: PrimitiveDateTime = app_state.now()?;
    let mut persistence = app_state.persistence.lock().await;
    let car: CarInfo = carhive_api::delete_car(&mut persistence, &actor, car_id, now)?;
    Ok(ok("Car deleted", car))
}

async fn apply_car_decision(
    app_state: &AppState,
    SessionActor(actor, _): SessionActor,
    car_id: i64,
    action: CarAction,
) -> Handled<CarInfo> {
    let now: PrimitiveDateTime = app_state.now()?;
    let mut persistence = app_state.persistence.lock().await;
    let car: CarInfo = carhive_api::decide_car(&mut persistence, &actor, car_id, action, now)?;
    Ok(ok("Car status updated", car))
}

async fn handle_approve_car(
    AxumState(app_state): AxumState<AppState>,
    actor: SessionActor,
    Path(car_id): Path<i64>,
) -> Handled<CarInfo> {
    apply_car_decision(&app_state, actor, car_id, CarAction::Approve).await
}

async fn handle_reject_car(
    AxumState(app_state): AxumState<AppState>,
    actor: SessionActor,
    Path(car_id): Path<i64>,
) -> Handled<CarInfo> {
    apply_car_decision(&app_state, actor, car_id, CarAction::Reject).await
}

async fn handle_block_car(
    AxumState(app_state): AxumState<AppState>,
    actor: SessionActor,
    Path(car_id): Path<i64>,
) -> Handled<CarInfo> {
    apply_car_decision(&app_state, actor, car_id, CarAction::Block).await
}

async fn handle_set_car_status(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Path(car_id): Path<i64>,
    Json(req): Json<StatusRequest>,
) -> Handled<CarInfo> {
    let now: PrimitiveDateTime = app_state.now()?;
    let mut persistence = app_state.persistence.lock().await;
    let car: CarInfo = carhive_api::set_car_status(&mut persistence, &actor, car_id, &req, now)?;
    Ok(ok("Car status updated", car))
}

async fn handle_set_car_availability(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Path(car_id): Path<i64>,
    Json(req): Json<SetAvailabilityRequest>,
) -> Handled<CarInfo> {
    let now: PrimitiveDateTime = app_state.now()?;
    let mut persistence = app_state.persistence.lock().await;
    let car: CarInfo =
        carhive_api::set_car_availability(&mut persistence, &actor, car_id, &req, now)?;
    Ok(ok("Car availability updated", car))
}

// ============================================================================
// Rides
// ============================================================================

async fn handle_create_ride(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Json(req): Json<CreateRideRequest>,
) -> Handled<RideInfo> {
    let now: PrimitiveDateTime = app_state.now()?;
    let mut persistence = app_state.persistence.lock().await;
    let ride: RideInfo = carhive_api::create_ride(&mut persistence, &actor, &req, now)?;
    Ok(created("Ride requested", ride))
}

async fn handle_list_rides(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Query(query): Query<RideQuery>,
) -> Handled<PagedResponse<RideInfo>> {
    let now: PrimitiveDateTime = app_state.now()?;
    let mut persistence = app_state.persistence.lock().await;
    let rides: PagedResponse<RideInfo> =
        carhive_api::list_rides(&mut persistence, &actor, &query, now)?;
    Ok(ok("Rides", rides))
}

async fn handle_get_ride(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Path(ride_id): Path<i64>,
) -> Handled<RideInfo> {
    let now: PrimitiveDateTime = app_state.now()?;
    let mut persistence = app_state.persistence.lock().await;
    let ride: RideInfo = carhive_api::get_ride(&mut persistence, &actor, ride_id, now)?;
    Ok(ok("Ride", ride))
}

async fn handle_update_ride(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Path(ride_id): Path<i64>,
    Json(req): Json<UpdateRideRequest>,
) -> Handled<RideInfo> {
    let now: PrimitiveDateTime = app_state.now()?;
    let mut persistence = app_state.persistence.lock().await;
    let ride: RideInfo = carhive_api::update_ride(&mut persistence, &actor, ride_id, &req, now)?;
    Ok(ok("Ride updated", ride))
}

async fn handle_decide_ride(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Path(ride_id): Path<i64>,
    Json(req): Json<StatusRequest>,
) -> Handled<RideInfo> {
    let now: PrimitiveDateTime = app_state.now()?;
    let mut persistence = app_state.persistence.lock().await;
    let ride: RideInfo = carhive_api::decide_ride(&mut persistence, &actor, ride_id, &req, now)?;
    Ok(ok("Ride status updated", ride))
}

// ============================================================================
// Pauses
// ============================================================================

async fn handle_create_pause(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Json(req): Json<CreatePauseRequest>,
) -> Handled<PauseInfo> {
    let mut persistence = app_state.persistence.lock().await;
    let pause: PauseInfo = carhive_api::create_pause(&mut persistence, &actor, &req)?;
    Ok(created("Pause requested", pause))
}

async fn handle_list_pauses(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Query(query): Query<PauseQuery>,
) -> Handled<PagedResponse<PauseInfo>> {
    let mut persistence = app_state.persistence.lock().await;
    let pauses: PagedResponse<PauseInfo> =
        carhive_api::list_pauses(&mut persistence, &actor, &query)?;
    Ok(ok("Pause requests", pauses))
}

async fn handle_get_pause(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Path(pause_id): Path<i64>,
) -> Handled<PauseInfo> {
    let mut persistence = app_state.persistence.lock().await;
    let pause: PauseInfo = carhive_api::get_pause(&mut persistence, &actor, pause_id)?;
    Ok(ok("Pause request", pause))
}

/// The body may be `{}`; an absent status approves.
async fn handle_decide_pause(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Path(pause_id): Path<i64>,
    Json(req): Json<DecidePauseRequest>,
) -> Handled<PauseInfo> {
    let mut persistence = app_state.persistence.lock().await;
    let pause: PauseInfo = carhive_api::decide_pause(&mut persistence, &actor, pause_id, &req)?;
    Ok(ok("Pause request decided", pause))
}

// ============================================================================
// KYC
// ============================================================================

async fn handle_submit_rider_kyc(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Json(req): Json<RiderKycRequest>,
) -> Handled<KycInfo> {
    let mut persistence = app_state.persistence.lock().await;
    let kyc: KycInfo =
        carhive_api::submit_kyc(&mut persistence, &actor, KycDraft::Rider(req.into()))?;
    Ok(created("KYC submitted", kyc))
}

async fn handle_submit_fleet_owner_kyc(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Json(req): Json<FleetOwnerKycRequest>,
) -> Handled<KycInfo> {
    let mut persistence = app_state.persistence.lock().await;
    let kyc: KycInfo =
        carhive_api::submit_kyc(&mut persistence, &actor, KycDraft::FleetOwner(req.into()))?;
    Ok(created("KYC submitted", kyc))
}

async fn handle_get_my_rider_kyc(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
) -> Handled<KycInfo> {
    let mut persistence = app_state.persistence.lock().await;
    let kyc: KycInfo = carhive_api::get_my_kyc(&mut persistence, &actor, KycKind::Rider)?;
    Ok(ok("KYC", kyc))
}

async fn handle_get_my_fleet_owner_kyc(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
) -> Handled<KycInfo> {
    let mut persistence = app_state.persistence.lock().await;
    let kyc: KycInfo = carhive_api::get_my_kyc(&mut persistence, &actor, KycKind::FleetOwner)?;
    Ok(ok("KYC", kyc))
}

async fn handle_update_my_rider_kyc(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Json(req): Json<RiderKycRequest>,
) -> Handled<KycInfo> {
    let mut persistence = app_state.persistence.lock().await;
    let kyc: KycInfo =
        carhive_api::update_my_kyc(&mut persistence, &actor, KycDraft::Rider(req.into()))?;
    Ok(ok("KYC updated", kyc))
}

async fn handle_update_my_fleet_owner_kyc(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Json(req): Json<FleetOwnerKycRequest>,
) -> Handled<KycInfo> {
    let mut persistence = app_state.persistence.lock().await;
    let kyc: KycInfo =
        carhive_api::update_my_kyc(&mut persistence, &actor, KycDraft::FleetOwner(req.into()))?;
    Ok(ok("KYC updated", kyc))
}

async fn handle_list_kyc(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Path(kind): Path<String>,
    Query(query): Query<KycQuery>,
) -> Handled<PagedResponse<KycInfo>> {
    let kind: KycKind = parse_kind(&kind)?;
    let mut persistence = app_state.persistence.lock().await;
    let records: PagedResponse<KycInfo> =
        carhive_api::list_kyc(&mut persistence, &actor, kind, &query)?;
    Ok(ok("KYC records", records))
}

async fn handle_get_kyc(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Path((kind, kyc_id)): Path<(String, i64)>,
) -> Handled<KycInfo> {
    let kind: KycKind = parse_kind(&kind)?;
    let mut persistence = app_state.persistence.lock().await;
    let kyc: KycInfo = carhive_api::get_kyc(&mut persistence, &actor, kind, kyc_id)?;
    Ok(ok("KYC", kyc))
}

async fn handle_decide_kyc(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Path((kind, kyc_id)): Path<(String, i64)>,
    Json(req): Json<KycDecisionRequest>,
) -> Handled<KycInfo> {
    let kind: KycKind = parse_kind(&kind)?;
    let mut persistence = app_state.persistence.lock().await;
    let kyc: KycInfo = carhive_api::decide_kyc(&mut persistence, &actor, kind, kyc_id, &req)?;
    Ok(ok("KYC status updated", kyc))
}

async fn handle_delete_kyc(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Path((kind, kyc_id)): Path<(String, i64)>,
) -> Handled<()> {
    let kind: KycKind = parse_kind(&kind)?;
    let mut persistence = app_state.persistence.lock().await;
    carhive_api::delete_kyc(&mut persistence, &actor, kind, kyc_id)?;
    Ok(ok("KYC deleted", ()))
}

// ============================================================================
// Listings, ratings, audit
// ============================================================================

async fn handle_create_listing(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Json(req): Json<CreateListingRequest>,
) -> Handled<ListingInfo> {
    let now: PrimitiveDateTime = app_state.now()?;
    let mut persistence = app_state.persistence.lock().await;
    let listing: ListingInfo = carhive_api::create_listing(&mut persistence, &actor, &req, now)?;
    Ok(created("Car listed", listing))
}

async fn handle_search_listings(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Query(query): Query<ListingQuery>,
) -> Handled<PagedResponse<ListingInfo>> {
    let now: PrimitiveDateTime = app_state.now()?;
    let mut persistence = app_state.persistence.lock().await;
    let listings: PagedResponse<ListingInfo> =
        carhive_api::search_listings(&mut persistence, &actor, &query, now)?;
    Ok(ok("Listings", listings))
}

async fn handle_set_listing_price(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Path(listing_id): Path<i64>,
    Json(req): Json<SetListingPriceRequest>,
) -> Handled<ListingInfo> {
    let now: PrimitiveDateTime = app_state.now()?;
    let mut persistence = app_state.persistence.lock().await;
    let listing: ListingInfo =
        carhive_api::set_listing_price(&mut persistence, &actor, listing_id, &req, now)?;
    Ok(ok("Listing price updated", listing))
}

async fn handle_create_rating(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Json(req): Json<CreateRatingRequest>,
) -> Handled<RatingInfo> {
    let mut persistence = app_state.persistence.lock().await;
    let rating: RatingInfo = carhive_api::create_rating(&mut persistence, &actor, &req)?;
    Ok(created("Rating recorded", rating))
}

async fn handle_list_ratings(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(_, _): SessionActor,
    Query(query): Query<RatingQuery>,
) -> Handled<ListRatingsResponse> {
    let mut persistence = app_state.persistence.lock().await;
    let ratings: ListRatingsResponse = carhive_api::list_ratings(&mut persistence, &query)?;
    Ok(ok("Ratings", ratings))
}

async fn handle_delete_rating(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Path(rating_id): Path<i64>,
) -> Handled<()> {
    let mut persistence = app_state.persistence.lock().await;
    carhive_api::delete_rating(&mut persistence, &actor, rating_id)?;
    Ok(ok("Rating deleted", ()))
}

async fn handle_audit_trail(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Path((kind, entity_id)): Path<(String, i64)>,
) -> Handled<Vec<AuditEventInfo>> {
    let mut persistence = app_state.persistence.lock().await;
    let events: Vec<AuditEventInfo> =
        carhive_api::list_audit_events(&mut persistence, &actor, &kind, entity_id)?;
    Ok(ok("Audit trail", events))
}

/// Builds the application router.
pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/auth/register", post(handle_register))
        .route("/auth/login", post(handle_login))
        .route("/auth/logout", post(handle_logout))
        .route("/auth/me", get(handle_whoami))
        .route("/users", get(handle_list_users))
        .route("/car", post(handle_submit_car).get(handle_list_cars))
        .route(
            "/car/{id}",
            get(handle_get_car)
                .put(handle_update_car)
                .delete(handle_delete_car),
        )
        .route("/car/{id}/approve", put(handle_approve_car))
        .route("/car/{id}/reject", put(handle_reject_car))
        .route("/car/{id}/block", put(handle_block_car))
        .route("/car/{id}/status", put(handle_set_car_status))
        .route("/car/{id}/availability", put(handle_set_car_availability))
        .route("/ride", post(handle_create_ride).get(handle_list_rides))
        .route("/ride/{id}", get(handle_get_ride).put(handle_update_ride))
        .route("/ride/{id}/status", patch(handle_decide_ride))
        .route("/pausecar", post(handle_create_pause).get(handle_list_pauses))
        .route("/pausecar/{id}", get(handle_get_pause))
        .route("/pausecar/{id}/approve", patch(handle_decide_pause))
        .route("/kyc/rider/submit", post(handle_submit_rider_kyc))
        .route("/kyc/fleetowner/submit", post(handle_submit_fleet_owner_kyc))
        .route(
            "/kyc/rider/me",
            get(handle_get_my_rider_kyc).put(handle_update_my_rider_kyc),
        )
        .route(
            "/kyc/fleetowner/me",
            get(handle_get_my_fleet_owner_kyc).put(handle_update_my_fleet_owner_kyc),
        )
        .route("/kyc/{kind}", get(handle_list_kyc))
        .route("/kyc/{kind}/{id}", get(handle_get_kyc).delete(handle_delete_kyc))
        .route("/kyc/{kind}/{id}/status", put(handle_decide_kyc))
        .route("/carlist", post(handle_create_listing).get(handle_search_listings))
        .route("/carlist/{id}/price", put(handle_set_listing_price))
        .route("/rating", post(handle_create_rating).get(handle_list_ratings))
        .route("/rating/{id}", delete(handle_delete_rating))
        .route("/audit/{kind}/{id}", get(handle_audit_trail))
        .with_state(app_state)
}
