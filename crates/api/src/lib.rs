// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

//! API boundary for the carhive marketplace.
//!
//! This crate sits between the HTTP server and the workflow core. It
//! authenticates sessions, authorizes each request by role, turns request
//! DTOs into domain commands, persists transitions together with their
//! audit events, and translates every lower-layer error into [`ApiError`].
//!
//! Nothing here speaks HTTP. The server maps [`ApiError`] variants to
//! status codes.

mod auth;
mod error;
mod handlers;
mod password_policy;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthenticationService, AuthorizationService};
pub use error::{
    ApiError, AuthError, translate_core_error, translate_domain_error, translate_persistence_error,
};
pub use handlers::audit::list_audit_events;
pub use handlers::cars::{
    decide_car, delete_car, get_car, list_cars, set_car_availability, set_car_status, submit_car,
    update_car,
};
pub use handlers::kyc::{
    decide_kyc, delete_kyc, get_kyc, get_my_kyc, list_kyc, submit_kyc, update_my_kyc,
};
pub use handlers::listings::{create_listing, search_listings, set_listing_price};
pub use handlers::pauses::{create_pause, decide_pause, get_pause, list_pauses};
pub use handlers::ratings::{create_rating, delete_rating, list_ratings};
pub use handlers::rides::{create_ride, decide_ride, get_ride, list_rides, update_ride};
pub use handlers::users::{bootstrap_admin, list_users, login, logout, register, whoami};
pub use password_policy::{PasswordPolicy, PasswordPolicyError};
pub use request_response::{
    AuditEventInfo, CarInfo, CarQuery, CreateListingRequest, CreatePauseRequest,
    CreateRatingRequest, CreateRideRequest, DateRangeDto, DecidePauseRequest, FleetOwnerKycInfo,
    FleetOwnerKycRequest, GeoPointDto, KycDecisionRequest, KycDetailsInfo, KycInfo, KycQuery,
    ListRatingsResponse, ListingInfo, ListingQuery, LocationDto, LoginRequest, LoginResponse,
    PageQuery, PagedResponse, PauseInfo, PauseQuery, RatingInfo, RatingQuery, RegisterRequest,
    RideInfo, RideQuery, RiderKycInfo, RiderKycRequest, SetAvailabilityRequest,
    SetListingPriceRequest, StatusRequest, SubmitCarRequest, TimeRangeDto, UpdateCarRequest,
    UpdateRideRequest, UserInfo, UserQuery,
};
