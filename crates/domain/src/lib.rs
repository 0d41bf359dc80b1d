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

mod availability;
mod car;
mod error;
mod geo;
mod kyc;
mod listing;
mod market_time;
mod pagination;
mod pause;
mod rating;
mod ride;
mod schedule;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use availability::{AvailabilityInputs, compute_availability};
pub use car::{
    AvailabilityHold, AvailabilityStatus, Car, CarAction, CarDetails, CarDocuments, CarDraft,
    CarPatch, Category, Fuel, PublicationStatus, Transmission,
};
pub use error::DomainError;
pub use geo::{GeoPoint, Route};
pub use kyc::{
    APPROVED_EDITABLE_FIELDS, FleetOwnerKycDraft, FleetOwnerKycProfile, KycDraft, KycKind,
    KycProfile, KycRecord, KycStatus, RiderKycDraft, RiderKycProfile,
};
pub use listing::{CarListing, ListingSort};
pub use market_time::{parse_timezone, to_market_local};
pub use pagination::{MAX_PAGE_SIZE, Page, Paged};
pub use pause::{PauseRequest, PauseStatus};
pub use rating::{Rating, average_rate};
pub use ride::{PresentedRideStatus, Ride, RideStatus};
pub use schedule::{
    DateRange, Schedule, TimeRange, format_date, format_time, parse_date, parse_time,
};
pub use types::{Role, User};
pub use validation::{
    MAX_CAR_IMAGES, MIN_CAR_IMAGES, normalize_optional, normalize_registration_number,
    validate_email, validate_images, validate_model_year, validate_non_negative,
    validate_required, validate_seats, validate_url,
};

/// Re-exported so callers name the marketplace timezone without a direct
/// `chrono-tz` dependency.
pub use chrono_tz::Tz;
