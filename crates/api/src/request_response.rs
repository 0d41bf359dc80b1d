// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Field names are camelCase on the wire. Request types hold raw values;
//! validation happens when they are converted into domain drafts.

use carhive_domain::{
    CarDraft, CarPatch, DateRange, DomainError, FleetOwnerKycDraft, GeoPoint, Paged,
    RiderKycDraft, Route, TimeRange,
};
use serde::{Deserialize, Serialize};

// ============================================================================
// Shared
// ============================================================================

/// A `{longitude, latitude}` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPointDto {
    pub longitude: f64,
    pub latitude: f64,
}

/// Pickup and drop-off points of a ride.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationDto {
    pub from: GeoPointDto,
    pub to: GeoPointDto,
}

impl LocationDto {
    /// # Errors
    ///
    /// Returns an error if a coordinate is out of range.
    pub fn to_route(&self) -> Result<Route, DomainError> {
        Ok(Route::new(
            GeoPoint::new(self.from.longitude, self.from.latitude)?,
            GeoPoint::new(self.to.longitude, self.to.latitude)?,
        ))
    }

    #[must_use]
    pub const fn from_route(route: &Route) -> Self {
        Self {
            from: GeoPointDto {
                longitude: route.from.longitude,
                latitude: route.from.latitude,
            },
            to: GeoPointDto {
                longitude: route.to.longitude,
                latitude: route.to.latitude,
            },
        }
    }
}

/// A `{from, to}` pair of `YYYY-MM-DD` dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRangeDto {
    pub from: String,
    pub to: String,
}

impl DateRangeDto {
    /// # Errors
    ///
    /// Returns an error if a date is malformed or the range is inverted.
    pub fn to_range(&self) -> Result<DateRange, DomainError> {
        DateRange::parse(&self.from, &self.to)
    }
}

/// A `{from, to}` pair of `HH:MM` times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRangeDto {
    pub from: String,
    pub to: String,
}

impl TimeRangeDto {
    /// # Errors
    ///
    /// Returns an error if a time is malformed or `from` is not before `to`.
    pub fn to_range(&self) -> Result<TimeRange, DomainError> {
        TimeRange::parse(&self.from, &self.to)
    }
}

/// Paging query parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResponse<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total: usize,
}

impl<T> From<Paged<T>> for PagedResponse<T> {
    fn from(paged: Paged<T>) -> Self {
        Self {
            items: paged.items,
            page: paged.page,
            page_size: paged.page_size,
            total: paged.total,
        }
    }
}

// ============================================================================
// Identity
// ============================================================================

/// API request to register a rider or fleet owner.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    /// Any casing of `rider` or `fleetowner`.
    pub role: String,
}

/// API request to log in.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// An identity as shown to callers. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: String,
}

/// API response for a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: String,
    pub user: UserInfo,
}

/// Query for the admin identity listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserQuery {
    pub role: Option<String>,
}

// ============================================================================
// Cars
// ============================================================================

/// API request to submit a car.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubmitCarRequest {
    pub name: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub color: String,
    pub registration_number: String,
    pub category: String,
    pub transmission: String,
    pub fuel: String,
    pub seats: i64,
    pub hourly_rate: i64,
    pub price_per_day: i64,
    pub km_per_hour: i64,
    pub images: Vec<String>,
    pub video: Option<String>,
    pub insurance: Option<String>,
    pub pollution: Option<String>,
    pub tax: Option<String>,
    pub registration_book: Option<String>,
    /// Admin only: the fleet owner the car belongs to.
    pub owner_id: Option<i64>,
}

impl SubmitCarRequest {
    #[must_use]
    pub fn to_draft(&self) -> CarDraft {
        CarDraft {
            name: self.name.clone(),
            brand: self.brand.clone(),
            model: self.model.clone(),
            year: self.year,
            color: self.color.clone(),
            registration_number: self.registration_number.clone(),
            category: self.category.clone(),
            transmission: self.transmission.clone(),
            fuel: self.fuel.clone(),
            seats: self.seats,
            hourly_rate: self.hourly_rate,
            price_per_day: self.price_per_day,
            km_per_hour: self.km_per_hour,
            images: self.images.clone(),
            video: self.video.clone(),
            insurance: self.insurance.clone(),
            pollution: self.pollution.clone(),
            tax: self.tax.clone(),
            registration_book: self.registration_book.clone(),
        }
    }
}

/// API request to edit a car. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateCarRequest {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub color: Option<String>,
    pub registration_number: Option<String>,
    pub category: Option<String>,
    pub transmission: Option<String>,
    pub fuel: Option<String>,
    pub seats: Option<i64>,
    pub hourly_rate: Option<i64>,
    pub price_per_day: Option<i64>,
    pub km_per_hour: Option<i64>,
    pub images: Option<Vec<String>>,
    pub video: Option<String>,
    pub insurance: Option<String>,
    pub pollution: Option<String>,
    pub tax: Option<String>,
    pub registration_book: Option<String>,
    /// Admin only.
    pub owner_id: Option<i64>,
    /// Admin only.
    pub availability_status: Option<String>,
}

impl UpdateCarRequest {
    /// # Errors
    ///
    /// Returns an error if `availabilityStatus` names no availability.
    pub fn to_patch(&self) -> Result<CarPatch, DomainError> {
        Ok(CarPatch {
            name: self.name.clone(),
            brand: self.brand.clone(),
            model: self.model.clone(),
            year: self.year,
            color: self.color.clone(),
            registration_number: self.registration_number.clone(),
            category: self.category.clone(),
            transmission: self.transmission.clone(),
            fuel: self.fuel.clone(),
            seats: self.seats,
            hourly_rate: self.hourly_rate,
            price_per_day: self.price_per_day,
            km_per_hour: self.km_per_hour,
            images: self.images.clone(),
            video: self.video.clone(),
            insurance: self.insurance.clone(),
            pollution: self.pollution.clone(),
            tax: self.tax.clone(),
            registration_book: self.registration_book.clone(),
            owner_id: self.owner_id,
            availability: self
                .availability_status
                .as_deref()
                .map(str::parse)
                .transpose()?,
        })
    }
}

/// API request carrying a bare status value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

/// API request for the admin availability override.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetAvailabilityRequest {
    pub availability_status: String,
}

/// Query parameters for car listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarQuery {
    /// Admin only.
    pub owner_id: Option<i64>,
    /// Admin only: publication status.
    pub status: Option<String>,
    /// Admin only: computed availability.
    pub availability_status: Option<String>,
    /// Fleet owners: list their own cars in every non-deleted status.
    pub mine: Option<bool>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// A car as shown to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarInfo {
    pub car_id: i64,
    /// Stripped for non-admin callers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<i64>,
    pub name: String,
    pub brand: String,
    pub model: String,
    pub year: u16,
    pub color: String,
    pub registration_number: String,
    pub category: String,
    pub transmission: String,
    pub fuel: String,
    pub seats: u8,
    pub hourly_rate: i64,
    pub price_per_day: i64,
    pub km_per_hour: i64,
    pub images: Vec<String>,
    pub video: Option<String>,
    pub insurance: String,
    pub pollution: String,
    pub tax: String,
    pub registration_book: String,
    /// Publication status.
    pub status: String,
    /// Computed availability.
    pub availability_status: String,
}

// ============================================================================
// Rides
// ============================================================================

/// API request to book a car.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRideRequest {
    pub car_id: i64,
    pub location: LocationDto,
    pub date: DateRangeDto,
    pub time: TimeRangeDto,
}

/// API request to edit a pending booking.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct UpdateRideRequest {
    pub location: Option<LocationDto>,
    pub date: Option<DateRangeDto>,
    pub time: Option<TimeRangeDto>,
}

/// Query parameters for ride listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RideQuery {
    /// Admin only.
    pub rider_id: Option<i64>,
    pub car_id: Option<i64>,
    /// Presented status, `ongoing` included.
    pub status: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// A ride as shown to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RideInfo {
    pub ride_id: i64,
    pub car_id: i64,
    pub rider_id: i64,
    pub location: LocationDto,
    pub date: DateRangeDto,
    pub time: TimeRangeDto,
    /// Presented status, `ongoing` derived from the marketplace clock.
    pub status: String,
    pub decided_by: Option<i64>,
    /// When the latest admin decision was recorded.
    pub decided_at: Option<String>,
}

// ============================================================================
// Pauses
// ============================================================================

/// API request to pause a car.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePauseRequest {
    pub car_id: i64,
    pub reason: String,
    pub date: DateRangeDto,
    pub time: TimeRangeDto,
    pub additional_note: Option<String>,
}

/// API request deciding a pause. The status defaults to `approved`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DecidePauseRequest {
    pub status: Option<String>,
}

/// Query parameters for pause listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PauseQuery {
    pub car_id: Option<i64>,
    pub status: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// A pause request as shown to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PauseInfo {
    pub pause_id: i64,
    pub car_id: i64,
    pub requested_by: i64,
    pub reason: String,
    pub date: DateRangeDto,
    pub time: TimeRangeDto,
    pub additional_note: Option<String>,
    pub status: String,
    pub decided_by: Option<i64>,
}

// ============================================================================
// KYC
// ============================================================================

/// Rider KYC fields. Whole for submissions, sparse for self-updates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RiderKycRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub refer_code: Option<String>,
    pub selfie: Option<String>,
    pub aadhar_front: Option<String>,
    pub aadhar_back: Option<String>,
    pub driving_license_front: Option<String>,
    pub driving_license_back: Option<String>,
}

impl From<RiderKycRequest> for RiderKycDraft {
    fn from(request: RiderKycRequest) -> Self {
        Self {
            full_name: request.full_name,
            email: request.email,
            refer_code: request.refer_code,
            selfie: request.selfie,
            aadhar_front: request.aadhar_front,
            aadhar_back: request.aadhar_back,
            driving_license_front: request.driving_license_front,
            driving_license_back: request.driving_license_back,
        }
    }
}

/// Fleet-owner KYC fields. Whole for submissions, sparse for self-updates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FleetOwnerKycRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub refer_code: Option<String>,
    pub account_number: Option<String>,
    pub ifsc_code: Option<String>,
    pub bank_name: Option<String>,
    pub upi_id: Option<String>,
    pub gpay_number: Option<String>,
    pub phonepe_number: Option<String>,
    pub pan_number: Option<String>,
    pub passbook: Option<String>,
    pub pan_card: Option<String>,
    pub gst_number: Option<String>,
    pub gst_certificate: Option<String>,
}

impl From<FleetOwnerKycRequest> for FleetOwnerKycDraft {
    fn from(request: FleetOwnerKycRequest) -> Self {
        Self {
            full_name: request.full_name,
            email: request.email,
            refer_code: request.refer_code,
            account_number: request.account_number,
            ifsc_code: request.ifsc_code,
            bank_name: request.bank_name,
            upi_id: request.upi_id,
            gpay_number: request.gpay_number,
            phonepe_number: request.phonepe_number,
            pan_number: request.pan_number,
            passbook: request.passbook,
            pan_card: request.pan_card,
            gst_number: request.gst_number,
            gst_certificate: request.gst_certificate,
        }
    }
}

/// API request recording an admin KYC decision.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KycDecisionRequest {
    pub status: String,
    pub admin_note: Option<String>,
}

/// Query parameters for admin KYC listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KycQuery {
    pub status: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// Rider-ledger fields of a KYC record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiderKycInfo {
    pub selfie: String,
    pub aadhar_front: String,
    pub aadhar_back: String,
    pub driving_license_front: String,
    pub driving_license_back: String,
}

/// Fleet-owner-ledger fields of a KYC record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetOwnerKycInfo {
    pub account_number: String,
    pub ifsc_code: String,
    pub bank_name: String,
    pub upi_id: Option<String>,
    pub gpay_number: Option<String>,
    pub phonepe_number: Option<String>,
    pub pan_number: String,
    pub passbook: String,
    pub pan_card: String,
    pub gst_number: Option<String>,
    pub gst_certificate: Option<String>,
}

/// Ledger-specific KYC fields, flattened into [`KycInfo`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum KycDetailsInfo {
    Rider(RiderKycInfo),
    FleetOwner(FleetOwnerKycInfo),
}

/// A KYC record as shown to its owner or an admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KycInfo {
    pub kyc_id: i64,
    pub user_id: i64,
    pub kind: String,
    pub full_name: String,
    pub email: String,
    pub refer_code: Option<String>,
    #[serde(flatten)]
    pub details: KycDetailsInfo,
    pub status: String,
    pub admin_note: Option<String>,
    pub reviewed_by: Option<i64>,
    /// When the latest admin decision was recorded.
    pub reviewed_at: Option<String>,
}

// ============================================================================
// Listings
// ============================================================================

/// API request to list a car for rent in a city.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateListingRequest {
    pub car_id: i64,
    pub city: String,
    pub parking_location: String,
    pub price_per_day: i64,
    pub rental_period: DateRangeDto,
    #[serde(default)]
    pub delivery_available: bool,
    /// Admin only.
    pub fleet_by: Option<i64>,
    /// Admin only.
    pub approved_price_per_day: Option<i64>,
}

/// API request setting or clearing the admin price override.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetListingPriceRequest {
    pub approved_price_per_day: Option<i64>,
}

/// Query parameters for listing searches.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingQuery {
    pub city: Option<String>,
    pub car_id: Option<i64>,
    pub delivery_available: Option<bool>,
    pub transmission: Option<String>,
    pub fuel: Option<String>,
    pub category: Option<String>,
    pub min_seats: Option<i64>,
    pub min_rating: Option<f64>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    /// Requested rental start; requires `to`.
    pub from: Option<String>,
    /// Requested rental end; requires `from`.
    pub to: Option<String>,
    pub sort: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// A listing as shown to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingInfo {
    pub listing_id: i64,
    pub car_id: i64,
    pub city: String,
    pub parking_location: String,
    /// The price riders are charged.
    pub price_per_day: i64,
    /// Admin only: the owner's asking price.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_price_per_day: Option<i64>,
    /// Admin only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_price_per_day: Option<i64>,
    /// Admin only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fleet_by: Option<i64>,
    pub rental_period: DateRangeDto,
    pub delivery_available: bool,
    pub average_rating: Option<f64>,
    pub car: CarInfo,
}

// ============================================================================
// Ratings
// ============================================================================

/// API request to rate a car, a rider, or both.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRatingRequest {
    pub car_id: Option<i64>,
    pub rider_id: Option<i64>,
    pub rate: i64,
    #[serde(default)]
    pub review: String,
}

/// Query parameters for rating listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingQuery {
    pub car_id: Option<i64>,
    pub rider_id: Option<i64>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// A rating as shown to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingInfo {
    pub rating_id: i64,
    pub author_id: i64,
    pub car_id: Option<i64>,
    pub rider_id: Option<i64>,
    pub rate: u8,
    pub review: String,
}

/// API response for rating listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRatingsResponse {
    pub ratings: PagedResponse<RatingInfo>,
    /// Mean score of the car, when filtering by car.
    pub average_rate: Option<f64>,
}

// ============================================================================
// Audit
// ============================================================================

/// One audit event as shown to admins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEventInfo {
    pub event_id: Option<i64>,
    pub actor_user_id: i64,
    pub actor_role: String,
    pub action: String,
    pub details: Option<String>,
    pub entity_kind: String,
    pub entity_id: Option<i64>,
    pub before: String,
    pub after: String,
    pub created_at: Option<String>,
}
