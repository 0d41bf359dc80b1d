// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions.
//!
//! Every state-changing handler follows the same shape: authorize, load what
//! the workflow needs, apply the core transition, persist record and audit
//! event together, then present the result. Handlers that depend on the
//! current time take the marketplace-local wall clock as `now`.

pub mod audit;
pub mod cars;
pub mod kyc;
pub mod listings;
pub mod pauses;
pub mod ratings;
pub mod rides;
pub mod users;

use carhive_audit::{AuditEvent, EntityKind};
use carhive_domain::{
    AvailabilityInputs, AvailabilityStatus, Car, DateRange, KycProfile, KycRecord, Page,
    PauseRequest, Ride, Role, Schedule, TimeRange, compute_availability, format_date,
    format_time,
};
use carhive_persistence::{Persistence, UserData};
use time::PrimitiveDateTime;

use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::request_response::{
    CarInfo, DateRangeDto, FleetOwnerKycInfo, KycDetailsInfo, KycInfo, LocationDto, PauseInfo,
    RideInfo, RiderKycInfo, TimeRangeDto,
};

pub(crate) fn not_found(resource_type: &str, id: i64) -> ApiError {
    ApiError::ResourceNotFound {
        resource_type: resource_type.to_string(),
        message: format!("{resource_type} {id} does not exist"),
    }
}

/// Unwraps the ID of a record read back from persistence.
pub(crate) fn stored_id(id: Option<i64>, entity: &str) -> Result<i64, ApiError> {
    id.ok_or_else(|| ApiError::Internal {
        message: format!("{entity} has no stored ID"),
    })
}

pub(crate) fn page_of(page: Option<u32>, page_size: Option<u32>) -> Result<Page, ApiError> {
    Page::new(page, page_size).map_err(translate_domain_error)
}

/// Loads a car that has not been deleted.
///
/// Deleted cars are indistinguishable from missing ones.
pub(crate) fn load_live_car(persistence: &mut Persistence, car_id: i64) -> Result<Car, ApiError> {
    persistence
        .get_car(car_id)
        .map_err(translate_persistence_error)?
        .filter(|car| !car.is_deleted())
        .ok_or_else(|| not_found("Car", car_id))
}

/// Checks that `user_id` names a fleet owner.
pub(crate) fn require_fleet_owner(
    persistence: &mut Persistence,
    user_id: i64,
) -> Result<(), ApiError> {
    let user: Option<UserData> = persistence
        .get_user_by_id(user_id)
        .map_err(translate_persistence_error)?;
    match user {
        Some(user) if user.role == Role::FleetOwner => Ok(()),
        _ => Err(not_found("Fleet owner", user_id)),
    }
}

/// Resolves a car's availability at `now` from its stored inputs and the
/// windows of its approved rides and pauses.
pub(crate) fn availability_of(
    persistence: &mut Persistence,
    car: &Car,
    now: PrimitiveDateTime,
) -> Result<AvailabilityStatus, ApiError> {
    let car_id: i64 = stored_id(car.car_id, "car")?;
    let (rides, pauses): (Vec<Schedule>, Vec<Schedule>) = persistence
        .get_blocking_windows(car_id)
        .map_err(translate_persistence_error)?;

    Ok(compute_availability(
        &AvailabilityInputs {
            publication: car.publication,
            hold: car.hold,
            approved_rides: &rides,
            approved_pauses: &pauses,
        },
        now,
    ))
}

/// Timestamp of the latest audit event on a record whose action is one of
/// `actions`.
pub(crate) fn last_decision_at(
    persistence: &mut Persistence,
    kind: EntityKind,
    entity_id: i64,
    actions: &[&str],
) -> Result<Option<String>, ApiError> {
    let events: Vec<AuditEvent> = persistence
        .list_audit_events(kind, entity_id)
        .map_err(translate_persistence_error)?;
    Ok(events
        .into_iter()
        .rev()
        .find(|event| actions.contains(&event.action.name.as_str()))
        .and_then(|event| event.created_at))
}

pub(crate) fn date_range_dto(range: &DateRange) -> DateRangeDto {
    DateRangeDto {
        from: format_date(range.from()),
        to: format_date(range.to()),
    }
}

pub(crate) fn time_range_dto(range: &TimeRange) -> TimeRangeDto {
    TimeRangeDto {
        from: format_time(range.from()),
        to: format_time(range.to()),
    }
}

/// Presents a car. `include_owner` is false for everyone but admins.
pub(crate) fn present_car(
    car: &Car,
    availability: AvailabilityStatus,
    include_owner: bool,
) -> Result<CarInfo, ApiError> {
    Ok(CarInfo {
        car_id: stored_id(car.car_id, "car")?,
        owner_id: if include_owner { car.owner_id } else { None },
        name: car.details.name.clone(),
        brand: car.details.brand.clone(),
        model: car.details.model.clone(),
        year: car.details.year,
        color: car.details.color.clone(),
        registration_number: car.details.registration_number.clone(),
        category: car.details.category.as_str().to_string(),
        transmission: car.details.transmission.as_str().to_string(),
        fuel: car.details.fuel.as_str().to_string(),
        seats: car.details.seats,
        hourly_rate: car.details.hourly_rate,
        price_per_day: car.details.price_per_day,
        km_per_hour: car.details.km_per_hour,
        images: car.images.clone(),
        video: car.video.clone(),
        insurance: car.documents.insurance.clone(),
        pollution: car.documents.pollution.clone(),
        tax: car.documents.tax.clone(),
        registration_book: car.documents.registration_book.clone(),
        status: car.publication.as_str().to_string(),
        availability_status: availability.as_str().to_string(),
    })
}

pub(crate) fn present_ride(
    ride: &Ride,
    now: PrimitiveDateTime,
    decided_at: Option<String>,
) -> Result<RideInfo, ApiError> {
    Ok(RideInfo {
        ride_id: stored_id(ride.ride_id, "ride")?,
        car_id: ride.car_id,
        rider_id: ride.rider_id,
        location: LocationDto::from_route(&ride.route),
        date: date_range_dto(&ride.schedule.date),
        time: time_range_dto(&ride.schedule.time),
        status: ride.presented_status(now).as_str().to_string(),
        decided_by: ride.decided_by,
        decided_at,
    })
}

pub(crate) fn present_pause(pause: &PauseRequest) -> Result<PauseInfo, ApiError> {
    Ok(PauseInfo {
        pause_id: stored_id(pause.pause_id, "pause")?,
        car_id: pause.car_id,
        requested_by: pause.requested_by,
        reason: pause.reason.clone(),
        date: date_range_dto(&pause.schedule.date),
        time: time_range_dto(&pause.schedule.time),
        additional_note: pause.note.clone(),
        status: pause.status.as_str().to_string(),
        decided_by: pause.decided_by,
    })
}

pub(crate) fn present_kyc(
    record: &KycRecord,
    reviewed_at: Option<String>,
) -> Result<KycInfo, ApiError> {
    let (refer_code, details): (Option<String>, KycDetailsInfo) = match &record.profile {
        KycProfile::Rider(profile) => (
            profile.refer_code.clone(),
            KycDetailsInfo::Rider(RiderKycInfo {
                selfie: profile.selfie.clone(),
                aadhar_front: profile.aadhar_front.clone(),
                aadhar_back: profile.aadhar_back.clone(),
                driving_license_front: profile.driving_license_front.clone(),
                driving_license_back: profile.driving_license_back.clone(),
            }),
        ),
        KycProfile::FleetOwner(profile) => (
            profile.refer_code.clone(),
            KycDetailsInfo::FleetOwner(FleetOwnerKycInfo {
                account_number: profile.account_number.clone(),
                ifsc_code: profile.ifsc_code.clone(),
                bank_name: profile.bank_name.clone(),
                upi_id: profile.upi_id.clone(),
                gpay_number: profile.gpay_number.clone(),
                phonepe_number: profile.phonepe_number.clone(),
                pan_number: profile.pan_number.clone(),
                passbook: profile.passbook.clone(),
                pan_card: profile.pan_card.clone(),
                gst_number: profile.gst_number.clone(),
                gst_certificate: profile.gst_certificate.clone(),
            }),
        ),
    };

    Ok(KycInfo {
        kyc_id: stored_id(record.kyc_id, "kyc")?,
        user_id: record.user_id,
        kind: record.kind().as_str().to_string(),
        full_name: record.profile.full_name().to_string(),
        email: record.profile.email().to_string(),
        refer_code,
        details,
        status: record.status.as_str().to_string(),
        admin_note: record.admin_note.clone(),
        reviewed_by: record.reviewed_by,
        reviewed_at,
    })
}
