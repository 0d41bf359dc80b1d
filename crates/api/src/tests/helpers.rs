// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use carhive_domain::{CarAction, KycDraft, KycKind, RiderKycDraft};
use carhive_persistence::{Persistence, UserData};
use time::PrimitiveDateTime;
use time::macros::datetime;

use crate::{
    AuthenticatedActor, CarInfo, CreateRideRequest, DateRangeDto, GeoPointDto, KycDecisionRequest,
    LocationDto, RegisterRequest, RideInfo, StatusRequest, SubmitCarRequest, TimeRangeDto,
    UserInfo, bootstrap_admin, create_ride, decide_car, decide_kyc, register, submit_car,
    submit_kyc,
};

pub const TEST_PASSWORD: &str = "Drive-2024";

/// Marketplace clock used by most tests: a couple of weeks before the
/// booking windows the fixtures use.
pub const fn test_now() -> PrimitiveDateTime {
    datetime!(2024-05-20 10:00)
}

pub fn setup_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("Failed to create in-memory persistence")
}

fn actor_for(persistence: &mut Persistence, user_id: i64) -> AuthenticatedActor {
    let user: UserData = persistence
        .get_user_by_id(user_id)
        .unwrap()
        .expect("Identity not found");
    AuthenticatedActor::from_user(&user)
}

pub fn create_test_admin(persistence: &mut Persistence) -> AuthenticatedActor {
    let admin_id: i64 =
        bootstrap_admin(persistence, "Root Admin", "admin@carhive.test", TEST_PASSWORD)
            .unwrap()
            .expect("An admin already existed");
    actor_for(persistence, admin_id)
}

pub fn register_test_identity(
    persistence: &mut Persistence,
    role: &str,
    email: &str,
) -> AuthenticatedActor {
    let info: UserInfo = register(
        persistence,
        &RegisterRequest {
            name: String::from("Test Person"),
            email: email.to_string(),
            phone: String::from("+91 98450 00000"),
            password: TEST_PASSWORD.to_string(),
            role: role.to_string(),
        },
    )
    .unwrap();
    actor_for(persistence, info.user_id)
}

pub fn create_test_fleet_owner(persistence: &mut Persistence) -> AuthenticatedActor {
    register_test_identity(persistence, "fleetowner", "fleet@carhive.test")
}

pub fn create_test_rider(persistence: &mut Persistence) -> AuthenticatedActor {
    register_test_identity(persistence, "rider", "rider@carhive.test")
}

pub fn create_test_car_request(registration_number: &str) -> SubmitCarRequest {
    SubmitCarRequest {
        name: String::from("City Sedan"),
        brand: String::from("Honda"),
        model: String::from("City"),
        year: 2022,
        color: String::from("white"),
        registration_number: registration_number.to_string(),
        category: String::from("sedan"),
        transmission: String::from("auto"),
        fuel: String::from("petrol"),
        seats: 5,
        hourly_rate: 25_000,
        price_per_day: 250_000,
        km_per_hour: 40,
        images: (1..=5)
            .map(|i| format!("https://cdn.example.com/city/{i}.jpg"))
            .collect(),
        video: None,
        insurance: Some(String::from("https://cdn.example.com/docs/ins.pdf")),
        pollution: Some(String::from("https://cdn.example.com/docs/puc.pdf")),
        tax: Some(String::from("https://cdn.example.com/docs/tax.pdf")),
        registration_book: Some(String::from("https://cdn.example.com/docs/rc.pdf")),
        owner_id: None,
    }
}

/// Submits a car as `owner` and has `admin` approve it.
pub fn create_approved_car(
    persistence: &mut Persistence,
    admin: &AuthenticatedActor,
    owner: &AuthenticatedActor,
    registration_number: &str,
) -> CarInfo {
    let submitted: CarInfo = submit_car(
        persistence,
        owner,
        &create_test_car_request(registration_number),
        test_now(),
    )
    .unwrap();
    decide_car(
        persistence,
        admin,
        submitted.car_id,
        CarAction::Approve,
        test_now(),
    )
    .unwrap()
}

pub fn create_test_rider_kyc_draft(email: &str) -> KycDraft {
    KycDraft::Rider(RiderKycDraft {
        full_name: Some(String::from("Ravi Kumar")),
        email: Some(email.to_string()),
        refer_code: Some(String::from("WELCOME10")),
        selfie: Some(String::from("https://cdn.example.com/kyc/s.jpg")),
        aadhar_front: Some(String::from("https://cdn.example.com/kyc/af.jpg")),
        aadhar_back: Some(String::from("https://cdn.example.com/kyc/ab.jpg")),
        driving_license_front: Some(String::from("https://cdn.example.com/kyc/df.jpg")),
        driving_license_back: Some(String::from("https://cdn.example.com/kyc/db.jpg")),
    })
}

/// Submits a rider KYC and has `admin` approve it.
pub fn approve_test_rider(
    persistence: &mut Persistence,
    admin: &AuthenticatedActor,
    rider: &AuthenticatedActor,
) {
    let submitted = submit_kyc(persistence, rider, create_test_rider_kyc_draft(&rider.email))
        .unwrap();
    decide_kyc(
        persistence,
        admin,
        KycKind::Rider,
        submitted.kyc_id,
        &KycDecisionRequest {
            status: String::from("approved"),
            admin_note: None,
        },
    )
    .unwrap();
}

pub fn create_test_location() -> LocationDto {
    LocationDto {
        from: GeoPointDto {
            longitude: 77.5946,
            latitude: 12.9716,
        },
        to: GeoPointDto {
            longitude: 77.6408,
            latitude: 12.9784,
        },
    }
}

pub fn create_test_ride_request(car_id: i64, date_from: &str, date_to: &str) -> CreateRideRequest {
    CreateRideRequest {
        car_id,
        location: create_test_location(),
        date: DateRangeDto {
            from: date_from.to_string(),
            to: date_to.to_string(),
        },
        time: TimeRangeDto {
            from: String::from("09:00"),
            to: String::from("17:00"),
        },
    }
}

/// Books `car_id` for 2024-06-01..02 as `rider`.
pub fn request_test_ride(
    persistence: &mut Persistence,
    rider: &AuthenticatedActor,
    car_id: i64,
) -> RideInfo {
    create_ride(
        persistence,
        rider,
        &create_test_ride_request(car_id, "2024-06-01", "2024-06-02"),
        test_now(),
    )
    .unwrap()
}

pub fn status(value: &str) -> StatusRequest {
    StatusRequest {
        status: value.to_string(),
    }
}
