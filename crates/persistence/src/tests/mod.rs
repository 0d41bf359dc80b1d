// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod kyc_tests;
mod ride_tests;

use carhive::{
    CarCommand, KycCommand, RideCommand, TransitionResult, apply_car, apply_kyc, apply_ride,
};
use carhive_audit::Actor;
use carhive_domain::{
    Car, CarAction, CarDraft, GeoPoint, KycDraft, KycRecord, KycStatus, Ride, RiderKycDraft, Role,
    Route, Schedule, User,
};

use crate::{Persistence, SqlitePersistence};

pub fn create_test_persistence() -> Persistence {
    SqlitePersistence::new_in_memory().unwrap()
}

/// Stores an identity and returns it as an actor.
pub fn create_test_identity(persistence: &mut Persistence, role: Role, email: &str) -> Actor {
    let user: User = User::new("Test Person", email, "+91 98450 00000", role).unwrap();
    let user_id: i64 = persistence.create_user(&user, "correct-horse").unwrap();
    Actor::new(user_id, role)
}

pub fn create_test_car_draft(registration_number: &str) -> CarDraft {
    CarDraft {
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
        images: (1..=6)
            .map(|i| format!("https://cdn.example.com/city/{i}.jpg"))
            .collect(),
        video: Some(String::from("https://cdn.example.com/city/tour.mp4")),
        insurance: Some(String::from("https://cdn.example.com/docs/ins.pdf")),
        pollution: Some(String::from("https://cdn.example.com/docs/puc.pdf")),
        tax: Some(String::from("https://cdn.example.com/docs/tax.pdf")),
        registration_book: Some(String::from("https://cdn.example.com/docs/rc.pdf")),
    }
}

/// Submits a car as `owner` and returns it with its assigned ID.
pub fn submit_test_car(persistence: &mut Persistence, owner: Actor, registration: &str) -> Car {
    let result: TransitionResult<Car> = apply_car(
        None,
        CarCommand::Submit {
            draft: create_test_car_draft(registration),
            owner_id: Some(owner.user_id),
        },
        owner,
    )
    .unwrap();
    let car_id: i64 = persistence.persist_car_transition(&result).unwrap();
    let mut car: Car = result.new_state;
    car.car_id = Some(car_id);
    car
}

/// Applies an admin publication action and persists it.
pub fn decide_test_car(
    persistence: &mut Persistence,
    admin: Actor,
    car: &Car,
    action: CarAction,
) -> Car {
    let result: TransitionResult<Car> =
        apply_car(Some(car), CarCommand::Decide { action }, admin).unwrap();
    persistence.persist_car_transition(&result).unwrap();
    result.new_state
}

pub fn create_test_route() -> Route {
    Route::new(
        GeoPoint::new(77.5946, 12.9716).unwrap(),
        GeoPoint::new(77.6408, 12.9784).unwrap(),
    )
}

pub fn create_test_schedule() -> Schedule {
    Schedule::parse("2024-06-01", "2024-06-02", "09:00", "17:00").unwrap()
}

pub fn create_test_rider_kyc_draft(email: &str) -> RiderKycDraft {
    RiderKycDraft {
        full_name: Some(String::from("Ravi Kumar")),
        email: Some(email.to_string()),
        refer_code: Some(String::from("WELCOME10")),
        selfie: Some(String::from("https://cdn.example.com/kyc/s.jpg")),
        aadhar_front: Some(String::from("https://cdn.example.com/kyc/af.jpg")),
        aadhar_back: Some(String::from("https://cdn.example.com/kyc/ab.jpg")),
        driving_license_front: Some(String::from("https://cdn.example.com/kyc/df.jpg")),
        driving_license_back: Some(String::from("https://cdn.example.com/kyc/db.jpg")),
    }
}

/// Submits a rider KYC and, unless `status` is pending, records an admin
/// decision on it.
pub fn create_test_rider_kyc(
    persistence: &mut Persistence,
    rider: Actor,
    admin: Actor,
    status: KycStatus,
) -> KycRecord {
    let submitted: TransitionResult<KycRecord> = apply_kyc(
        None,
        KycCommand::Submit {
            draft: KycDraft::Rider(create_test_rider_kyc_draft("ravi@example.com")),
        },
        rider,
    )
    .unwrap();
    let kyc_id: i64 = persistence.persist_kyc_transition(&submitted).unwrap();
    let mut record: KycRecord = submitted.new_state;
    record.kyc_id = Some(kyc_id);

    if status == KycStatus::Pending {
        return record;
    }
    let decided: TransitionResult<KycRecord> = apply_kyc(
        Some(&record),
        KycCommand::Decide { status, note: None },
        admin,
    )
    .unwrap();
    persistence.persist_kyc_transition(&decided).unwrap();
    decided.new_state
}

/// Requests a ride for an approved car on behalf of a KYC-approved rider.
pub fn request_test_ride(
    persistence: &mut Persistence,
    car: &Car,
    rider: Actor,
    rider_kyc: &KycRecord,
    schedule: Schedule,
) -> Ride {
    let context: carhive::RideContext<'_> = carhive::RideContext {
        car,
        rider_kyc: Some(rider_kyc),
        approved_rides: &[],
    };
    let result: TransitionResult<Ride> = apply_ride(
        &context,
        None,
        RideCommand::Request {
            car_id: car.car_id.unwrap(),
            route: create_test_route(),
            schedule,
        },
        rider,
    )
    .unwrap();
    let ride_id: i64 = persistence.persist_ride_transition(&result).unwrap();
    let mut ride: Ride = result.new_state;
    ride.ride_id = Some(ride_id);
    ride
}
