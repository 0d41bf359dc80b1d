// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use carhive_audit::Actor;
use carhive_domain::{
    Car, CarDraft, GeoPoint, KycProfile, KycRecord, KycStatus, PublicationStatus, RiderKycDraft,
    Role, Route, Schedule,
};

pub fn create_test_admin() -> Actor {
    Actor::new(1, Role::Admin)
}

pub fn create_test_fleet_owner() -> Actor {
    Actor::new(2, Role::FleetOwner)
}

pub fn create_test_rider() -> Actor {
    Actor::new(3, Role::Rider)
}

pub fn create_test_car_draft() -> CarDraft {
    CarDraft {
        name: String::from("Weekend Hatch"),
        brand: String::from("Hyundai"),
        model: String::from("i20"),
        year: 2023,
        color: String::from("blue"),
        registration_number: String::from("KA05MN4321"),
        category: String::from("hatchback"),
        transmission: String::from("manual"),
        fuel: String::from("petrol"),
        seats: 5,
        hourly_rate: 20_000,
        price_per_day: 180_000,
        km_per_hour: 35,
        images: (1..=5)
            .map(|i| format!("https://cdn.example.com/i20/{i}.jpg"))
            .collect(),
        video: None,
        insurance: Some(String::from("https://cdn.example.com/docs/ins.pdf")),
        pollution: Some(String::from("https://cdn.example.com/docs/puc.pdf")),
        tax: Some(String::from("https://cdn.example.com/docs/tax.pdf")),
        registration_book: Some(String::from("https://cdn.example.com/docs/rc.pdf")),
    }
}

/// A stored car with the given publication status.
pub fn create_test_car(publication: PublicationStatus) -> Car {
    let mut car: Car = Car::submit(&create_test_car_draft(), Some(2)).unwrap();
    car.car_id = Some(10);
    car.publication = publication;
    car
}

pub fn create_test_route() -> Route {
    let pickup: GeoPoint = GeoPoint::new(77.5946, 12.9716).unwrap();
    let drop: GeoPoint = GeoPoint::new(77.6408, 12.9784).unwrap();
    Route::new(pickup, drop)
}

pub fn create_test_schedule() -> Schedule {
    Schedule::parse("2024-06-01", "2024-06-02", "09:00", "17:00").unwrap()
}

pub fn create_test_rider_kyc_draft() -> RiderKycDraft {
    RiderKycDraft {
        full_name: Some(String::from("Ravi Kumar")),
        email: Some(String::from("ravi@example.com")),
        refer_code: None,
        selfie: Some(String::from("https://cdn.example.com/kyc/s.jpg")),
        aadhar_front: Some(String::from("https://cdn.example.com/kyc/af.jpg")),
        aadhar_back: Some(String::from("https://cdn.example.com/kyc/ab.jpg")),
        driving_license_front: Some(String::from("https://cdn.example.com/kyc/df.jpg")),
        driving_license_back: Some(String::from("https://cdn.example.com/kyc/db.jpg")),
    }
}

pub fn create_test_rider_kyc(status: KycStatus) -> KycRecord {
    KycRecord {
        kyc_id: Some(5),
        user_id: 3,
        profile: KycProfile::Rider(create_test_rider_kyc_draft().to_profile().unwrap()),
        status,
        admin_note: None,
        reviewed_by: None,
    }
}
