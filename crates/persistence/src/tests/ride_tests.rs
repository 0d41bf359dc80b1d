// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use carhive::{RideCommand, RideContext, TransitionResult, apply_ride};
use carhive_audit::{Actor, AuditEvent, EntityKind};
use carhive_domain::{
    Car, CarAction, KycRecord, KycStatus, Ride, RideStatus, Role, Schedule, parse_date,
};

use super::{
    create_test_identity, create_test_persistence, create_test_rider_kyc, create_test_schedule,
    decide_test_car, request_test_ride, submit_test_car,
};
use crate::{Persistence, PersistenceError, RideFilter};

struct Fixture {
    persistence: Persistence,
    admin: Actor,
    rider: Actor,
    car: Car,
    kyc: KycRecord,
}

fn setup() -> Fixture {
    let mut persistence: Persistence = create_test_persistence();
    let admin: Actor = create_test_identity(&mut persistence, Role::Admin, "admin@example.com");
    let owner: Actor =
        create_test_identity(&mut persistence, Role::FleetOwner, "fleet@example.com");
    let rider: Actor = create_test_identity(&mut persistence, Role::Rider, "rider@example.com");
    let car: Car = submit_test_car(&mut persistence, owner, "KA01AB1234");
    let car: Car = decide_test_car(&mut persistence, admin, &car, CarAction::Approve);
    let kyc: KycRecord =
        create_test_rider_kyc(&mut persistence, rider, admin, KycStatus::Approved);
    Fixture {
        persistence,
        admin,
        rider,
        car,
        kyc,
    }
}

fn decide(fixture: &mut Fixture, ride: &Ride, status: RideStatus) -> Ride {
    let context: RideContext<'_> = RideContext {
        car: &fixture.car,
        rider_kyc: None,
        approved_rides: &[],
    };
    let result: TransitionResult<Ride> = apply_ride(
        &context,
        Some(ride),
        RideCommand::Decide { status },
        fixture.admin,
    )
    .unwrap();
    fixture.persistence.persist_ride_transition(&result).unwrap();
    result.new_state
}

#[test]
fn test_ride_round_trips() {
    let mut fixture: Fixture = setup();
    let (car, rider, kyc) = (fixture.car.clone(), fixture.rider, fixture.kyc.clone());
    let ride: Ride = request_test_ride(
        &mut fixture.persistence,
        &car,
        rider,
        &kyc,
        create_test_schedule(),
    );

    let stored: Ride = fixture
        .persistence
        .get_ride(ride.ride_id.unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(stored, ride);
    assert_eq!(stored.status, RideStatus::Pending);
    assert!((stored.route.from.longitude - 77.5946).abs() < 1e-9);
}

#[test]
fn test_decisions_are_audited_in_order() {
    let mut fixture: Fixture = setup();
    let (car, rider, kyc) = (fixture.car.clone(), fixture.rider, fixture.kyc.clone());
    let ride: Ride = request_test_ride(
        &mut fixture.persistence,
        &car,
        rider,
        &kyc,
        create_test_schedule(),
    );

    let approved: Ride = decide(&mut fixture, &ride, RideStatus::Approve);
    let rejected: Ride = decide(&mut fixture, &approved, RideStatus::Reject);
    assert_eq!(rejected.decided_by, Some(fixture.admin.user_id));

    let events: Vec<AuditEvent> = fixture
        .persistence
        .list_audit_events(EntityKind::Ride, ride.ride_id.unwrap())
        .unwrap();
    let names: Vec<&str> = events.iter().map(|e| e.action.name.as_str()).collect();
    assert_eq!(names, vec!["RequestRide", "ApproveRide", "RejectRide"]);

    let stored: Ride = fixture
        .persistence
        .get_ride(ride.ride_id.unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, RideStatus::Reject);
}

#[test]
fn test_blocking_windows_follow_ride_decisions() {
    let mut fixture: Fixture = setup();
    let (car, rider, kyc) = (fixture.car.clone(), fixture.rider, fixture.kyc.clone());
    let car_id: i64 = car.car_id.unwrap();
    let ride: Ride = request_test_ride(
        &mut fixture.persistence,
        &car,
        rider,
        &kyc,
        create_test_schedule(),
    );

    let (rides, pauses): (Vec<Schedule>, Vec<Schedule>) =
        fixture.persistence.get_blocking_windows(car_id).unwrap();
    assert!(rides.is_empty() && pauses.is_empty());

    let approved: Ride = decide(&mut fixture, &ride, RideStatus::Approve);
    let (rides, _): (Vec<Schedule>, Vec<Schedule>) =
        fixture.persistence.get_blocking_windows(car_id).unwrap();
    assert_eq!(rides, vec![create_test_schedule()]);

    decide(&mut fixture, &approved, RideStatus::Reject);
    let (rides, _): (Vec<Schedule>, Vec<Schedule>) =
        fixture.persistence.get_blocking_windows(car_id).unwrap();
    assert!(rides.is_empty());
}

#[test]
fn test_list_rides_filters() {
    let mut fixture: Fixture = setup();
    let (car, rider, kyc) = (fixture.car.clone(), fixture.rider, fixture.kyc.clone());
    let june: Ride = request_test_ride(
        &mut fixture.persistence,
        &car,
        rider,
        &kyc,
        create_test_schedule(),
    );
    request_test_ride(
        &mut fixture.persistence,
        &car,
        rider,
        &kyc,
        Schedule::parse("2024-07-10", "2024-07-12", "08:00", "20:00").unwrap(),
    );
    decide(&mut fixture, &june, RideStatus::Approve);

    let all: Vec<Ride> = fixture
        .persistence
        .list_rides(&RideFilter {
            rider_id: Some(rider.user_id),
            ..RideFilter::default()
        })
        .unwrap();
    assert_eq!(all.len(), 2);

    let approved: Vec<Ride> = fixture
        .persistence
        .list_rides(&RideFilter {
            status: Some(RideStatus::Approve),
            ..RideFilter::default()
        })
        .unwrap();
    assert_eq!(approved.len(), 1);
    assert_eq!(approved[0].ride_id, june.ride_id);

    let july: Vec<Ride> = fixture
        .persistence
        .list_rides(&RideFilter {
            from_date: Some(parse_date("2024-07-01").unwrap()),
            to_date: Some(parse_date("2024-07-31").unwrap()),
            ..RideFilter::default()
        })
        .unwrap();
    assert_eq!(july.len(), 1);
    assert_ne!(july[0].ride_id, june.ride_id);

    let other_rider: Vec<Ride> = fixture
        .persistence
        .list_rides(&RideFilter {
            rider_id: Some(fixture.admin.user_id),
            ..RideFilter::default()
        })
        .unwrap();
    assert!(other_rider.is_empty());
}

#[test]
fn test_ride_for_missing_car_is_rejected() {
    let mut fixture: Fixture = setup();
    let mut ghost_car: Car = fixture.car.clone();
    ghost_car.car_id = Some(999);
    let context: RideContext<'_> = RideContext {
        car: &ghost_car,
        rider_kyc: Some(&fixture.kyc),
        approved_rides: &[],
    };
    let result: TransitionResult<Ride> = apply_ride(
        &context,
        None,
        RideCommand::Request {
            car_id: 999,
            route: super::create_test_route(),
            schedule: create_test_schedule(),
        },
        fixture.rider,
    )
    .unwrap();

    let persisted: Result<i64, PersistenceError> =
        fixture.persistence.persist_ride_transition(&result);
    assert!(matches!(
        persisted,
        Err(PersistenceError::ForeignKeyViolation(_))
    ));
    assert!(
        fixture
            .persistence
            .list_rides(&RideFilter::default())
            .unwrap()
            .is_empty()
    );
}
