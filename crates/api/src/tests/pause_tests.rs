// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{
    create_approved_car, create_test_admin, create_test_fleet_owner, create_test_rider,
    register_test_identity, setup_test_persistence, test_now,
};
use crate::{
    ApiError, AuthenticatedActor, CarInfo, CreatePauseRequest, DateRangeDto, DecidePauseRequest,
    PagedResponse, PauseInfo, PauseQuery, TimeRangeDto, create_pause, decide_pause, delete_car,
    get_car, get_pause, list_pauses,
};

fn create_test_pause_request(car_id: i64) -> CreatePauseRequest {
    CreatePauseRequest {
        car_id,
        reason: String::from("Scheduled service"),
        date: DateRangeDto {
            from: String::from("2024-05-19"),
            to: String::from("2024-05-22"),
        },
        time: TimeRangeDto {
            from: String::from("08:00"),
            to: String::from("18:00"),
        },
        additional_note: Some(String::from("Brake pads")),
    }
}

#[test]
fn test_admin_pause_is_approved_immediately() {
    let mut persistence = setup_test_persistence();
    let admin: AuthenticatedActor = create_test_admin(&mut persistence);
    let owner: AuthenticatedActor = create_test_fleet_owner(&mut persistence);
    let car: CarInfo = create_approved_car(&mut persistence, &admin, &owner, "KA01AB1234");

    let pause: PauseInfo =
        create_pause(&mut persistence, &admin, &create_test_pause_request(car.car_id)).unwrap();
    assert_eq!(pause.status, "approved");
    assert_eq!(pause.requested_by, admin.user_id);

    let paused: CarInfo = get_car(&mut persistence, &admin, car.car_id, test_now()).unwrap();
    assert_eq!(paused.availability_status, "unavailable");
}

#[test]
fn test_owner_pause_waits_for_review() {
    let mut persistence = setup_test_persistence();
    let admin: AuthenticatedActor = create_test_admin(&mut persistence);
    let owner: AuthenticatedActor = create_test_fleet_owner(&mut persistence);
    let car: CarInfo = create_approved_car(&mut persistence, &admin, &owner, "KA01AB1234");

    let pause: PauseInfo =
        create_pause(&mut persistence, &owner, &create_test_pause_request(car.car_id)).unwrap();
    assert_eq!(pause.status, "pending");

    let before: CarInfo = get_car(&mut persistence, &owner, car.car_id, test_now()).unwrap();
    assert_eq!(before.availability_status, "available");

    assert!(matches!(
        decide_pause(
            &mut persistence,
            &owner,
            pause.pause_id,
            &DecidePauseRequest::default()
        ),
        Err(ApiError::Unauthorized { .. })
    ));

    let decided: PauseInfo = decide_pause(
        &mut persistence,
        &admin,
        pause.pause_id,
        &DecidePauseRequest::default(),
    )
    .unwrap();
    assert_eq!(decided.status, "approved");
    assert_eq!(decided.decided_by, Some(admin.user_id));

    let after: CarInfo = get_car(&mut persistence, &owner, car.car_id, test_now()).unwrap();
    assert_eq!(after.availability_status, "unavailable");

    let lifted: PauseInfo = decide_pause(
        &mut persistence,
        &admin,
        pause.pause_id,
        &DecidePauseRequest {
            status: Some(String::from("rejected")),
        },
    )
    .unwrap();
    assert_eq!(lifted.status, "rejected");

    assert!(matches!(
        decide_pause(
            &mut persistence,
            &admin,
            pause.pause_id,
            &DecidePauseRequest::default()
        ),
        Err(ApiError::DomainRuleViolation { ref rule, .. }) if rule == "pause_status_transition"
    ));
}

#[test]
fn test_pause_access_is_limited_to_car_managers() {
    let mut persistence = setup_test_persistence();
    let admin: AuthenticatedActor = create_test_admin(&mut persistence);
    let owner: AuthenticatedActor = create_test_fleet_owner(&mut persistence);
    let rider: AuthenticatedActor = create_test_rider(&mut persistence);
    let other: AuthenticatedActor =
        register_test_identity(&mut persistence, "fleetowner", "other@carhive.test");
    let car: CarInfo = create_approved_car(&mut persistence, &admin, &owner, "KA01AB1234");

    assert!(matches!(
        create_pause(&mut persistence, &rider, &create_test_pause_request(car.car_id)),
        Err(ApiError::Unauthorized { .. })
    ));
    assert!(matches!(
        create_pause(&mut persistence, &other, &create_test_pause_request(car.car_id)),
        Err(ApiError::Unauthorized { .. })
    ));

    let pause: PauseInfo =
        create_pause(&mut persistence, &owner, &create_test_pause_request(car.car_id)).unwrap();
    assert!(matches!(
        get_pause(&mut persistence, &other, pause.pause_id),
        Err(ApiError::Unauthorized { .. })
    ));
    assert!(get_pause(&mut persistence, &owner, pause.pause_id).is_ok());

    let others: PagedResponse<PauseInfo> =
        list_pauses(&mut persistence, &other, &PauseQuery::default()).unwrap();
    assert_eq!(others.total, 0);

    let all: PagedResponse<PauseInfo> = list_pauses(
        &mut persistence,
        &admin,
        &PauseQuery {
            status: Some(String::from("pending")),
            ..PauseQuery::default()
        },
    )
    .unwrap();
    assert_eq!(all.total, 1);

    assert!(matches!(
        list_pauses(&mut persistence, &rider, &PauseQuery::default()),
        Err(ApiError::Unauthorized { .. })
    ));
}

#[test]
fn test_pause_requires_reason() {
    let mut persistence = setup_test_persistence();
    let admin: AuthenticatedActor = create_test_admin(&mut persistence);
    let owner: AuthenticatedActor = create_test_fleet_owner(&mut persistence);
    let car: CarInfo = create_approved_car(&mut persistence, &admin, &owner, "KA01AB1234");

    let mut request: CreatePauseRequest = create_test_pause_request(car.car_id);
    request.reason = String::from("  ");
    assert!(matches!(
        create_pause(&mut persistence, &owner, &request),
        Err(ApiError::InvalidInput { .. })
    ));
}

#[test]
fn test_pause_rejects_inverted_windows_without_writing() {
    let mut persistence = setup_test_persistence();
    let admin: AuthenticatedActor = create_test_admin(&mut persistence);
    let owner: AuthenticatedActor = create_test_fleet_owner(&mut persistence);
    let car: CarInfo = create_approved_car(&mut persistence, &admin, &owner, "KA01AB1234");

    let mut equal_times: CreatePauseRequest = create_test_pause_request(car.car_id);
    equal_times.time = TimeRangeDto {
        from: String::from("10:00"),
        to: String::from("10:00"),
    };
    assert!(matches!(
        create_pause(&mut persistence, &owner, &equal_times),
        Err(ApiError::InvalidInput { ref field, .. }) if field == "time"
    ));

    let mut late_start: CreatePauseRequest = create_test_pause_request(car.car_id);
    late_start.time = TimeRangeDto {
        from: String::from("18:00"),
        to: String::from("08:00"),
    };
    assert!(matches!(
        create_pause(&mut persistence, &admin, &late_start),
        Err(ApiError::InvalidInput { ref field, .. }) if field == "time"
    ));

    let mut inverted_dates: CreatePauseRequest = create_test_pause_request(car.car_id);
    inverted_dates.date = DateRangeDto {
        from: String::from("2024-05-22"),
        to: String::from("2024-05-19"),
    };
    assert!(matches!(
        create_pause(&mut persistence, &owner, &inverted_dates),
        Err(ApiError::InvalidInput { ref field, .. }) if field == "date"
    ));

    let stored: PagedResponse<PauseInfo> =
        list_pauses(&mut persistence, &admin, &PauseQuery::default()).unwrap();
    assert_eq!(stored.total, 0);

    let untouched: CarInfo = get_car(&mut persistence, &admin, car.car_id, test_now()).unwrap();
    assert_eq!(untouched.availability_status, "available");
}

#[test]
fn test_pause_of_deleted_car_is_gone() {
    let mut persistence = setup_test_persistence();
    let admin: AuthenticatedActor = create_test_admin(&mut persistence);
    let owner: AuthenticatedActor = create_test_fleet_owner(&mut persistence);
    let car: CarInfo = create_approved_car(&mut persistence, &admin, &owner, "KA01AB1234");

    let pause: PauseInfo =
        create_pause(&mut persistence, &owner, &create_test_pause_request(car.car_id)).unwrap();
    delete_car(&mut persistence, &admin, car.car_id, test_now()).unwrap();

    assert!(matches!(
        decide_pause(
            &mut persistence,
            &admin,
            pause.pause_id,
            &DecidePauseRequest::default()
        ),
        Err(ApiError::ResourceNotFound { .. })
    ));
    assert!(matches!(
        get_pause(&mut persistence, &admin, pause.pause_id),
        Err(ApiError::ResourceNotFound { .. })
    ));
}
