// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::Duration;

use super::helpers::{
    TEST_PASSWORD, create_test_admin, create_test_fleet_owner, create_test_rider,
    register_test_identity, setup_test_persistence,
};
use crate::{
    ApiError, AuthenticatedActor, AuthenticationService, LoginRequest, LoginResponse,
    RegisterRequest, UserInfo, UserQuery, bootstrap_admin, list_users, login, logout, register,
    whoami,
};

fn registration(role: &str, email: &str, password: &str) -> RegisterRequest {
    RegisterRequest {
        name: String::from("Asha Rao"),
        email: email.to_string(),
        phone: String::from("+91 98450 11111"),
        password: password.to_string(),
        role: role.to_string(),
    }
}

#[test]
fn test_register_rider_and_fleet_owner() {
    let mut persistence = setup_test_persistence();

    let rider: UserInfo = register(
        &mut persistence,
        &registration("rider", "asha@carhive.test", TEST_PASSWORD),
    )
    .expect("Rider registration should succeed");
    assert_eq!(rider.role, "rider");
    assert_eq!(rider.email, "asha@carhive.test");

    let owner: UserInfo = register(
        &mut persistence,
        &registration("fleetowner", "fleet@carhive.test", TEST_PASSWORD),
    )
    .expect("Fleet owner registration should succeed");
    assert_eq!(owner.role, "fleetowner");
    assert_ne!(owner.user_id, rider.user_id);
}

#[test]
fn test_register_refuses_admin_role() {
    let mut persistence = setup_test_persistence();

    let result = register(
        &mut persistence,
        &registration("admin", "sneaky@carhive.test", TEST_PASSWORD),
    );
    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
}

#[test]
fn test_register_rejects_unknown_role() {
    let mut persistence = setup_test_persistence();

    let result = register(
        &mut persistence,
        &registration("driver", "d@carhive.test", TEST_PASSWORD),
    );
    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "role"
    ));
}

#[test]
fn test_register_duplicate_email_conflicts() {
    let mut persistence = setup_test_persistence();
    create_test_rider(&mut persistence);

    let result = register(
        &mut persistence,
        &registration("rider", "rider@carhive.test", TEST_PASSWORD),
    );
    assert!(matches!(result, Err(ApiError::Conflict { .. })));
}

#[test]
fn test_register_enforces_password_policy() {
    let mut persistence = setup_test_persistence();

    let result = register(
        &mut persistence,
        &registration("rider", "weak@carhive.test", "short"),
    );
    assert!(matches!(result, Err(ApiError::InvalidInput { .. })));

    let result = register(
        &mut persistence,
        &registration("rider", "weak@carhive.test", "alllowercase"),
    );
    assert!(matches!(result, Err(ApiError::InvalidInput { .. })));
}

#[test]
fn test_login_whoami_logout() {
    let mut persistence = setup_test_persistence();
    let rider: AuthenticatedActor = create_test_rider(&mut persistence);

    let response: LoginResponse = login(
        &mut persistence,
        &LoginRequest {
            email: String::from("rider@carhive.test"),
            password: TEST_PASSWORD.to_string(),
        },
        Duration::hours(2),
    )
    .expect("Login should succeed");
    assert_eq!(response.user.user_id, rider.user_id);
    assert!(!response.token.is_empty());

    let me: UserInfo = whoami(&mut persistence, &rider).unwrap();
    assert_eq!(me.email, "rider@carhive.test");

    logout(&mut persistence, &response.token).unwrap();
    assert!(AuthenticationService::validate_session(&mut persistence, &response.token).is_err());
}

#[test]
fn test_login_unknown_email_fails() {
    let mut persistence = setup_test_persistence();

    let result = login(
        &mut persistence,
        &LoginRequest {
            email: String::from("nobody@carhive.test"),
            password: TEST_PASSWORD.to_string(),
        },
        Duration::hours(2),
    );
    assert!(matches!(result, Err(ApiError::AuthenticationFailed { .. })));
}

#[test]
fn test_bootstrap_admin_only_once() {
    let mut persistence = setup_test_persistence();

    let first: Option<i64> =
        bootstrap_admin(&mut persistence, "Root", "root@carhive.test", TEST_PASSWORD).unwrap();
    assert!(first.is_some());

    let second: Option<i64> =
        bootstrap_admin(&mut persistence, "Other", "other@carhive.test", TEST_PASSWORD).unwrap();
    assert!(second.is_none());
}

#[test]
fn test_list_users_is_admin_only() {
    let mut persistence = setup_test_persistence();
    let admin: AuthenticatedActor = create_test_admin(&mut persistence);
    let rider: AuthenticatedActor = create_test_rider(&mut persistence);
    create_test_fleet_owner(&mut persistence);
    register_test_identity(&mut persistence, "rider", "second@carhive.test");

    let riders: Vec<UserInfo> = list_users(
        &mut persistence,
        &admin,
        &UserQuery {
            role: Some(String::from("rider")),
        },
    )
    .unwrap();
    assert_eq!(riders.len(), 2);
    assert!(riders.iter().all(|user| user.role == "rider"));

    let everyone: Vec<UserInfo> =
        list_users(&mut persistence, &admin, &UserQuery::default()).unwrap();
    assert_eq!(everyone.len(), 4);

    assert!(matches!(
        list_users(&mut persistence, &rider, &UserQuery::default()),
        Err(ApiError::Unauthorized { .. })
    ));
}
