// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Identity directory: registration, sessions, and the first admin.

use carhive_domain::{Role, User};
use carhive_persistence::{Persistence, UserData};
use time::Duration;
use tracing::info;

use crate::auth::{AuthenticatedActor, AuthenticationService, AuthorizationService};
use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::password_policy::PasswordPolicy;
use crate::request_response::{LoginRequest, LoginResponse, RegisterRequest, UserInfo, UserQuery};

fn present_user(user: &UserData) -> UserInfo {
    UserInfo {
        user_id: user.user_id,
        name: user.name.clone(),
        email: user.email.clone(),
        phone: user.phone.clone(),
        role: user.role.as_str().to_string(),
    }
}

fn create_identity(
    persistence: &mut Persistence,
    user: &User,
    password: &str,
) -> Result<UserData, ApiError> {
    PasswordPolicy::default().validate(password, &user.email, &user.name)?;

    let user_id: i64 = persistence
        .create_user(user, password)
        .map_err(|e| match translate_persistence_error(e) {
            ApiError::Conflict { .. } => ApiError::Conflict {
                resource_type: String::from("User"),
                message: format!("Email '{}' is already registered", user.email),
            },
            other => other,
        })?;

    persistence
        .get_user_by_id(user_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::Internal {
            message: format!("User {user_id} vanished after creation"),
        })
}

/// Registers a rider or fleet owner.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The registration payload
///
/// # Errors
///
/// Returns an error if:
/// - The role is unknown or is `admin` (admins cannot self-register)
/// - A field is invalid or the password fails the policy
/// - The email is already registered
pub fn register(
    persistence: &mut Persistence,
    request: &RegisterRequest,
) -> Result<UserInfo, ApiError> {
    let role: Role = Role::parse(&request.role).map_err(translate_domain_error)?;
    if role == Role::Admin {
        return Err(ApiError::Unauthorized {
            action: String::from("register"),
            reason: String::from("admin identities cannot self-register"),
        });
    }

    let user: User = User::new(&request.name, &request.email, &request.phone, role)
        .map_err(translate_domain_error)?;
    let created: UserData = create_identity(persistence, &user, &request.password)?;

    info!(user_id = created.user_id, role = %role, "Identity registered");
    Ok(present_user(&created))
}

/// Verifies credentials and opens a session.
///
/// # Errors
///
/// Returns `ApiError::AuthenticationFailed` for unknown emails or wrong
/// passwords.
pub fn login(
    persistence: &mut Persistence,
    request: &LoginRequest,
    session_ttl: Duration,
) -> Result<LoginResponse, ApiError> {
    let (token, actor, expires_at): (String, AuthenticatedActor, String) =
        AuthenticationService::login(
            persistence,
            &request.email,
            &request.password,
            session_ttl,
        )?;
    let user: UserInfo = whoami(persistence, &actor)?;

    Ok(LoginResponse {
        token,
        expires_at,
        user,
    })
}

/// Ends a session.
///
/// # Errors
///
/// Returns an error if the session cannot be deleted.
pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<(), ApiError> {
    AuthenticationService::logout(persistence, session_token)?;
    Ok(())
}

/// Returns the caller's identity.
///
/// # Errors
///
/// Returns an error if the identity no longer exists.
pub fn whoami(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<UserInfo, ApiError> {
    let user: UserData = persistence
        .get_user_by_id(actor.user_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| super::not_found("User", actor.user_id))?;
    Ok(present_user(&user))
}

/// Lists identities, optionally of one role. Admin only.
///
/// # Errors
///
/// Returns an error if the caller is not an admin or the role is unknown.
pub fn list_users(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    query: &UserQuery,
) -> Result<Vec<UserInfo>, ApiError> {
    AuthorizationService::require_admin(actor, "list users")?;
    let role: Option<Role> = query
        .role
        .as_deref()
        .map(Role::parse)
        .transpose()
        .map_err(translate_domain_error)?;

    let users: Vec<UserData> = persistence
        .list_users(role)
        .map_err(translate_persistence_error)?;
    Ok(users.iter().map(present_user).collect())
}

/// Creates the first admin identity if none exists yet.
///
/// # Returns
///
/// The new admin's user ID, or `None` when an admin already exists.
///
/// # Errors
///
/// Returns an error if the credentials are invalid or the write fails.
pub fn bootstrap_admin(
    persistence: &mut Persistence,
    name: &str,
    email: &str,
    password: &str,
) -> Result<Option<i64>, ApiError> {
    let admins: i64 = persistence
        .count_users_with_role(Role::Admin)
        .map_err(translate_persistence_error)?;
    if admins > 0 {
        return Ok(None);
    }

    let user: User = User::new(name, email, "-", Role::Admin).map_err(translate_domain_error)?;
    let created: UserData = create_identity(persistence, &user, password)?;

    info!(user_id = created.user_id, "First admin created");
    Ok(Some(created.user_id))
}
