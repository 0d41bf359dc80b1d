// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization types and services.

use carhive_audit::Actor;
use carhive_domain::{Car, Rating, Ride, Role};
use carhive_persistence::{Persistence, PersistenceError, SessionData, UserData};
use time::format_description::well_known::Iso8601;
use time::{Duration, OffsetDateTime};
use tracing::{debug, info};

use crate::error::AuthError;

/// An identity resolved from a bearer session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The identity's user ID.
    pub user_id: i64,
    /// The identity's email, for display.
    pub email: String,
    /// The identity's role.
    pub role: Role,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    ///
    /// # Arguments
    ///
    /// * `user_id` - The identity's user ID
    /// * `email` - The identity's email
    /// * `role` - The identity's role
    #[must_use]
    pub const fn new(user_id: i64, email: String, role: Role) -> Self {
        Self {
            user_id,
            email,
            role,
        }
    }

    /// Builds the actor from a stored identity.
    #[must_use]
    pub fn from_user(user: &UserData) -> Self {
        Self::new(user.user_id, user.email.clone(), user.role)
    }

    /// Converts this actor into the audit actor recorded with every
    /// workflow event.
    #[must_use]
    pub const fn to_audit_actor(&self) -> Actor {
        Actor::new(self.user_id, self.role)
    }

    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

fn deny(action: &str, reason: &str) -> AuthError {
    AuthError::Unauthorized {
        action: action.to_string(),
        reason: reason.to_string(),
    }
}

/// Authorization service for enforcing role-based access control.
///
/// Each check names the action it guards so refusals read well in logs and
/// responses.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Requires the Admin role.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is not an admin.
    pub fn require_admin(actor: &AuthenticatedActor, action: &str) -> Result<(), AuthError> {
        if actor.is_admin() {
            Ok(())
        } else {
            Err(deny(action, "admin role required"))
        }
    }

    /// Checks that the actor may submit cars and listings.
    ///
    /// Fleet owners and admins may; riders may not.
    ///
    /// # Errors
    ///
    /// Returns an error for riders.
    pub fn authorize_list_cars_for_rent(
        actor: &AuthenticatedActor,
        action: &str,
    ) -> Result<(), AuthError> {
        match actor.role {
            Role::FleetOwner | Role::Admin => Ok(()),
            Role::Rider => Err(deny(action, "fleet owner or admin role required")),
        }
    }

    /// Checks that the actor may manage `car`: admins always, fleet owners
    /// only for cars they own.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor neither administers nor owns the car.
    pub fn authorize_manage_car(
        actor: &AuthenticatedActor,
        car: &Car,
        action: &str,
    ) -> Result<(), AuthError> {
        match actor.role {
            Role::Admin => Ok(()),
            Role::FleetOwner if car.owner_id == Some(actor.user_id) => Ok(()),
            Role::FleetOwner => Err(deny(action, "the car belongs to another fleet owner")),
            Role::Rider => Err(deny(action, "fleet owner or admin role required")),
        }
    }

    /// Checks that the actor may book cars.
    ///
    /// # Errors
    ///
    /// Returns an error unless the actor is a rider.
    pub fn authorize_book_ride(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        match actor.role {
            Role::Rider => Ok(()),
            Role::FleetOwner | Role::Admin => Err(deny("book a ride", "rider role required")),
        }
    }

    /// Checks that the actor may read `ride`: its rider or an admin.
    ///
    /// # Errors
    ///
    /// Returns an error for anyone else.
    pub fn authorize_view_ride(actor: &AuthenticatedActor, ride: &Ride) -> Result<(), AuthError> {
        if actor.is_admin() || (actor.role == Role::Rider && ride.rider_id == actor.user_id) {
            Ok(())
        } else {
            Err(deny("view ride", "only the booking rider or an admin may"))
        }
    }

    /// Checks that the actor may edit `ride`: only its rider.
    ///
    /// # Errors
    ///
    /// Returns an error for anyone else, admins included.
    pub fn authorize_edit_ride(actor: &AuthenticatedActor, ride: &Ride) -> Result<(), AuthError> {
        if actor.role == Role::Rider && ride.rider_id == actor.user_id {
            Ok(())
        } else {
            Err(deny("edit ride", "only the booking rider may"))
        }
    }

    /// Checks that the actor may remove `rating`: its author or an admin.
    ///
    /// # Errors
    ///
    /// Returns an error for anyone else.
    pub fn authorize_delete_rating(
        actor: &AuthenticatedActor,
        rating: &Rating,
    ) -> Result<(), AuthError> {
        if actor.is_admin() || rating.author_id == actor.user_id {
            Ok(())
        } else {
            Err(deny("delete rating", "only the author or an admin may"))
        }
    }
}

/// Authentication service for session-based authentication.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Default session lifetime.
    pub const DEFAULT_SESSION_TTL: Duration = Duration::hours(24);

    /// Verifies credentials and opens a session.
    ///
    /// Unknown emails and wrong passwords fail identically.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `email` - The identity's email (case-insensitive)
    /// * `password` - The plaintext password
    /// * `session_ttl` - How long the session stays valid
    ///
    /// # Returns
    ///
    /// A tuple of (`session_token`, `authenticated_actor`, `expires_at`)
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are wrong or the session cannot
    /// be stored.
    pub fn login(
        persistence: &mut Persistence,
        email: &str,
        password: &str,
        session_ttl: Duration,
    ) -> Result<(String, AuthenticatedActor, String), AuthError> {
        let rejected = || AuthError::AuthenticationFailed {
            reason: String::from("Invalid email or password"),
        };

        let user: UserData = persistence
            .get_user_by_email(email)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(rejected)?;

        let verified: bool = Persistence::verify_password(password, &user.password_hash)
            .map_err(Self::map_persistence_error)?;
        if !verified {
            debug!(user_id = user.user_id, "Password mismatch");
            return Err(rejected());
        }

        let session_token: String = Self::generate_session_token();
        let expires_at: String = (OffsetDateTime::now_utc() + session_ttl)
            .format(&Iso8601::DEFAULT)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to format expiration time: {e}"),
            })?;

        persistence
            .create_session(&session_token, user.user_id, &expires_at)
            .map_err(Self::map_persistence_error)?;

        info!(user_id = user.user_id, role = %user.role, "Session opened");
        Ok((session_token, AuthenticatedActor::from_user(&user), expires_at))
    }

    /// Validates a session token and returns the authenticated actor.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `session_token` - The session token to validate
    ///
    /// # Errors
    ///
    /// Returns an error if the session is unknown or expired, or its
    /// identity no longer exists.
    pub fn validate_session(
        persistence: &mut Persistence,
        session_token: &str,
    ) -> Result<AuthenticatedActor, AuthError> {
        let session: SessionData = persistence
            .get_session_by_token(session_token)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Invalid session token"),
            })?;

        let expires_at: OffsetDateTime =
            OffsetDateTime::parse(&session.expires_at, &Iso8601::DEFAULT).map_err(|e| {
                AuthError::AuthenticationFailed {
                    reason: format!("Failed to parse session expiration: {e}"),
                }
            })?;
        if OffsetDateTime::now_utc() > expires_at {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Session expired"),
            });
        }

        let user: UserData = persistence
            .get_user_by_id(session.user_id)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Identity not found"),
            })?;

        persistence
            .update_session_activity(session.session_id)
            .map_err(Self::map_persistence_error)?;

        Ok(AuthenticatedActor::from_user(&user))
    }

    /// Logs out by deleting the session. Unknown tokens are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<(), AuthError> {
        persistence
            .delete_session(session_token)
            .map_err(Self::map_persistence_error)
    }

    /// Generates an opaque session token.
    fn generate_session_token() -> String {
        let timestamp: i128 = OffsetDateTime::now_utc().unix_timestamp_nanos();
        format!(
            "session_{timestamp}_{:016x}{:016x}",
            rand::random::<u64>(),
            rand::random::<u64>()
        )
    }

    fn map_persistence_error(err: PersistenceError) -> AuthError {
        AuthError::AuthenticationFailed {
            reason: format!("Database error: {err}"),
        }
    }
}
