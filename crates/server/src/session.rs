// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session extraction for the server.
//!
//! Validates the bearer token at the server boundary so handlers receive a
//! resolved identity.

use axum::{extract::FromRequestParts, http::request::Parts};
use carhive_api::{AuthenticatedActor, AuthenticationService};
use tracing::{debug, warn};

use crate::AppState;
use crate::error::HttpError;

/// Extractor for authenticated identities.
///
/// # Usage
///
/// ```ignore
/// async fn my_handler(
///     SessionActor(actor, token): SessionActor,
/// ) -> Result<Reply<UserInfo>, HttpError> {
///     // actor: AuthenticatedActor
///     // token: the bearer token, for logout
/// }
/// ```
///
/// # Errors
///
/// Rejects with HTTP 401 if the `Authorization: Bearer <token>` header is
/// missing or malformed, or the session is unknown or expired.
pub struct SessionActor(pub AuthenticatedActor, pub String);

impl FromRequestParts<AppState> for SessionActor {
    type Rejection = HttpError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header: &str = parts
            .headers
            .get("Authorization")
            .ok_or_else(|| {
                debug!("Missing Authorization header");
                HttpError::unauthenticated("Missing Authorization header")
            })?
            .to_str()
            .map_err(|_| {
                warn!("Invalid Authorization header encoding");
                HttpError::unauthenticated("Invalid Authorization header")
            })?;

        let token: &str = header.strip_prefix("Bearer ").ok_or_else(|| {
            warn!("Authorization header does not start with 'Bearer '");
            HttpError::unauthenticated("Expected 'Authorization: Bearer <token>'")
        })?;

        let mut persistence = state.persistence.lock().await;
        let actor: AuthenticatedActor =
            AuthenticationService::validate_session(&mut persistence, token).map_err(|e| {
                warn!(error = %e, "Session validation failed");
                HttpError::unauthenticated(e.to_string())
            })?;

        debug!(user_id = actor.user_id, role = %actor.role, "Session validated");
        Ok(Self(actor, token.to_string()))
    }
}
