// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types of the server boundary.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use carhive_api::ApiError;
use carhive_domain::DomainError;
use carhive_persistence::PersistenceError;
use tracing::error;

use crate::envelope::Envelope;

/// Failures that stop the server from starting.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to open database: {0}")]
    Persistence(#[from] PersistenceError),
    #[error("invalid configuration: {0}")]
    Config(#[from] DomainError),
    #[error("invalid bind address: {0}")]
    Address(#[from] std::net::AddrParseError),
    #[error("failed to seed admin: {0}")]
    AdminSeed(#[from] ApiError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// HTTP error wrapper that renders the response envelope.
#[derive(Debug)]
pub struct HttpError {
    /// The HTTP status code.
    pub status: StatusCode,
    /// Human-readable description.
    pub message: String,
    /// Error class, for clients that branch on it.
    pub kind: &'static str,
}

impl HttpError {
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: message.into(),
            kind: "AuthenticationError",
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<Envelope<()>> = Json(Envelope::failure(self.message, self.kind));
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let (status, kind): (StatusCode, &'static str) = match &err {
            ApiError::InvalidInput { .. } => (StatusCode::BAD_REQUEST, "ValidationError"),
            ApiError::AuthenticationFailed { .. } => {
                (StatusCode::UNAUTHORIZED, "AuthenticationError")
            }
            ApiError::Unauthorized { .. } => (StatusCode::FORBIDDEN, "AuthorizationError"),
            ApiError::ResourceNotFound { .. } => (StatusCode::NOT_FOUND, "NotFoundError"),
            ApiError::Conflict { .. } => (StatusCode::CONFLICT, "ConflictError"),
            ApiError::DomainRuleViolation { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "DomainRuleViolation")
            }
            ApiError::Internal { .. } => {
                error!(error = %err, "Unexpected error");
                (StatusCode::INTERNAL_SERVER_ERROR, "UnexpectedError")
            }
        };
        let message: String = if status == StatusCode::INTERNAL_SERVER_ERROR {
            String::from("Something went wrong")
        } else {
            err.to_string()
        };
        Self {
            status,
            message,
            kind,
        }
    }
}
