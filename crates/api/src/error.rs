// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use crate::password_policy::PasswordPolicyError;
use carhive::CoreError;
use carhive_domain::DomainError;
use carhive_persistence::PersistenceError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// Why the caller may not perform it.
        reason: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized { action, reason } => {
                write!(f, "Not allowed to {action}: {reason}")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
/// Each variant corresponds to exactly one HTTP status class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The caller could not be identified.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The caller is identified but may not perform the action.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// Why the caller may not perform it.
        reason: String,
    },
    /// A workflow rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The request collides with existing state.
    Conflict {
        /// The type of resource in conflict.
        resource_type: String,
        /// A human-readable description of the conflict.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized { action, reason } => {
                write!(f, "Not allowed to {action}: {reason}")
            }
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Conflict {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} conflict: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized { action, reason } => Self::Unauthorized { action, reason },
        }
    }
}

impl From<PasswordPolicyError> for ApiError {
    fn from(err: PasswordPolicyError) -> Self {
        Self::InvalidInput {
            field: String::from("password"),
            message: err.to_string(),
        }
    }
}

fn invalid(field: &str, err: &DomainError) -> ApiError {
    ApiError::InvalidInput {
        field: field.to_string(),
        message: err.to_string(),
    }
}

fn rule(rule: &str, err: &DomainError) -> ApiError {
    ApiError::DomainRuleViolation {
        rule: rule.to_string(),
        message: err.to_string(),
    }
}

fn forbidden(action: &str, err: &DomainError) -> ApiError {
    ApiError::Unauthorized {
        action: action.to_string(),
        reason: err.to_string(),
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match &err {
        DomainError::InvalidField { field, message } => ApiError::InvalidInput {
            field: field.clone(),
            message: message.clone(),
        },
        DomainError::InvalidRole(_) => invalid("role", &err),
        DomainError::InvalidStatus { .. } => invalid("status", &err),
        DomainError::DateParseError { .. } | DomainError::InvalidDateRange { .. } => {
            invalid("date", &err)
        }
        DomainError::TimeParseError { .. } | DomainError::InvalidTimeRange { .. } => {
            invalid("time", &err)
        }
        DomainError::InvalidCoordinate { axis, .. } => invalid(axis, &err),
        DomainError::InvalidImageCount { .. } => invalid("images", &err),
        DomainError::MissingDocument(document) => invalid(document, &err),
        DomainError::NegativeAmount { field, .. } => invalid(field, &err),
        DomainError::EmptyUpdate => invalid("body", &err),
        DomainError::InvalidRating(_) => invalid("rate", &err),
        DomainError::MissingRatingTarget => invalid("target", &err),
        DomainError::InvalidTimezone(_) => invalid("timezone", &err),
        DomainError::InvalidPage { .. } => invalid("page", &err),
        DomainError::InvalidStatusTransition { entity, .. } => {
            rule(&format!("{entity}_status_transition"), &err)
        }
        DomainError::CarDeleted(_) => rule("car_deleted", &err),
        DomainError::CarNotBookable { .. } => rule("car_not_bookable", &err),
        DomainError::RideLocked { .. } => rule("ride_locked", &err),
        DomainError::KycAlreadyApproved => rule("kyc_already_approved", &err),
        DomainError::DuplicateRegistration(_) => ApiError::Conflict {
            resource_type: String::from("Car"),
            message: err.to_string(),
        },
        DomainError::RideOverlap { .. } => ApiError::Conflict {
            resource_type: String::from("Ride"),
            message: err.to_string(),
        },
        DomainError::KycKindMismatch { .. } => forbidden("submit kyc", &err),
        DomainError::KycNotApproved { .. } => forbidden("book a ride", &err),
        DomainError::KycFieldLocked { .. } | DomainError::KycBlocked => {
            forbidden("update kyc", &err)
        }
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::InvalidTarget { .. } => ApiError::Internal {
            message: err.to_string(),
        },
    }
}

/// Translates a persistence error into an API error.
///
/// Constraint violations surface as client errors; everything else is internal.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::NotFound(message) => ApiError::ResourceNotFound {
            resource_type: String::from("Record"),
            message,
        },
        PersistenceError::ForeignKeyViolation(message) => ApiError::ResourceNotFound {
            resource_type: String::from("Referenced record"),
            message,
        },
        PersistenceError::UniqueViolation(message) => ApiError::Conflict {
            resource_type: String::from("Record"),
            message,
        },
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}
