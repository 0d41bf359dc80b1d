// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::validation::{validate_email, validate_required};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Marketplace role of an identity.
///
/// Role strings arrive in several casings (`Admin`, `admin`, `FleetOwner`,
/// `fleet_owner`, ...). They are collapsed here, once, at the identity
/// boundary; nothing downstream compares raw role strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Books cars.
    Rider,
    /// Lists and manages cars.
    FleetOwner,
    /// Reviews and decides everything.
    Admin,
}

impl Role {
    /// Returns the canonical string form, used for persistence and the API.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Rider => "rider",
            Self::FleetOwner => "fleetowner",
            Self::Admin => "admin",
        }
    }

    /// Parses a role, ignoring case, surrounding whitespace and `_`/`-`
    /// separators.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidRole` if the value names no role.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let normalized: String = value
            .trim()
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "rider" => Ok(Self::Rider),
            "fleetowner" => Ok(Self::FleetOwner),
            "admin" => Ok(Self::Admin),
            _ => Err(DomainError::InvalidRole(value.to_string())),
        }
    }

    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Assigned by persistence; `None` before the first save.
    pub user_id: Option<i64>,
    pub name: String,
    /// Always trimmed and lower-cased.
    pub email: String,
    pub phone: String,
    pub role: Role,
}

impl User {
    /// Creates a validated identity.
    ///
    /// # Errors
    ///
    /// Returns an error if the name or phone is blank or the email is malformed.
    pub fn new(name: &str, email: &str, phone: &str, role: Role) -> Result<Self, DomainError> {
        Ok(Self {
            user_id: None,
            name: validate_required("name", name)?,
            email: validate_email(email)?,
            phone: validate_required("phone", phone)?,
            role,
        })
    }
}
