// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

//! Audit vocabulary for workflow decisions.
//!
//! Every successful state change produces exactly one [`AuditEvent`]. Events
//! are immutable once built and are written in the same transaction as the
//! record they describe.

use carhive_domain::Role;
use std::str::FromStr;

/// Who performed an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: i64,
    pub role: Role,
}

impl Actor {
    #[must_use]
    pub const fn new(user_id: i64, role: Role) -> Self {
        Self { user_id, role }
    }
}

/// What was done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub name: String,
    pub details: Option<String>,
}

impl Action {
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }
}

/// Entity families that carry audited lifecycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Car,
    Ride,
    Pause,
    RiderKyc,
    FleetOwnerKyc,
    Listing,
}

impl EntityKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Car => "car",
            Self::Ride => "ride",
            Self::Pause => "pause",
            Self::RiderKyc => "rider_kyc",
            Self::FleetOwnerKyc => "fleet_owner_kyc",
            Self::Listing => "listing",
        }
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "car" => Ok(Self::Car),
            "ride" => Ok(Self::Ride),
            "pause" | "pausecar" => Ok(Self::Pause),
            "rider_kyc" => Ok(Self::RiderKyc),
            "fleet_owner_kyc" => Ok(Self::FleetOwnerKyc),
            "listing" | "carlist" => Ok(Self::Listing),
            _ => Err(format!("unknown audit entity kind '{s}'")),
        }
    }
}

/// The record an event is about. `id` is `None` until a newly created
/// record has been assigned one by persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityRef {
    pub kind: EntityKind,
    pub id: Option<i64>,
}

impl EntityRef {
    #[must_use]
    pub const fn new(kind: EntityKind, id: Option<i64>) -> Self {
        Self { kind, id }
    }
}

/// Opaque rendering of a record before or after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSnapshot {
    pub data: String,
}

impl StateSnapshot {
    #[must_use]
    pub const fn new(data: String) -> Self {
        Self { data }
    }
}

/// One audited state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// Assigned by persistence.
    pub event_id: Option<i64>,
    pub actor: Actor,
    pub action: Action,
    pub entity: EntityRef,
    pub before: StateSnapshot,
    pub after: StateSnapshot,
    /// Set when read back from persistence.
    pub created_at: Option<String>,
}

impl AuditEvent {
    #[must_use]
    pub const fn new(
        actor: Actor,
        action: Action,
        entity: EntityRef,
        before: StateSnapshot,
        after: StateSnapshot,
    ) -> Self {
        Self {
            event_id: None,
            actor,
            action,
            entity,
            before,
            after,
            created_at: None,
        }
    }

    /// Returns the event bound to the id a new record was stored under.
    #[must_use]
    pub const fn for_entity_id(mut self, id: i64) -> Self {
        self.entity.id = Some(id);
        self
    }
}
