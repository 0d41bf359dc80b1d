// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use carhive_audit::AuditEvent;
use carhive_domain::{Car, KycRecord, Ride};

/// The result of applying a command.
///
/// Transitions are atomic: they either succeed completely or fail without
/// side effects. A command that leaves the record exactly as it was (for
/// example re-rejecting a rejected ride) succeeds with no audit event.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionResult<T> {
    /// The record after the transition.
    pub new_state: T,
    /// The audit event recording this transition, if anything changed.
    pub audit_event: Option<AuditEvent>,
}

impl<T> TransitionResult<T> {
    pub(crate) const fn applied(new_state: T, audit_event: AuditEvent) -> Self {
        Self {
            new_state,
            audit_event: Some(audit_event),
        }
    }

    pub(crate) const fn unchanged(new_state: T) -> Self {
        Self {
            new_state,
            audit_event: None,
        }
    }

    /// True when the command changed nothing.
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.audit_event.is_none()
    }
}

/// Cross-entity facts a ride command is checked against.
#[derive(Debug, Clone, Copy)]
pub struct RideContext<'a> {
    /// The booked car.
    pub car: &'a Car,
    /// The rider's KYC record, if any was submitted.
    pub rider_kyc: Option<&'a KycRecord>,
    /// Rides of the same car whose stored status is `approve`.
    pub approved_rides: &'a [Ride],
}

/// Cross-entity facts a pause command is checked against.
#[derive(Debug, Clone, Copy)]
pub struct PauseContext<'a> {
    /// The paused car.
    pub car: &'a Car,
}
