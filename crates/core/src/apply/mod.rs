// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

mod car;
mod kyc;
mod listing;
mod pause;
mod ride;

pub use car::apply_car;
pub use kyc::apply_kyc;
pub use listing::apply_listing;
pub use pause::apply_pause;
pub use ride::apply_ride;

use crate::error::CoreError;
use carhive_audit::{Action, Actor, AuditEvent, EntityKind, EntityRef, StateSnapshot};

/// Builds the audit event for one transition.
fn event(
    actor: Actor,
    action: &str,
    details: Option<String>,
    kind: EntityKind,
    entity_id: Option<i64>,
    before: String,
    after: String,
) -> AuditEvent {
    AuditEvent::new(
        actor,
        Action::new(action.to_string(), details),
        EntityRef::new(kind, entity_id),
        StateSnapshot::new(before),
        StateSnapshot::new(after),
    )
}

fn missing_target(entity: &'static str) -> CoreError {
    CoreError::InvalidTarget {
        entity,
        reason: String::from("command requires an existing record"),
    }
}

fn unexpected_target(entity: &'static str) -> CoreError {
    CoreError::InvalidTarget {
        entity,
        reason: String::from("creation command applied to an existing record"),
    }
}
