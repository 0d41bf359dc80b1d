// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use carhive_audit::{AuditEvent, EntityKind};
use carhive_persistence::Persistence;

use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::{ApiError, translate_persistence_error};
use crate::request_response::AuditEventInfo;

fn present_event(event: AuditEvent) -> AuditEventInfo {
    AuditEventInfo {
        event_id: event.event_id,
        actor_user_id: event.actor.user_id,
        actor_role: event.actor.role.as_str().to_string(),
        action: event.action.name,
        details: event.action.details,
        entity_kind: event.entity.kind.as_str().to_string(),
        entity_id: event.entity.id,
        before: event.before.data,
        after: event.after.data,
        created_at: event.created_at,
    }
}

/// Returns the audit trail of one record, oldest first. Admin only.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `actor` - The requesting identity
/// * `kind` - Entity kind name, e.g. `car`, `ride` or `rider_kyc`
/// * `entity_id` - The record's ID
///
/// # Errors
///
/// Returns an error if the caller is not an admin or the kind is unknown.
pub fn list_audit_events(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    kind: &str,
    entity_id: i64,
) -> Result<Vec<AuditEventInfo>, ApiError> {
    AuthorizationService::require_admin(actor, "view audit trail")?;
    let kind: EntityKind = kind.parse().map_err(|message: String| ApiError::InvalidInput {
        field: String::from("kind"),
        message,
    })?;

    let events: Vec<AuditEvent> = persistence
        .list_audit_events(kind, entity_id)
        .map_err(translate_persistence_error)?;
    Ok(events.into_iter().map(present_event).collect())
}
