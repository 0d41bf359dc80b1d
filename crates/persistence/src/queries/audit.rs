// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit trail queries.

use carhive_audit::{Action, Actor, AuditEvent, EntityKind, EntityRef, StateSnapshot};
use carhive_domain::Role;
use diesel::prelude::*;
use diesel::SqliteConnection;

use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;

/// Diesel Queryable struct for audit event rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = audit_events)]
struct AuditEventRow {
    event_id: i64,
    actor_user_id: i64,
    actor_role: String,
    action_name: String,
    action_details: Option<String>,
    entity_kind: String,
    entity_id: Option<i64>,
    before_snapshot: String,
    after_snapshot: String,
    created_at: String,
}

impl AuditEventRow {
    fn into_event(self) -> Result<AuditEvent, PersistenceError> {
        let kind: EntityKind = self
            .entity_kind
            .parse::<EntityKind>()
            .map_err(PersistenceError::ReconstructionError)?;
        let mut event: AuditEvent = AuditEvent::new(
            Actor::new(self.actor_user_id, self.actor_role.parse::<Role>()?),
            Action::new(self.action_name, self.action_details),
            EntityRef::new(kind, self.entity_id),
            StateSnapshot::new(self.before_snapshot),
            StateSnapshot::new(self.after_snapshot),
        );
        event.event_id = Some(self.event_id);
        event.created_at = Some(self.created_at);
        Ok(event)
    }
}

/// Retrieves a single audit event.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no event has the ID.
pub fn get_audit_event(
    conn: &mut SqliteConnection,
    event_id: i64,
) -> Result<AuditEvent, PersistenceError> {
    let row: AuditEventRow = audit_events::table
        .filter(audit_events::event_id.eq(event_id))
        .select(AuditEventRow::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::NotFound(format!("audit event {event_id}")))?;
    row.into_event()
}

/// Lists the events recorded against one entity, in the order they
/// happened.
///
/// # Errors
///
/// Returns an error if the query fails or a row is invalid.
pub fn list_audit_events(
    conn: &mut SqliteConnection,
    kind: EntityKind,
    entity_id: i64,
) -> Result<Vec<AuditEvent>, PersistenceError> {
    let rows: Vec<AuditEventRow> = audit_events::table
        .filter(audit_events::entity_kind.eq(kind.as_str()))
        .filter(audit_events::entity_id.eq(entity_id))
        .order(audit_events::event_id.asc())
        .select(AuditEventRow::as_select())
        .load(conn)?;

    rows.into_iter().map(AuditEventRow::into_event).collect()
}
