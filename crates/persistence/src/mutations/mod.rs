// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Write-side mutations.
//!
//! Workflow records are written together with their audit event inside a
//! single transaction. A transition that changed nothing writes nothing.

pub mod audit;
pub mod cars;
pub mod kyc;
pub mod listings;
pub mod pauses;
pub mod ratings;
pub mod rides;
pub mod users;

use carhive::TransitionResult;
use carhive_audit::AuditEvent;
use diesel::{Connection, SqliteConnection};
use time::OffsetDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use tracing::debug;

use crate::error::PersistenceError;

/// Same shape as SQLite's `CURRENT_TIMESTAMP`.
const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// The current UTC time in `CURRENT_TIMESTAMP` format.
pub(crate) fn current_timestamp() -> Result<String, PersistenceError> {
    OffsetDateTime::now_utc()
        .format(TIMESTAMP_FORMAT)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

/// Writes a transition's record and its audit event atomically.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `result` - The transition to persist
/// * `existing_id` - The record's ID, if it was already stored
/// * `entity` - Entity name for logs and errors
/// * `write` - Inserts or updates the record and returns its ID
///
/// # Returns
///
/// The record's ID.
///
/// # Errors
///
/// Returns an error if either write fails; neither is then kept.
pub(crate) fn persist_with_audit<T, F>(
    conn: &mut SqliteConnection,
    result: &TransitionResult<T>,
    existing_id: Option<i64>,
    entity: &str,
    write: F,
) -> Result<i64, PersistenceError>
where
    F: FnOnce(&mut SqliteConnection, &T) -> Result<i64, PersistenceError>,
{
    let Some(event) = result.audit_event.as_ref() else {
        debug!(entity, "Transition changed nothing, skipping write");
        return existing_id
            .ok_or_else(|| PersistenceError::Other(format!("unchanged {entity} has no ID")));
    };

    conn.transaction::<i64, PersistenceError, _>(|conn| {
        let id: i64 = write(conn, &result.new_state)?;
        let bound_event: AuditEvent = event.clone().for_entity_id(id);
        audit::persist_audit_event(conn, &bound_event)?;
        Ok(id)
    })
}

/// Maps "no row updated" to `NotFound`.
pub(crate) fn expect_one_row(
    updated: usize,
    entity: &str,
    id: i64,
) -> Result<(), PersistenceError> {
    if updated == 0 {
        return Err(PersistenceError::NotFound(format!("{entity} {id}")));
    }
    Ok(())
}
