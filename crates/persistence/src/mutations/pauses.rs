// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Pause request mutations.

use carhive::TransitionResult;
use carhive_domain::{PauseRequest, format_date, format_time};
use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::info;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::diesel_schema::pause_requests;
use crate::error::PersistenceError;
use crate::mutations::{current_timestamp, expect_one_row, persist_with_audit};

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = pause_requests, treat_none_as_null = true)]
struct PauseValues<'a> {
    car_id: i64,
    requested_by: i64,
    reason: &'a str,
    date_from: String,
    date_to: String,
    time_from: String,
    time_to: String,
    note: Option<&'a str>,
    status: &'static str,
    decided_by: Option<i64>,
    updated_at: String,
}

fn write_pause(conn: &mut SqliteConnection, pause: &PauseRequest) -> Result<i64, PersistenceError> {
    let values: PauseValues<'_> = PauseValues {
        car_id: pause.car_id,
        requested_by: pause.requested_by,
        reason: &pause.reason,
        date_from: format_date(pause.schedule.date.from()),
        date_to: format_date(pause.schedule.date.to()),
        time_from: format_time(pause.schedule.time.from()),
        time_to: format_time(pause.schedule.time.to()),
        note: pause.note.as_deref(),
        status: pause.status.as_str(),
        decided_by: pause.decided_by,
        updated_at: current_timestamp()?,
    };

    if let Some(pause_id) = pause.pause_id {
        let updated: usize =
            diesel::update(pause_requests::table.filter(pause_requests::pause_id.eq(pause_id)))
                .set(&values)
                .execute(conn)?;
        expect_one_row(updated, "pause", pause_id)?;
        return Ok(pause_id);
    }

    diesel::insert_into(pause_requests::table)
        .values(&values)
        .execute(conn)?;
    let pause_id: i64 = get_last_insert_rowid(conn)?;
    info!(
        pause_id,
        car_id = pause.car_id,
        status = pause.status.as_str(),
        "Pause requested"
    );
    Ok(pause_id)
}

/// Persists a pause transition and its audit event.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn persist_pause_transition(
    conn: &mut SqliteConnection,
    result: &TransitionResult<PauseRequest>,
) -> Result<i64, PersistenceError> {
    persist_with_audit(conn, result, result.new_state.pause_id, "pause", write_pause)
}
