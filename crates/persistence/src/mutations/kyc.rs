// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Verification ledger mutations.

use carhive::TransitionResult;
use carhive_audit::AuditEvent;
use carhive_domain::{KycProfile, KycRecord};
use diesel::prelude::*;
use diesel::{Connection, SqliteConnection};
use tracing::info;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::kyc_details_json;
use crate::diesel_schema::kyc_records;
use crate::error::PersistenceError;
use crate::mutations::audit::persist_audit_event;
use crate::mutations::{current_timestamp, expect_one_row, persist_with_audit};

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = kyc_records, treat_none_as_null = true)]
struct KycValues<'a> {
    user_id: i64,
    kind: &'static str,
    full_name: &'a str,
    email: &'a str,
    refer_code: Option<&'a str>,
    details_json: String,
    status: &'static str,
    admin_note: Option<&'a str>,
    reviewed_by: Option<i64>,
    updated_at: String,
}

fn refer_code(profile: &KycProfile) -> Option<&str> {
    match profile {
        KycProfile::Rider(p) => p.refer_code.as_deref(),
        KycProfile::FleetOwner(p) => p.refer_code.as_deref(),
    }
}

fn write_kyc(conn: &mut SqliteConnection, record: &KycRecord) -> Result<i64, PersistenceError> {
    let values: KycValues<'_> = KycValues {
        user_id: record.user_id,
        kind: record.kind().as_str(),
        full_name: record.profile.full_name(),
        email: record.profile.email(),
        refer_code: refer_code(&record.profile),
        details_json: kyc_details_json(&record.profile)?,
        status: record.status.as_str(),
        admin_note: record.admin_note.as_deref(),
        reviewed_by: record.reviewed_by,
        updated_at: current_timestamp()?,
    };

    if let Some(kyc_id) = record.kyc_id {
        let updated: usize =
            diesel::update(kyc_records::table.filter(kyc_records::kyc_id.eq(kyc_id)))
                .set(&values)
                .execute(conn)?;
        expect_one_row(updated, "kyc", kyc_id)?;
        return Ok(kyc_id);
    }

    diesel::insert_into(kyc_records::table)
        .values(&values)
        .execute(conn)?;
    let kyc_id: i64 = get_last_insert_rowid(conn)?;
    info!(
        kyc_id,
        user_id = record.user_id,
        kind = record.kind().as_str(),
        "KYC submitted"
    );
    Ok(kyc_id)
}

/// Persists a KYC transition and its audit event.
///
/// A resubmission carries the existing `kyc_id` and overwrites that row, so
/// each identity keeps one record per ledger.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn persist_kyc_transition(
    conn: &mut SqliteConnection,
    result: &TransitionResult<KycRecord>,
) -> Result<i64, PersistenceError> {
    persist_with_audit(conn, result, result.new_state.kyc_id, "kyc", write_kyc)
}

/// Hard-deletes a KYC record and records the deletion.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the record is already gone.
pub fn delete_kyc(
    conn: &mut SqliteConnection,
    kyc_id: i64,
    event: &AuditEvent,
) -> Result<(), PersistenceError> {
    conn.transaction::<(), PersistenceError, _>(|conn| {
        let deleted: usize =
            diesel::delete(kyc_records::table.filter(kyc_records::kyc_id.eq(kyc_id)))
                .execute(conn)?;
        expect_one_row(deleted, "kyc", kyc_id)?;
        persist_audit_event(conn, &event.clone().for_entity_id(kyc_id))?;
        Ok(())
    })?;

    info!(kyc_id, "KYC record deleted");
    Ok(())
}
