// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Verification ledger queries.

use carhive_domain::{KycKind, KycProfile, KycRecord, KycStatus};
use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::debug;

use crate::data_models::{FleetOwnerKycDetailsData, RiderKycDetailsData};
use crate::diesel_schema::kyc_records;
use crate::error::PersistenceError;

/// Diesel Queryable struct for KYC rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = kyc_records)]
struct KycRow {
    kyc_id: i64,
    user_id: i64,
    kind: String,
    full_name: String,
    email: String,
    refer_code: Option<String>,
    details_json: String,
    status: String,
    admin_note: Option<String>,
    reviewed_by: Option<i64>,
}

impl KycRow {
    fn into_record(self) -> Result<KycRecord, PersistenceError> {
        let kind: KycKind = self.kind.parse::<KycKind>()?;
        let profile: KycProfile = match kind {
            KycKind::Rider => {
                let details: RiderKycDetailsData = serde_json::from_str(&self.details_json)?;
                KycProfile::Rider(details.into_profile(self.full_name, self.email, self.refer_code))
            }
            KycKind::FleetOwner => {
                let details: FleetOwnerKycDetailsData = serde_json::from_str(&self.details_json)?;
                KycProfile::FleetOwner(details.into_profile(
                    self.full_name,
                    self.email,
                    self.refer_code,
                ))
            }
        };

        Ok(KycRecord {
            kyc_id: Some(self.kyc_id),
            user_id: self.user_id,
            profile,
            status: self.status.parse::<KycStatus>()?,
            admin_note: self.admin_note,
            reviewed_by: self.reviewed_by,
        })
    }
}

/// Retrieves the caller's record in one ledger.
///
/// # Errors
///
/// Returns an error if the query fails or the row is invalid.
/// Returns `Ok(None)` if the identity has not submitted.
pub fn get_kyc_for_user(
    conn: &mut SqliteConnection,
    user_id: i64,
    kind: KycKind,
) -> Result<Option<KycRecord>, PersistenceError> {
    debug!(user_id, kind = kind.as_str(), "Looking up KYC by user");

    let row: Option<KycRow> = kyc_records::table
        .filter(kyc_records::user_id.eq(user_id))
        .filter(kyc_records::kind.eq(kind.as_str()))
        .select(KycRow::as_select())
        .first(conn)
        .optional()?;

    row.map(KycRow::into_record).transpose()
}

/// Retrieves a record by ID within one ledger.
///
/// # Errors
///
/// Returns an error if the query fails or the row is invalid.
/// Returns `Ok(None)` if no record of that kind has the ID.
pub fn get_kyc(
    conn: &mut SqliteConnection,
    kyc_id: i64,
    kind: KycKind,
) -> Result<Option<KycRecord>, PersistenceError> {
    let row: Option<KycRow> = kyc_records::table
        .filter(kyc_records::kyc_id.eq(kyc_id))
        .filter(kyc_records::kind.eq(kind.as_str()))
        .select(KycRow::as_select())
        .first(conn)
        .optional()?;

    row.map(KycRow::into_record).transpose()
}

/// Lists one ledger, optionally by status, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails or a row is invalid.
pub fn list_kyc(
    conn: &mut SqliteConnection,
    kind: KycKind,
    status: Option<KycStatus>,
) -> Result<Vec<KycRecord>, PersistenceError> {
    let mut query = kyc_records::table
        .filter(kyc_records::kind.eq(kind.as_str()))
        .select(KycRow::as_select())
        .into_boxed();
    if let Some(status) = status {
        query = query.filter(kyc_records::status.eq(status.as_str()));
    }

    let rows: Vec<KycRow> = query.order(kyc_records::kyc_id.asc()).load(conn)?;
    rows.into_iter().map(KycRow::into_record).collect()
}

/// The booking gate: whether the rider holds an approved rider KYC.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn is_rider_kyc_approved(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<bool, PersistenceError> {
    let count: i64 = kyc_records::table
        .filter(kyc_records::user_id.eq(user_id))
        .filter(kyc_records::kind.eq(KycKind::Rider.as_str()))
        .filter(kyc_records::status.eq(KycStatus::Approved.as_str()))
        .count()
        .get_result(conn)?;
    Ok(count > 0)
}
