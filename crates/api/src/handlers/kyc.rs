// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Verification ledger handlers.
//!
//! Riders and fleet owners keep separate ledgers, one record per identity.
//! Callers pick the ledger with a [`KycKind`]; the payload must match it.

use carhive::{KycCommand, TransitionResult, apply_kyc};
use carhive_audit::{Action, AuditEvent, EntityKind, EntityRef, StateSnapshot};
use carhive_domain::{KycDraft, KycKind, KycRecord, KycStatus, Page, Paged};
use carhive_persistence::Persistence;
use tracing::info;

use super::{last_decision_at, not_found, page_of, present_kyc, stored_id};
use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
use crate::request_response::{KycDecisionRequest, KycInfo, KycQuery, PagedResponse};

const fn entity_kind(kind: KycKind) -> EntityKind {
    match kind {
        KycKind::Rider => EntityKind::RiderKyc,
        KycKind::FleetOwner => EntityKind::FleetOwnerKyc,
    }
}

/// Presents a record with the time of its latest admin decision.
fn present(persistence: &mut Persistence, record: &KycRecord) -> Result<KycInfo, ApiError> {
    let kyc_id: i64 = stored_id(record.kyc_id, "kyc")?;
    let reviewed_at: Option<String> =
        last_decision_at(persistence, entity_kind(record.kind()), kyc_id, &["DecideKyc"])?;
    present_kyc(record, reviewed_at)
}

fn load_kyc(
    persistence: &mut Persistence,
    kind: KycKind,
    kyc_id: i64,
) -> Result<KycRecord, ApiError> {
    persistence
        .get_kyc(kyc_id, kind)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| not_found("KYC record", kyc_id))
}

fn commit(
    persistence: &mut Persistence,
    result: TransitionResult<KycRecord>,
) -> Result<KycInfo, ApiError> {
    let kyc_id: i64 = persistence
        .persist_kyc_transition(&result)
        .map_err(translate_persistence_error)?;
    let mut record: KycRecord = result.new_state;
    record.kyc_id = Some(kyc_id);
    present(persistence, &record)
}

/// Submits or replaces the caller's record. The record lands on `pending`
/// unless it is blocked, in which case nothing changes.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `actor` - The submitting identity
/// * `draft` - The full set of fields for the caller's ledger
///
/// # Errors
///
/// Returns an error if the draft targets the other ledger, the caller's
/// record is blocked, or a required field is missing or malformed.
pub fn submit_kyc(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    draft: KycDraft,
) -> Result<KycInfo, ApiError> {
    let kind: KycKind = draft.kind();
    let current: Option<KycRecord> = persistence
        .get_kyc_for_user(actor.user_id, kind)
        .map_err(translate_persistence_error)?;

    let result: TransitionResult<KycRecord> = apply_kyc(
        current.as_ref(),
        KycCommand::Submit { draft },
        actor.to_audit_actor(),
    )
    .map_err(translate_core_error)?;

    let info: KycInfo = commit(persistence, result)?;
    info!(
        kyc_id = info.kyc_id,
        user_id = actor.user_id,
        kind = kind.as_str(),
        resubmitted = current.is_some(),
        "KYC submitted"
    );
    Ok(info)
}

/// Retrieves the caller's own record in one ledger.
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` if the caller has not submitted.
pub fn get_my_kyc(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    kind: KycKind,
) -> Result<KycInfo, ApiError> {
    let record: KycRecord = persistence
        .get_kyc_for_user(actor.user_id, kind)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("KYC record"),
            message: format!("No {} KYC submitted yet", kind.as_str()),
        })?;
    present(persistence, &record)
}

/// Edits some fields of the caller's own record.
///
/// An approved record accepts only a new referral code and stays
/// approved. A blocked record accepts nothing. Anything else goes back to
/// `pending`.
///
/// # Errors
///
/// Returns an error if the caller has no record, the update is empty or
/// invalid, or the record's status forbids the edit.
pub fn update_my_kyc(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    draft: KycDraft,
) -> Result<KycInfo, ApiError> {
    let kind: KycKind = draft.kind();
    let current: KycRecord = persistence
        .get_kyc_for_user(actor.user_id, kind)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("KYC record"),
            message: format!("No {} KYC submitted yet", kind.as_str()),
        })?;

    let result: TransitionResult<KycRecord> = apply_kyc(
        Some(&current),
        KycCommand::SelfUpdate { draft },
        actor.to_audit_actor(),
    )
    .map_err(translate_core_error)?;

    let info: KycInfo = commit(persistence, result)?;
    info!(kyc_id = info.kyc_id, status = %info.status, "KYC self-updated");
    Ok(info)
}

/// Retrieves any record. Admin only.
///
/// # Errors
///
/// Returns an error if the caller is not an admin or the record does not
/// exist in the ledger.
pub fn get_kyc(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    kind: KycKind,
    kyc_id: i64,
) -> Result<KycInfo, ApiError> {
    AuthorizationService::require_admin(actor, "view kyc")?;
    let record: KycRecord = load_kyc(persistence, kind, kyc_id)?;
    present(persistence, &record)
}

/// Lists one ledger, optionally by status. Admin only.
///
/// # Errors
///
/// Returns an error if the caller is not an admin, or the status or page
/// is invalid.
pub fn list_kyc(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    kind: KycKind,
    query: &KycQuery,
) -> Result<PagedResponse<KycInfo>, ApiError> {
    AuthorizationService::require_admin(actor, "list kyc")?;
    let page: Page = page_of(query.page, query.page_size)?;
    let status: Option<KycStatus> = query
        .status
        .as_deref()
        .map(str::parse)
        .transpose()
        .map_err(translate_domain_error)?;

    let records: Vec<KycRecord> = persistence
        .list_kyc(kind, status)
        .map_err(translate_persistence_error)?;
    let paged: Paged<KycRecord> = page.slice(records);

    let mut items: Vec<KycInfo> = Vec::with_capacity(paged.items.len());
    for record in &paged.items {
        items.push(present(persistence, record)?);
    }
    Ok(PagedResponse {
        items,
        page: paged.page,
        page_size: paged.page_size,
        total: paged.total,
    })
}

/// Records an admin decision with an optional note.
///
/// # Errors
///
/// Returns an error if:
/// - The caller is not an admin
/// - The record does not exist
/// - The status is unknown or not offered by this ledger
/// - The record is already approved and the decision approves it again
pub fn decide_kyc(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    kind: KycKind,
    kyc_id: i64,
    request: &KycDecisionRequest,
) -> Result<KycInfo, ApiError> {
    AuthorizationService::require_admin(actor, "decide kyc")?;
    let status: KycStatus = request.status.parse().map_err(translate_domain_error)?;
    let record: KycRecord = load_kyc(persistence, kind, kyc_id)?;

    let result: TransitionResult<KycRecord> = apply_kyc(
        Some(&record),
        KycCommand::Decide {
            status,
            note: request.admin_note.clone(),
        },
        actor.to_audit_actor(),
    )
    .map_err(translate_core_error)?;

    let changed: bool = !result.is_noop();
    let info: KycInfo = commit(persistence, result)?;
    if changed {
        info!(
            kyc_id,
            kind = kind.as_str(),
            from = record.status.as_str(),
            to = status.as_str(),
            "KYC decided"
        );
    }
    Ok(info)
}

/// Hard-deletes a record. Admin only. The deletion is audited.
///
/// # Errors
///
/// Returns an error if the caller is not an admin or the record does not
/// exist in the ledger.
pub fn delete_kyc(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    kind: KycKind,
    kyc_id: i64,
) -> Result<(), ApiError> {
    AuthorizationService::require_admin(actor, "delete kyc")?;
    let record: KycRecord = load_kyc(persistence, kind, kyc_id)?;

    let event: AuditEvent = AuditEvent::new(
        actor.to_audit_actor(),
        Action::new(String::from("DeleteKyc"), None),
        EntityRef::new(entity_kind(kind), Some(kyc_id)),
        StateSnapshot::new(record.snapshot()),
        StateSnapshot::new(String::from("none")),
    );
    persistence
        .delete_kyc(kyc_id, &event)
        .map_err(translate_persistence_error)?;

    info!(kyc_id, kind = kind.as_str(), user_id = record.user_id, "KYC deleted");
    Ok(())
}
