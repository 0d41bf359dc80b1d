// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{event, missing_target};
use crate::command::KycCommand;
use crate::error::CoreError;
use crate::state::TransitionResult;
use carhive_audit::{Actor, AuditEvent, EntityKind};
use carhive_domain::{
    DomainError, KycDraft, KycKind, KycProfile, KycRecord, KycStatus, normalize_optional,
};

const fn entity_kind(kind: KycKind) -> EntityKind {
    match kind {
        KycKind::Rider => EntityKind::RiderKyc,
        KycKind::FleetOwner => EntityKind::FleetOwnerKyc,
    }
}

/// Applies a verification-ledger command.
///
/// Submissions upsert the caller's record and always reset it to
/// `pending`.
///
/// # Arguments
///
/// * `current` - The caller's (or, for decisions, the target's) record
/// * `command` - The command to apply
/// * `actor` - The identity performing the command
///
/// # Errors
///
/// Returns an error if:
/// - The payload targets the other ledger
/// - A required field is missing or malformed
/// - An approved record's locked field is edited, or a blocked record edited
/// - The decision is unknown to the ledger or repeats an approval
pub fn apply_kyc(
    current: Option<&KycRecord>,
    command: KycCommand,
    actor: Actor,
) -> Result<TransitionResult<KycRecord>, CoreError> {
    match command {
        KycCommand::Submit { draft } => submit(current, &draft, actor),
        KycCommand::SelfUpdate { draft } => {
            let record: &KycRecord = current.ok_or_else(|| missing_target("kyc"))?;
            self_update(record, &draft, actor)
        }
        KycCommand::Decide { status, note } => {
            let record: &KycRecord = current.ok_or_else(|| missing_target("kyc"))?;
            decide(record, status, note.as_deref(), actor)
        }
    }
}

fn submit(
    current: Option<&KycRecord>,
    draft: &KycDraft,
    actor: Actor,
) -> Result<TransitionResult<KycRecord>, CoreError> {
    let expected: Option<KycKind> = KycKind::for_role(actor.role);
    if expected != Some(draft.kind()) {
        return Err(DomainError::KycKindMismatch {
            expected: expected.map_or("none", |kind| kind.as_str()),
            actual: draft.kind().as_str(),
        }
        .into());
    }

    if current.is_some_and(|existing| existing.status == KycStatus::Block) {
        return Err(DomainError::KycBlocked.into());
    }

    let profile: KycProfile = draft.to_profile()?;
    let record: KycRecord = KycRecord {
        kyc_id: current.and_then(|existing| existing.kyc_id),
        user_id: actor.user_id,
        profile,
        status: KycStatus::Pending,
        admin_note: None,
        reviewed_by: None,
    };

    let audit_event: AuditEvent = event(
        actor,
        "SubmitKyc",
        None,
        entity_kind(record.kind()),
        record.kyc_id,
        current.map_or_else(|| String::from("none"), KycRecord::snapshot),
        record.snapshot(),
    );
    Ok(TransitionResult::applied(record, audit_event))
}

fn self_update(
    record: &KycRecord,
    draft: &KycDraft,
    actor: Actor,
) -> Result<TransitionResult<KycRecord>, CoreError> {
    let status: KycStatus = record.status.after_self_update(&draft.touched_fields())?;
    let profile: KycProfile = draft.merge_into(&record.profile)?;

    if status == record.status && profile == record.profile {
        return Ok(TransitionResult::unchanged(record.clone()));
    }

    let mut updated: KycRecord = record.clone();
    updated.profile = profile;
    updated.status = status;
    if status == KycStatus::Pending {
        updated.reviewed_by = None;
    }

    let audit_event: AuditEvent = event(
        actor,
        "UpdateKyc",
        Some(draft.touched_fields().join(",")),
        entity_kind(record.kind()),
        record.kyc_id,
        record.snapshot(),
        updated.snapshot(),
    );
    Ok(TransitionResult::applied(updated, audit_event))
}

fn decide(
    record: &KycRecord,
    status: KycStatus,
    note: Option<&str>,
    actor: Actor,
) -> Result<TransitionResult<KycRecord>, CoreError> {
    record.status.validate_decision(record.kind(), status)?;
    if record.status == status {
        return Ok(TransitionResult::unchanged(record.clone()));
    }

    let mut updated: KycRecord = record.clone();
    updated.status = status;
    updated.admin_note = normalize_optional(note);
    updated.reviewed_by = Some(actor.user_id);

    let audit_event: AuditEvent = event(
        actor,
        "DecideKyc",
        Some(format!(
            "KYC {} -> {}",
            record.status.as_str(),
            status.as_str()
        )),
        entity_kind(record.kind()),
        record.kyc_id,
        record.snapshot(),
        updated.snapshot(),
    );
    Ok(TransitionResult::applied(updated, audit_event))
}
