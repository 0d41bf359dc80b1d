// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use carhive_domain::{FleetOwnerKycDraft, KycDraft, KycKind, RiderKycDraft};

use super::helpers::{
    create_test_admin, create_test_fleet_owner, create_test_rider, create_test_rider_kyc_draft,
    setup_test_persistence,
};
use crate::{
    ApiError, AuditEventInfo, AuthenticatedActor, KycDecisionRequest, KycDetailsInfo, KycInfo,
    KycQuery, PagedResponse, decide_kyc, delete_kyc, get_kyc, get_my_kyc, list_audit_events,
    list_kyc, submit_kyc, update_my_kyc,
};

fn create_test_fleet_owner_kyc_draft() -> KycDraft {
    KycDraft::FleetOwner(FleetOwnerKycDraft {
        full_name: Some(String::from("Meera Fleet")),
        email: Some(String::from("fleet@carhive.test")),
        account_number: Some(String::from("001122334455")),
        ifsc_code: Some(String::from("hdfc0001234")),
        bank_name: Some(String::from("HDFC")),
        pan_number: Some(String::from("abcde1234f")),
        passbook: Some(String::from("https://cdn.example.com/kyc/passbook.pdf")),
        pan_card: Some(String::from("https://cdn.example.com/kyc/pan.jpg")),
        ..FleetOwnerKycDraft::default()
    })
}

fn decision(status: &str) -> KycDecisionRequest {
    KycDecisionRequest {
        status: status.to_string(),
        admin_note: Some(String::from("checked")),
    }
}

#[test]
fn test_submission_targets_callers_ledger() {
    let mut persistence = setup_test_persistence();
    let rider: AuthenticatedActor = create_test_rider(&mut persistence);
    let owner: AuthenticatedActor = create_test_fleet_owner(&mut persistence);

    assert!(matches!(
        submit_kyc(&mut persistence, &rider, create_test_fleet_owner_kyc_draft()),
        Err(ApiError::Unauthorized { .. })
    ));

    let submitted: KycInfo =
        submit_kyc(&mut persistence, &owner, create_test_fleet_owner_kyc_draft()).unwrap();
    assert_eq!(submitted.kind, "fleetowner");
    assert_eq!(submitted.status, "pending");
    assert!(matches!(
        submitted.details,
        KycDetailsInfo::FleetOwner(ref details) if details.ifsc_code == "HDFC0001234"
    ));
}

#[test]
fn test_resubmission_returns_to_pending() {
    let mut persistence = setup_test_persistence();
    let admin: AuthenticatedActor = create_test_admin(&mut persistence);
    let rider: AuthenticatedActor = create_test_rider(&mut persistence);

    let first: KycInfo = submit_kyc(
        &mut persistence,
        &rider,
        create_test_rider_kyc_draft(&rider.email),
    )
    .unwrap();
    let rejected: KycInfo = decide_kyc(
        &mut persistence,
        &admin,
        KycKind::Rider,
        first.kyc_id,
        &decision("rejected"),
    )
    .unwrap();
    assert_eq!(rejected.status, "rejected");
    assert_eq!(rejected.reviewed_by, Some(admin.user_id));
    assert!(rejected.reviewed_at.is_some());

    let again: KycInfo = submit_kyc(
        &mut persistence,
        &rider,
        create_test_rider_kyc_draft(&rider.email),
    )
    .unwrap();
    assert_eq!(again.kyc_id, first.kyc_id);
    assert_eq!(again.status, "pending");
    assert_eq!(again.reviewed_by, None);
}

#[test]
fn test_approved_record_only_accepts_refer_code() {
    let mut persistence = setup_test_persistence();
    let admin: AuthenticatedActor = create_test_admin(&mut persistence);
    let rider: AuthenticatedActor = create_test_rider(&mut persistence);
    let submitted: KycInfo = submit_kyc(
        &mut persistence,
        &rider,
        create_test_rider_kyc_draft(&rider.email),
    )
    .unwrap();
    decide_kyc(
        &mut persistence,
        &admin,
        KycKind::Rider,
        submitted.kyc_id,
        &decision("approved"),
    )
    .unwrap();

    let referred: KycInfo = update_my_kyc(
        &mut persistence,
        &rider,
        KycDraft::Rider(RiderKycDraft {
            refer_code: Some(String::from("FRIEND25")),
            ..RiderKycDraft::default()
        }),
    )
    .unwrap();
    assert_eq!(referred.status, "approved");
    assert_eq!(referred.refer_code.as_deref(), Some("FRIEND25"));

    let locked = update_my_kyc(
        &mut persistence,
        &rider,
        KycDraft::Rider(RiderKycDraft {
            selfie: Some(String::from("https://cdn.example.com/kyc/new.jpg")),
            ..RiderKycDraft::default()
        }),
    );
    assert!(matches!(locked, Err(ApiError::Unauthorized { .. })));
}

#[test]
fn test_pending_record_edit_stays_pending() {
    let mut persistence = setup_test_persistence();
    let rider: AuthenticatedActor = create_test_rider(&mut persistence);
    submit_kyc(
        &mut persistence,
        &rider,
        create_test_rider_kyc_draft(&rider.email),
    )
    .unwrap();

    let edited: KycInfo = update_my_kyc(
        &mut persistence,
        &rider,
        KycDraft::Rider(RiderKycDraft {
            full_name: Some(String::from("Ravi K")),
            ..RiderKycDraft::default()
        }),
    )
    .unwrap();
    assert_eq!(edited.full_name, "Ravi K");
    assert_eq!(edited.status, "pending");

    assert!(matches!(
        update_my_kyc(
            &mut persistence,
            &rider,
            KycDraft::Rider(RiderKycDraft::default())
        ),
        Err(ApiError::InvalidInput { .. })
    ));
}

#[test]
fn test_decision_rules() {
    let mut persistence = setup_test_persistence();
    let admin: AuthenticatedActor = create_test_admin(&mut persistence);
    let rider: AuthenticatedActor = create_test_rider(&mut persistence);
    let owner: AuthenticatedActor = create_test_fleet_owner(&mut persistence);
    let rider_kyc: KycInfo = submit_kyc(
        &mut persistence,
        &rider,
        create_test_rider_kyc_draft(&rider.email),
    )
    .unwrap();
    let owner_kyc: KycInfo =
        submit_kyc(&mut persistence, &owner, create_test_fleet_owner_kyc_draft()).unwrap();

    assert!(matches!(
        decide_kyc(
            &mut persistence,
            &rider,
            KycKind::Rider,
            rider_kyc.kyc_id,
            &decision("approved")
        ),
        Err(ApiError::Unauthorized { .. })
    ));
    assert!(matches!(
        decide_kyc(
            &mut persistence,
            &admin,
            KycKind::Rider,
            rider_kyc.kyc_id,
            &decision("pending")
        ),
        Err(ApiError::InvalidInput { .. })
    ));
    assert!(matches!(
        decide_kyc(
            &mut persistence,
            &admin,
            KycKind::FleetOwner,
            owner_kyc.kyc_id,
            &decision("block")
        ),
        Err(ApiError::InvalidInput { .. })
    ));

    decide_kyc(
        &mut persistence,
        &admin,
        KycKind::Rider,
        rider_kyc.kyc_id,
        &decision("approved"),
    )
    .unwrap();
    assert!(matches!(
        decide_kyc(
            &mut persistence,
            &admin,
            KycKind::Rider,
            rider_kyc.kyc_id,
            &decision("approved")
        ),
        Err(ApiError::DomainRuleViolation { ref rule, .. }) if rule == "kyc_already_approved"
    ));

    let blocked: KycInfo = decide_kyc(
        &mut persistence,
        &admin,
        KycKind::Rider,
        rider_kyc.kyc_id,
        &decision("blocked"),
    )
    .unwrap();
    assert_eq!(blocked.status, "block");
    assert_eq!(blocked.admin_note.as_deref(), Some("checked"));

    assert!(matches!(
        submit_kyc(
            &mut persistence,
            &rider,
            create_test_rider_kyc_draft(&rider.email)
        ),
        Err(ApiError::Unauthorized { .. })
    ));
    let still_blocked: KycInfo = get_my_kyc(&mut persistence, &rider, KycKind::Rider).unwrap();
    assert_eq!(still_blocked.status, "block");
}

#[test]
fn test_admin_reads_and_lists_ledgers() {
    let mut persistence = setup_test_persistence();
    let admin: AuthenticatedActor = create_test_admin(&mut persistence);
    let rider: AuthenticatedActor = create_test_rider(&mut persistence);
    let owner: AuthenticatedActor = create_test_fleet_owner(&mut persistence);
    let rider_kyc: KycInfo = submit_kyc(
        &mut persistence,
        &rider,
        create_test_rider_kyc_draft(&rider.email),
    )
    .unwrap();
    submit_kyc(&mut persistence, &owner, create_test_fleet_owner_kyc_draft()).unwrap();

    let riders: PagedResponse<KycInfo> =
        list_kyc(&mut persistence, &admin, KycKind::Rider, &KycQuery::default()).unwrap();
    assert_eq!(riders.total, 1);
    assert_eq!(riders.items[0].user_id, rider.user_id);

    let fetched: KycInfo =
        get_kyc(&mut persistence, &admin, KycKind::Rider, rider_kyc.kyc_id).unwrap();
    assert_eq!(fetched.email, rider.email);

    let mine: KycInfo = get_my_kyc(&mut persistence, &rider, KycKind::Rider).unwrap();
    assert_eq!(mine.kyc_id, rider_kyc.kyc_id);
    assert!(matches!(
        get_my_kyc(&mut persistence, &rider, KycKind::FleetOwner),
        Err(ApiError::ResourceNotFound { .. })
    ));

    assert!(matches!(
        list_kyc(&mut persistence, &rider, KycKind::Rider, &KycQuery::default()),
        Err(ApiError::Unauthorized { .. })
    ));
}

#[test]
fn test_delete_is_audited() {
    let mut persistence = setup_test_persistence();
    let admin: AuthenticatedActor = create_test_admin(&mut persistence);
    let rider: AuthenticatedActor = create_test_rider(&mut persistence);
    let submitted: KycInfo = submit_kyc(
        &mut persistence,
        &rider,
        create_test_rider_kyc_draft(&rider.email),
    )
    .unwrap();

    delete_kyc(&mut persistence, &admin, KycKind::Rider, submitted.kyc_id).unwrap();
    assert!(matches!(
        get_kyc(&mut persistence, &admin, KycKind::Rider, submitted.kyc_id),
        Err(ApiError::ResourceNotFound { .. })
    ));

    let events: Vec<AuditEventInfo> =
        list_audit_events(&mut persistence, &admin, "rider_kyc", submitted.kyc_id).unwrap();
    let last: &AuditEventInfo = events.last().expect("Deletion should be audited");
    assert_eq!(last.action, "DeleteKyc");
    assert_eq!(last.after, "none");
}
