// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use carhive::{KycCommand, TransitionResult, apply_kyc};
use carhive_audit::{Action, Actor, AuditEvent, EntityKind, EntityRef, StateSnapshot};
use carhive_domain::{
    FleetOwnerKycDraft, KycDraft, KycKind, KycProfile, KycRecord, KycStatus, RiderKycDraft, Role,
};

use super::{
    create_test_identity, create_test_persistence, create_test_rider_kyc,
    create_test_rider_kyc_draft,
};
use crate::{Persistence, PersistenceError};

fn setup() -> (Persistence, Actor, Actor) {
    let mut persistence: Persistence = create_test_persistence();
    let admin: Actor = create_test_identity(&mut persistence, Role::Admin, "admin@example.com");
    let rider: Actor = create_test_identity(&mut persistence, Role::Rider, "rider@example.com");
    (persistence, admin, rider)
}

#[test]
fn test_rider_kyc_round_trips() {
    let (mut persistence, admin, rider) = setup();
    let record: KycRecord =
        create_test_rider_kyc(&mut persistence, rider, admin, KycStatus::Pending);

    let stored: KycRecord = persistence
        .get_kyc_for_user(rider.user_id, KycKind::Rider)
        .unwrap()
        .unwrap();
    assert_eq!(stored, record);
    assert!(
        persistence
            .get_kyc_for_user(rider.user_id, KycKind::FleetOwner)
            .unwrap()
            .is_none()
    );
    assert!(
        persistence
            .get_kyc(record.kyc_id.unwrap(), KycKind::FleetOwner)
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_approval_opens_the_booking_gate() {
    let (mut persistence, admin, rider) = setup();
    let record: KycRecord =
        create_test_rider_kyc(&mut persistence, rider, admin, KycStatus::Pending);
    assert!(!persistence.is_rider_kyc_approved(rider.user_id).unwrap());

    let decided: TransitionResult<KycRecord> = apply_kyc(
        Some(&record),
        KycCommand::Decide {
            status: KycStatus::Approved,
            note: Some(String::from("documents verified")),
        },
        admin,
    )
    .unwrap();
    persistence.persist_kyc_transition(&decided).unwrap();

    assert!(persistence.is_rider_kyc_approved(rider.user_id).unwrap());
    let stored: KycRecord = persistence
        .get_kyc(record.kyc_id.unwrap(), KycKind::Rider)
        .unwrap()
        .unwrap();
    assert_eq!(stored.admin_note.as_deref(), Some("documents verified"));
    assert_eq!(stored.reviewed_by, Some(admin.user_id));
}

#[test]
fn test_resubmission_keeps_one_record() {
    let (mut persistence, admin, rider) = setup();
    let rejected: KycRecord =
        create_test_rider_kyc(&mut persistence, rider, admin, KycStatus::Rejected);

    let mut draft: RiderKycDraft = create_test_rider_kyc_draft("ravi@example.com");
    draft.selfie = Some(String::from("https://cdn.example.com/kyc/s2.jpg"));
    let resubmitted: TransitionResult<KycRecord> = apply_kyc(
        Some(&rejected),
        KycCommand::Submit {
            draft: KycDraft::Rider(draft),
        },
        rider,
    )
    .unwrap();
    let kyc_id: i64 = persistence.persist_kyc_transition(&resubmitted).unwrap();

    assert_eq!(Some(kyc_id), rejected.kyc_id);
    let all: Vec<KycRecord> = persistence.list_kyc(KycKind::Rider, None).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].status, KycStatus::Pending);
    assert!(
        persistence
            .list_kyc(KycKind::Rider, Some(KycStatus::Rejected))
            .unwrap()
            .is_empty()
    );
}

#[test]
fn test_fleet_owner_profile_round_trips() {
    let (mut persistence, _admin, _rider) = setup();
    let owner: Actor =
        create_test_identity(&mut persistence, Role::FleetOwner, "fleet@example.com");
    let draft: FleetOwnerKycDraft = FleetOwnerKycDraft {
        full_name: Some(String::from("Asha Fleet")),
        email: Some(String::from("fleet@example.com")),
        refer_code: None,
        account_number: Some(String::from("001122334455")),
        ifsc_code: Some(String::from("hdfc0001234")),
        bank_name: Some(String::from("HDFC")),
        upi_id: Some(String::from("asha@upi")),
        gpay_number: None,
        phonepe_number: None,
        pan_number: Some(String::from("abcde1234f")),
        passbook: Some(String::from("https://cdn.example.com/kyc/pb.pdf")),
        pan_card: Some(String::from("https://cdn.example.com/kyc/pan.jpg")),
        gst_number: None,
        gst_certificate: None,
    };
    let result: TransitionResult<KycRecord> = apply_kyc(
        None,
        KycCommand::Submit {
            draft: KycDraft::FleetOwner(draft),
        },
        owner,
    )
    .unwrap();
    let kyc_id: i64 = persistence.persist_kyc_transition(&result).unwrap();

    let stored: KycRecord = persistence
        .get_kyc(kyc_id, KycKind::FleetOwner)
        .unwrap()
        .unwrap();
    let KycProfile::FleetOwner(profile) = &stored.profile else {
        panic!("expected a fleet owner profile");
    };
    assert_eq!(profile.ifsc_code, "HDFC0001234");
    assert_eq!(profile.pan_number, "ABCDE1234F");
    assert_eq!(profile.upi_id.as_deref(), Some("asha@upi"));
    assert_eq!(stored.profile, result.new_state.profile);
}

#[test]
fn test_delete_kyc_removes_record_and_audits() {
    let (mut persistence, admin, rider) = setup();
    let record: KycRecord =
        create_test_rider_kyc(&mut persistence, rider, admin, KycStatus::Approved);
    let kyc_id: i64 = record.kyc_id.unwrap();

    let event: AuditEvent = AuditEvent::new(
        admin,
        Action::new(String::from("DeleteKyc"), None),
        EntityRef::new(EntityKind::RiderKyc, None),
        StateSnapshot::new(record.snapshot()),
        StateSnapshot::new(String::from("deleted")),
    );
    persistence.delete_kyc(kyc_id, &event).unwrap();

    assert!(persistence.get_kyc(kyc_id, KycKind::Rider).unwrap().is_none());
    assert!(!persistence.is_rider_kyc_approved(rider.user_id).unwrap());
    let events: Vec<AuditEvent> = persistence
        .list_audit_events(EntityKind::RiderKyc, kyc_id)
        .unwrap();
    assert_eq!(events.last().unwrap().action.name, "DeleteKyc");

    let again: Result<(), PersistenceError> = persistence.delete_kyc(kyc_id, &event);
    assert!(matches!(again, Err(PersistenceError::NotFound(_))));
}
