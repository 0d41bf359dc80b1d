// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Verification ledgers for riders and fleet owners.
//!
//! Records are keyed by the owning identity, never by email. Any submission
//! or material edit sends the record back to `pending`; once `approved`, the
//! owner may only touch the referral code.

use crate::error::DomainError;
use crate::types::Role;
use crate::validation::{normalize_optional, validate_email, validate_required, validate_url};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Fields an owner may still edit on an approved record.
pub const APPROVED_EDITABLE_FIELDS: &[&str] = &["refer_code"];

/// Which ledger a record lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KycKind {
    Rider,
    FleetOwner,
}

impl KycKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Rider => "rider",
            Self::FleetOwner => "fleetowner",
        }
    }

    /// The ledger an identity of `role` submits to. Admins have none.
    #[must_use]
    pub const fn for_role(role: Role) -> Option<Self> {
        match role {
            Role::Rider => Some(Self::Rider),
            Role::FleetOwner => Some(Self::FleetOwner),
            Role::Admin => None,
        }
    }
}

impl FromStr for KycKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Role::parse(s) {
            Ok(Role::Rider) => Ok(Self::Rider),
            Ok(Role::FleetOwner) => Ok(Self::FleetOwner),
            _ => Err(DomainError::InvalidField {
                field: String::from("kind"),
                message: format!("unknown KYC ledger '{s}'"),
            }),
        }
    }
}

/// Review state of a KYC record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KycStatus {
    Pending,
    Approved,
    Rejected,
    /// Rider ledger only.
    Block,
}

impl KycStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Block => "block",
        }
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" | "approve" => Ok(Self::Approved),
            "rejected" | "reject" => Ok(Self::Rejected),
            "block" | "blocked" => Ok(Self::Block),
            _ => Err(DomainError::InvalidStatus {
                kind: "kyc",
                value: s.to_string(),
            }),
        }
    }

    /// Validates an admin decision from this status to `decision`.
    ///
    /// Callers treat repeating the current status as a no-op, except for
    /// approving an approved record, which is reported.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::KycAlreadyApproved` on a repeat approval, or
    /// `DomainError::InvalidStatus` if the ledger does not know `decision`
    /// (`pending` is never an admin decision; `block` is rider only).
    pub fn validate_decision(&self, kind: KycKind, decision: Self) -> Result<(), DomainError> {
        let known: bool = match decision {
            Self::Approved | Self::Rejected => true,
            Self::Block => kind == KycKind::Rider,
            Self::Pending => false,
        };
        if !known {
            return Err(DomainError::InvalidStatus {
                kind: "kyc decision",
                value: decision.as_str().to_string(),
            });
        }
        if *self == Self::Approved && decision == Self::Approved {
            return Err(DomainError::KycAlreadyApproved);
        }
        Ok(())
    }

    /// Decides the status after an owner edits the fields in `touched`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EmptyUpdate` when nothing is touched,
    /// `DomainError::KycBlocked` for blocked records, or
    /// `DomainError::KycFieldLocked` when an approved record's locked field
    /// is touched.
    pub fn after_self_update(&self, touched: &[&'static str]) -> Result<Self, DomainError> {
        if touched.is_empty() {
            return Err(DomainError::EmptyUpdate);
        }
        match self {
            Self::Block => Err(DomainError::KycBlocked),
            Self::Approved => {
                if let Some(field) = touched
                    .iter()
                    .find(|field| !APPROVED_EDITABLE_FIELDS.contains(field))
                {
                    return Err(DomainError::KycFieldLocked {
                        field: (*field).to_string(),
                    });
                }
                Ok(Self::Approved)
            }
            Self::Pending | Self::Rejected => Ok(Self::Pending),
        }
    }
}

impl FromStr for KycStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

/// Rider verification data: identity plus document URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiderKycProfile {
    pub full_name: String,
    pub email: String,
    pub refer_code: Option<String>,
    pub selfie: String,
    pub aadhar_front: String,
    pub aadhar_back: String,
    pub driving_license_front: String,
    pub driving_license_back: String,
}

/// Fleet-owner verification data: identity, payout and tax details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FleetOwnerKycProfile {
    pub full_name: String,
    pub email: String,
    pub refer_code: Option<String>,
    pub account_number: String,
    pub ifsc_code: String,
    pub bank_name: String,
    pub upi_id: Option<String>,
    pub gpay_number: Option<String>,
    pub phonepe_number: Option<String>,
    pub pan_number: String,
    pub passbook: String,
    pub pan_card: String,
    pub gst_number: Option<String>,
    pub gst_certificate: Option<String>,
}

/// Unvalidated rider fields. Used whole for submissions and sparse for
/// self-updates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RiderKycDraft {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub refer_code: Option<String>,
    pub selfie: Option<String>,
    pub aadhar_front: Option<String>,
    pub aadhar_back: Option<String>,
    pub driving_license_front: Option<String>,
    pub driving_license_back: Option<String>,
}

/// Unvalidated fleet-owner fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FleetOwnerKycDraft {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub refer_code: Option<String>,
    pub account_number: Option<String>,
    pub ifsc_code: Option<String>,
    pub bank_name: Option<String>,
    pub upi_id: Option<String>,
    pub gpay_number: Option<String>,
    pub phonepe_number: Option<String>,
    pub pan_number: Option<String>,
    pub passbook: Option<String>,
    pub pan_card: Option<String>,
    pub gst_number: Option<String>,
    pub gst_certificate: Option<String>,
}

fn required(field: &str, value: Option<&String>) -> Result<String, DomainError> {
    validate_required(field, value.map_or("", String::as_str))
}

fn required_url(field: &str, value: Option<&String>) -> Result<String, DomainError> {
    validate_url(field, value.map_or("", String::as_str))
}

fn optional_url(field: &str, value: Option<&String>) -> Result<Option<String>, DomainError> {
    match normalize_optional(value.map(String::as_str)) {
        Some(url) => validate_url(field, &url).map(Some),
        None => Ok(None),
    }
}

fn touched(pairs: &[(&'static str, bool)]) -> Vec<&'static str> {
    pairs
        .iter()
        .filter(|(_, present)| *present)
        .map(|(name, _)| *name)
        .collect()
}

fn or_keep(update: Option<&String>, current: &str) -> Option<String> {
    update.cloned().or_else(|| Some(current.to_string()))
}

fn or_keep_optional(update: Option<&String>, current: Option<&String>) -> Option<String> {
    update.or(current).cloned()
}

impl RiderKycDraft {
    /// Validates a complete submission.
    ///
    /// # Errors
    ///
    /// Returns the first missing or malformed field.
    pub fn to_profile(&self) -> Result<RiderKycProfile, DomainError> {
        Ok(RiderKycProfile {
            full_name: required("full_name", self.full_name.as_ref())?,
            email: validate_email(self.email.as_deref().unwrap_or_default())?,
            refer_code: normalize_optional(self.refer_code.as_deref()),
            selfie: required_url("selfie", self.selfie.as_ref())?,
            aadhar_front: required_url("aadhar_front", self.aadhar_front.as_ref())?,
            aadhar_back: required_url("aadhar_back", self.aadhar_back.as_ref())?,
            driving_license_front: required_url(
                "driving_license_front",
                self.driving_license_front.as_ref(),
            )?,
            driving_license_back: required_url(
                "driving_license_back",
                self.driving_license_back.as_ref(),
            )?,
        })
    }

    /// Names of the fields this draft sets.
    #[must_use]
    pub fn touched_fields(&self) -> Vec<&'static str> {
        touched(&[
            ("full_name", self.full_name.is_some()),
            ("email", self.email.is_some()),
            ("refer_code", self.refer_code.is_some()),
            ("selfie", self.selfie.is_some()),
            ("aadhar_front", self.aadhar_front.is_some()),
            ("aadhar_back", self.aadhar_back.is_some()),
            ("driving_license_front", self.driving_license_front.is_some()),
            ("driving_license_back", self.driving_license_back.is_some()),
        ])
    }

    /// Overlays this draft on `current` and revalidates the result.
    ///
    /// # Errors
    ///
    /// Returns the first invalid merged field.
    pub fn merge_into(&self, current: &RiderKycProfile) -> Result<RiderKycProfile, DomainError> {
        Self {
            full_name: or_keep(self.full_name.as_ref(), &current.full_name),
            email: or_keep(self.email.as_ref(), &current.email),
            refer_code: or_keep_optional(self.refer_code.as_ref(), current.refer_code.as_ref()),
            selfie: or_keep(self.selfie.as_ref(), &current.selfie),
            aadhar_front: or_keep(self.aadhar_front.as_ref(), &current.aadhar_front),
            aadhar_back: or_keep(self.aadhar_back.as_ref(), &current.aadhar_back),
            driving_license_front: or_keep(
                self.driving_license_front.as_ref(),
                &current.driving_license_front,
            ),
            driving_license_back: or_keep(
                self.driving_license_back.as_ref(),
                &current.driving_license_back,
            ),
        }
        .to_profile()
    }
}

impl FleetOwnerKycDraft {
    /// Validates a complete submission.
    ///
    /// # Errors
    ///
    /// Returns the first missing or malformed field.
    pub fn to_profile(&self) -> Result<FleetOwnerKycProfile, DomainError> {
        Ok(FleetOwnerKycProfile {
            full_name: required("full_name", self.full_name.as_ref())?,
            email: validate_email(self.email.as_deref().unwrap_or_default())?,
            refer_code: normalize_optional(self.refer_code.as_deref()),
            account_number: required("account_number", self.account_number.as_ref())?,
            ifsc_code: required("ifsc_code", self.ifsc_code.as_ref())?.to_uppercase(),
            bank_name: required("bank_name", self.bank_name.as_ref())?,
            upi_id: normalize_optional(self.upi_id.as_deref()),
            gpay_number: normalize_optional(self.gpay_number.as_deref()),
            phonepe_number: normalize_optional(self.phonepe_number.as_deref()),
            pan_number: required("pan_number", self.pan_number.as_ref())?.to_uppercase(),
            passbook: required_url("passbook", self.passbook.as_ref())?,
            pan_card: required_url("pan_card", self.pan_card.as_ref())?,
            gst_number: normalize_optional(self.gst_number.as_deref()),
            gst_certificate: optional_url("gst_certificate", self.gst_certificate.as_ref())?,
        })
    }

    #[must_use]
    pub fn touched_fields(&self) -> Vec<&'static str> {
        touched(&[
            ("full_name", self.full_name.is_some()),
            ("email", self.email.is_some()),
            ("refer_code", self.refer_code.is_some()),
            ("account_number", self.account_number.is_some()),
            ("ifsc_code", self.ifsc_code.is_some()),
            ("bank_name", self.bank_name.is_some()),
            ("upi_id", self.upi_id.is_some()),
            ("gpay_number", self.gpay_number.is_some()),
            ("phonepe_number", self.phonepe_number.is_some()),
            ("pan_number", self.pan_number.is_some()),
            ("passbook", self.passbook.is_some()),
            ("pan_card", self.pan_card.is_some()),
            ("gst_number", self.gst_number.is_some()),
            ("gst_certificate", self.gst_certificate.is_some()),
        ])
    }

    /// Overlays this draft on `current` and revalidates the result.
    ///
    /// # Errors
    ///
    /// Returns the first invalid merged field.
    pub fn merge_into(
        &self,
        current: &FleetOwnerKycProfile,
    ) -> Result<FleetOwnerKycProfile, DomainError> {
        Self {
            full_name: or_keep(self.full_name.as_ref(), &current.full_name),
            email: or_keep(self.email.as_ref(), &current.email),
            refer_code: or_keep_optional(self.refer_code.as_ref(), current.refer_code.as_ref()),
            account_number: or_keep(self.account_number.as_ref(), &current.account_number),
            ifsc_code: or_keep(self.ifsc_code.as_ref(), &current.ifsc_code),
            bank_name: or_keep(self.bank_name.as_ref(), &current.bank_name),
            upi_id: or_keep_optional(self.upi_id.as_ref(), current.upi_id.as_ref()),
            gpay_number: or_keep_optional(self.gpay_number.as_ref(), current.gpay_number.as_ref()),
            phonepe_number: or_keep_optional(
                self.phonepe_number.as_ref(),
                current.phonepe_number.as_ref(),
            ),
            pan_number: or_keep(self.pan_number.as_ref(), &current.pan_number),
            passbook: or_keep(self.passbook.as_ref(), &current.passbook),
            pan_card: or_keep(self.pan_card.as_ref(), &current.pan_card),
            gst_number: or_keep_optional(self.gst_number.as_ref(), current.gst_number.as_ref()),
            gst_certificate: or_keep_optional(
                self.gst_certificate.as_ref(),
                current.gst_certificate.as_ref(),
            ),
        }
        .to_profile()
    }
}

/// Verification data of either ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KycProfile {
    Rider(RiderKycProfile),
    FleetOwner(FleetOwnerKycProfile),
}

impl KycProfile {
    #[must_use]
    pub const fn kind(&self) -> KycKind {
        match self {
            Self::Rider(_) => KycKind::Rider,
            Self::FleetOwner(_) => KycKind::FleetOwner,
        }
    }

    #[must_use]
    pub fn email(&self) -> &str {
        match self {
            Self::Rider(profile) => &profile.email,
            Self::FleetOwner(profile) => &profile.email,
        }
    }

    #[must_use]
    pub fn full_name(&self) -> &str {
        match self {
            Self::Rider(profile) => &profile.full_name,
            Self::FleetOwner(profile) => &profile.full_name,
        }
    }
}

/// Unvalidated fields of either ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KycDraft {
    Rider(RiderKycDraft),
    FleetOwner(FleetOwnerKycDraft),
}

impl KycDraft {
    #[must_use]
    pub const fn kind(&self) -> KycKind {
        match self {
            Self::Rider(_) => KycKind::Rider,
            Self::FleetOwner(_) => KycKind::FleetOwner,
        }
    }

    /// Validates a complete submission.
    ///
    /// # Errors
    ///
    /// Returns the first missing or malformed field.
    pub fn to_profile(&self) -> Result<KycProfile, DomainError> {
        match self {
            Self::Rider(draft) => draft.to_profile().map(KycProfile::Rider),
            Self::FleetOwner(draft) => draft.to_profile().map(KycProfile::FleetOwner),
        }
    }

    #[must_use]
    pub fn touched_fields(&self) -> Vec<&'static str> {
        match self {
            Self::Rider(draft) => draft.touched_fields(),
            Self::FleetOwner(draft) => draft.touched_fields(),
        }
    }

    /// Overlays the draft on a profile of the same ledger.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::KycKindMismatch` across ledgers, or the first
    /// invalid merged field.
    pub fn merge_into(&self, current: &KycProfile) -> Result<KycProfile, DomainError> {
        match (self, current) {
            (Self::Rider(draft), KycProfile::Rider(profile)) => {
                draft.merge_into(profile).map(KycProfile::Rider)
            }
            (Self::FleetOwner(draft), KycProfile::FleetOwner(profile)) => {
                draft.merge_into(profile).map(KycProfile::FleetOwner)
            }
            _ => Err(DomainError::KycKindMismatch {
                expected: current.kind().as_str(),
                actual: self.kind().as_str(),
            }),
        }
    }
}

/// One identity's record in a verification ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KycRecord {
    pub kyc_id: Option<i64>,
    pub user_id: i64,
    pub profile: KycProfile,
    pub status: KycStatus,
    pub admin_note: Option<String>,
    pub reviewed_by: Option<i64>,
}

impl KycRecord {
    #[must_use]
    pub const fn kind(&self) -> KycKind {
        self.profile.kind()
    }

    #[must_use]
    pub const fn is_approved(&self) -> bool {
        matches!(self.status, KycStatus::Approved)
    }

    #[must_use]
    pub fn snapshot(&self) -> String {
        format!(
            "kyc_id={},kind={},user_id={},status={}",
            self.kyc_id
                .map_or_else(|| String::from("new"), |id| id.to_string()),
            self.kind().as_str(),
            self.user_id,
            self.status.as_str()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rider_draft() -> RiderKycDraft {
        RiderKycDraft {
            full_name: Some(String::from("Asha Rao")),
            email: Some(String::from("Asha@Example.com")),
            refer_code: None,
            selfie: Some(String::from("https://cdn.example.com/kyc/selfie.jpg")),
            aadhar_front: Some(String::from("https://cdn.example.com/kyc/af.jpg")),
            aadhar_back: Some(String::from("https://cdn.example.com/kyc/ab.jpg")),
            driving_license_front: Some(String::from("https://cdn.example.com/kyc/df.jpg")),
            driving_license_back: Some(String::from("https://cdn.example.com/kyc/db.jpg")),
        }
    }

    #[test]
    fn test_complete_rider_draft_validates() {
        let profile: RiderKycProfile = match rider_draft().to_profile() {
            Ok(p) => p,
            Err(e) => panic!("{e}"),
        };
        assert_eq!(profile.email, "asha@example.com");
        assert_eq!(profile.refer_code, None);
    }

    #[test]
    fn test_missing_document_is_rejected() {
        let mut draft: RiderKycDraft = rider_draft();
        draft.aadhar_back = None;
        assert!(matches!(
            draft.to_profile(),
            Err(DomainError::InvalidField { field, .. }) if field == "aadhar_back"
        ));
    }

    #[test]
    fn test_block_is_rider_only() {
        assert!(
            KycStatus::Pending
                .validate_decision(KycKind::Rider, KycStatus::Block)
                .is_ok()
        );
        assert!(matches!(
            KycStatus::Pending.validate_decision(KycKind::FleetOwner, KycStatus::Block),
            Err(DomainError::InvalidStatus { .. })
        ));
    }

    #[test]
    fn test_repeat_approval_is_reported() {
        assert_eq!(
            KycStatus::Approved.validate_decision(KycKind::Rider, KycStatus::Approved),
            Err(DomainError::KycAlreadyApproved)
        );
        assert!(
            KycStatus::Rejected
                .validate_decision(KycKind::Rider, KycStatus::Rejected)
                .is_ok()
        );
    }

    #[test]
    fn test_pending_is_not_a_decision() {
        assert!(
            KycStatus::Approved
                .validate_decision(KycKind::Rider, KycStatus::Pending)
                .is_err()
        );
    }

    #[test]
    fn test_approved_record_only_allows_refer_code() {
        assert_eq!(
            KycStatus::Approved.after_self_update(&["refer_code"]),
            Ok(KycStatus::Approved)
        );
        assert_eq!(
            KycStatus::Approved.after_self_update(&["refer_code", "selfie"]),
            Err(DomainError::KycFieldLocked {
                field: String::from("selfie")
            })
        );
    }

    #[test]
    fn test_rejected_record_returns_to_pending_on_edit() {
        assert_eq!(
            KycStatus::Rejected.after_self_update(&["selfie"]),
            Ok(KycStatus::Pending)
        );
    }

    #[test]
    fn test_blocked_record_cannot_self_update() {
        assert_eq!(
            KycStatus::Block.after_self_update(&["refer_code"]),
            Err(DomainError::KycBlocked)
        );
    }

    #[test]
    fn test_empty_update_is_rejected() {
        assert_eq!(
            KycStatus::Pending.after_self_update(&[]),
            Err(DomainError::EmptyUpdate)
        );
    }

    #[test]
    fn test_merge_keeps_untouched_fields() {
        let current: RiderKycProfile = match rider_draft().to_profile() {
            Ok(p) => p,
            Err(e) => panic!("{e}"),
        };
        let patch: RiderKycDraft = RiderKycDraft {
            refer_code: Some(String::from("FRIEND10")),
            ..RiderKycDraft::default()
        };
        assert_eq!(patch.touched_fields(), vec!["refer_code"]);
        let merged: RiderKycProfile = match patch.merge_into(&current) {
            Ok(p) => p,
            Err(e) => panic!("{e}"),
        };
        assert_eq!(merged.refer_code.as_deref(), Some("FRIEND10"));
        assert_eq!(merged.selfie, current.selfie);
    }

    #[test]
    fn test_merge_across_ledgers_is_rejected() {
        let current: KycProfile = match rider_draft().to_profile() {
            Ok(p) => KycProfile::Rider(p),
            Err(e) => panic!("{e}"),
        };
        let patch: KycDraft = KycDraft::FleetOwner(FleetOwnerKycDraft::default());
        assert!(matches!(
            patch.merge_into(&current),
            Err(DomainError::KycKindMismatch { .. })
        ));
    }

    #[test]
    fn test_kind_parsing_follows_role_casing() {
        assert_eq!("FleetOwner".parse(), Ok(KycKind::FleetOwner));
        assert_eq!("rider".parse(), Ok(KycKind::Rider));
        assert!("admin".parse::<KycKind>().is_err());
    }
}
