// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use carhive_domain::{
    FleetOwnerKycProfile, KycProfile, PauseStatus, PublicationStatus, RiderKycProfile, Role,
    RideStatus, User,
};
use serde::{Deserialize, Serialize};
use time::Date;

/// A stored identity, including its password hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserData {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: Role,
    pub password_hash: String,
    pub created_at: String,
}

impl UserData {
    /// The identity without its credential.
    #[must_use]
    pub fn to_user(&self) -> User {
        User {
            user_id: Some(self.user_id),
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            role: self.role,
        }
    }
}

/// A stored bearer session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionData {
    pub session_id: i64,
    pub session_token: String,
    pub user_id: i64,
    pub created_at: String,
    pub last_activity_at: String,
    pub expires_at: String,
}

/// Rider KYC fields kept in `details_json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiderKycDetailsData {
    pub selfie: String,
    pub aadhar_front: String,
    pub aadhar_back: String,
    pub driving_license_front: String,
    pub driving_license_back: String,
}

/// Fleet-owner KYC fields kept in `details_json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FleetOwnerKycDetailsData {
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

/// Serializes the ledger-specific part of a profile.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub(crate) fn kyc_details_json(profile: &KycProfile) -> Result<String, serde_json::Error> {
    match profile {
        KycProfile::Rider(p) => serde_json::to_string(&RiderKycDetailsData {
            selfie: p.selfie.clone(),
            aadhar_front: p.aadhar_front.clone(),
            aadhar_back: p.aadhar_back.clone(),
            driving_license_front: p.driving_license_front.clone(),
            driving_license_back: p.driving_license_back.clone(),
        }),
        KycProfile::FleetOwner(p) => serde_json::to_string(&FleetOwnerKycDetailsData {
            account_number: p.account_number.clone(),
            ifsc_code: p.ifsc_code.clone(),
            bank_name: p.bank_name.clone(),
            upi_id: p.upi_id.clone(),
            gpay_number: p.gpay_number.clone(),
            phonepe_number: p.phonepe_number.clone(),
            pan_number: p.pan_number.clone(),
            passbook: p.passbook.clone(),
            pan_card: p.pan_card.clone(),
            gst_number: p.gst_number.clone(),
            gst_certificate: p.gst_certificate.clone(),
        }),
    }
}

impl RiderKycDetailsData {
    pub(crate) fn into_profile(
        self,
        full_name: String,
        email: String,
        refer_code: Option<String>,
    ) -> RiderKycProfile {
        RiderKycProfile {
            full_name,
            email,
            refer_code,
            selfie: self.selfie,
            aadhar_front: self.aadhar_front,
            aadhar_back: self.aadhar_back,
            driving_license_front: self.driving_license_front,
            driving_license_back: self.driving_license_back,
        }
    }
}

impl FleetOwnerKycDetailsData {
    pub(crate) fn into_profile(
        self,
        full_name: String,
        email: String,
        refer_code: Option<String>,
    ) -> FleetOwnerKycProfile {
        FleetOwnerKycProfile {
            full_name,
            email,
            refer_code,
            account_number: self.account_number,
            ifsc_code: self.ifsc_code,
            bank_name: self.bank_name,
            upi_id: self.upi_id,
            gpay_number: self.gpay_number,
            phonepe_number: self.phonepe_number,
            pan_number: self.pan_number,
            passbook: self.passbook,
            pan_card: self.pan_card,
            gst_number: self.gst_number,
            gst_certificate: self.gst_certificate,
        }
    }
}

/// Stored-column filters for car lookups. Computed availability is applied
/// by the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct CarFilter {
    pub owner_id: Option<i64>,
    pub publication: Option<PublicationStatus>,
    pub include_deleted: bool,
}

/// Stored-column filters for ride lookups.
#[derive(Debug, Clone, Copy, Default)]
pub struct RideFilter {
    pub car_id: Option<i64>,
    pub rider_id: Option<i64>,
    pub status: Option<RideStatus>,
    /// Rides starting on or after this date.
    pub from_date: Option<Date>,
    /// Rides ending on or before this date.
    pub to_date: Option<Date>,
}

/// Stored-column filters for pause lookups.
#[derive(Debug, Clone, Copy, Default)]
pub struct PauseFilter {
    pub car_id: Option<i64>,
    /// Restricts to pauses of cars owned by this identity.
    pub owner_id: Option<i64>,
    pub status: Option<PauseStatus>,
    pub from_date: Option<Date>,
    pub to_date: Option<Date>,
}

/// Stored-column filters for listing lookups.
#[derive(Debug, Clone, Default)]
pub struct ListingFilter {
    pub car_id: Option<i64>,
    /// Case-insensitive substring of the city.
    pub city: Option<String>,
    pub delivery_available: Option<bool>,
}
