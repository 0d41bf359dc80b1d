// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::schedule::Schedule;
use crate::validation::{normalize_optional, validate_required};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Review state of a pause request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PauseStatus {
    Pending,
    Approved,
    Rejected,
}

impl PauseStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" | "approve" => Ok(Self::Approved),
            "rejected" | "reject" => Ok(Self::Rejected),
            _ => Err(DomainError::InvalidStatus {
                kind: "pause",
                value: s.to_string(),
            }),
        }
    }

    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected)
    }

    /// Validates an admin decision.
    ///
    /// `pending -> approved | rejected`; `approved -> rejected` lifts an
    /// active pause. Nothing returns to `pending`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` for any other move.
    pub fn validate_transition(&self, new_status: Self) -> Result<(), DomainError> {
        let valid: bool = match self {
            Self::Pending => matches!(new_status, Self::Approved | Self::Rejected),
            Self::Approved => matches!(new_status, Self::Rejected),
            Self::Rejected => false,
        };

        if valid {
            Ok(())
        } else {
            Err(DomainError::InvalidStatusTransition {
                entity: "pause",
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: String::from("transition not permitted by pause lifecycle"),
            })
        }
    }
}

impl FromStr for PauseStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

/// A request to take a car off the market for a window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PauseRequest {
    pub pause_id: Option<i64>,
    pub car_id: i64,
    pub requested_by: i64,
    pub reason: String,
    pub schedule: Schedule,
    pub note: Option<String>,
    pub status: PauseStatus,
    pub decided_by: Option<i64>,
}

impl PauseRequest {
    /// Builds a pause request.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidField` if the reason is blank.
    pub fn new(
        car_id: i64,
        requested_by: i64,
        reason: &str,
        schedule: Schedule,
        note: Option<&str>,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            pause_id: None,
            car_id,
            requested_by,
            reason: validate_required("reason", reason)?,
            schedule,
            note: normalize_optional(note),
            status: PauseStatus::Pending,
            decided_by: None,
        })
    }

    #[must_use]
    pub fn snapshot(&self) -> String {
        format!(
            "pause_id={},car_id={},window={}..{},status={}",
            self.pause_id
                .map_or_else(|| String::from("new"), |id| id.to_string()),
            self.car_id,
            self.schedule.starts_at(),
            self.schedule.ends_at(),
            self.status.as_str()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_decisions() {
        assert!(
            PauseStatus::Pending
                .validate_transition(PauseStatus::Approved)
                .is_ok()
        );
        assert!(
            PauseStatus::Pending
                .validate_transition(PauseStatus::Rejected)
                .is_ok()
        );
    }

    #[test]
    fn test_approved_pause_can_be_lifted() {
        assert!(
            PauseStatus::Approved
                .validate_transition(PauseStatus::Rejected)
                .is_ok()
        );
        assert!(
            PauseStatus::Approved
                .validate_transition(PauseStatus::Pending)
                .is_err()
        );
    }

    #[test]
    fn test_rejected_is_terminal() {
        assert!(PauseStatus::Rejected.is_terminal());
        assert!(
            PauseStatus::Rejected
                .validate_transition(PauseStatus::Approved)
                .is_err()
        );
    }

    #[test]
    fn test_blank_reason_is_rejected() {
        let schedule: Schedule = match Schedule::parse("2024-07-01", "2024-07-03", "00:00", "23:59")
        {
            Ok(s) => s,
            Err(e) => panic!("{e}"),
        };
        let result: Result<PauseRequest, DomainError> =
            PauseRequest::new(1, 2, "   ", schedule, None);
        assert!(matches!(result, Err(DomainError::InvalidField { .. })));
    }
}
