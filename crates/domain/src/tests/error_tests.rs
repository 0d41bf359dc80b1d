// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{DateRange, DomainError, TimeRange};

#[test]
fn test_range_errors_use_the_published_wording() {
    let date_error: DomainError = DateRange::parse("2024-06-02", "2024-06-01").unwrap_err();
    assert_eq!(
        date_error.to_string(),
        "date.from must be before or equal to date.to"
    );

    let time_error: DomainError = TimeRange::parse("17:00", "09:00").unwrap_err();
    assert_eq!(time_error.to_string(), "time.from must be before time.to");
}

#[test]
fn test_locked_kyc_field_message_names_refer_code() {
    let error: DomainError = DomainError::KycFieldLocked {
        field: String::from("selfie"),
    };
    assert!(error.to_string().contains("only referCode can be updated"));
}

#[test]
fn test_coordinate_error_names_bounds() {
    let error: DomainError = DomainError::InvalidCoordinate {
        axis: "latitude",
        value: String::from("91"),
    };
    assert_eq!(error.to_string(), "latitude 91 must be within -90 and 90");
}
