// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Field-level validation shared by every workflow.

use crate::error::DomainError;

/// Minimum number of images a car listing must carry.
pub const MIN_CAR_IMAGES: usize = 5;
/// Maximum number of images a car listing may carry.
pub const MAX_CAR_IMAGES: usize = 10;

fn invalid(field: &str, message: &str) -> DomainError {
    DomainError::InvalidField {
        field: field.to_string(),
        message: message.to_string(),
    }
}

/// Trims a required text field.
///
/// # Errors
///
/// Returns `DomainError::InvalidField` if the value is blank.
pub fn validate_required(field: &str, value: &str) -> Result<String, DomainError> {
    let trimmed: &str = value.trim();
    if trimmed.is_empty() {
        return Err(invalid(field, "is required"));
    }
    Ok(trimmed.to_string())
}

/// Trims an optional text field, collapsing blank values to `None`.
#[must_use]
pub fn normalize_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

/// Validates and normalises an email address to lower case.
///
/// # Errors
///
/// Returns `DomainError::InvalidField` if the address is blank or has no
/// `local@domain` shape.
pub fn validate_email(email: &str) -> Result<String, DomainError> {
    let normalized: String = validate_required("email", email)?.to_lowercase();

    let valid: bool = normalized
        .split_once('@')
        .is_some_and(|(local, domain)| {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        })
        && !normalized.contains(char::is_whitespace);

    if !valid {
        return Err(invalid("email", "is not a valid address"));
    }
    Ok(normalized)
}

/// Validates an already-uploaded document or media URL.
///
/// # Errors
///
/// Returns `DomainError::InvalidField` if the value is blank or not an
/// `http(s)` URL.
pub fn validate_url(field: &str, value: &str) -> Result<String, DomainError> {
    let trimmed: String = validate_required(field, value)?;
    if !(trimmed.starts_with("https://") || trimmed.starts_with("http://")) {
        return Err(invalid(field, "must be an http(s) URL"));
    }
    Ok(trimmed)
}

/// Validates the image set of a car: 5 to 10 URLs.
///
/// # Errors
///
/// Returns `DomainError::InvalidImageCount` when the count is out of range,
/// or `DomainError::InvalidField` for a malformed URL.
pub fn validate_images(images: &[String]) -> Result<Vec<String>, DomainError> {
    if !(MIN_CAR_IMAGES..=MAX_CAR_IMAGES).contains(&images.len()) {
        return Err(DomainError::InvalidImageCount {
            count: images.len(),
        });
    }
    images
        .iter()
        .enumerate()
        .map(|(index, url)| validate_url(&format!("images[{index}]"), url))
        .collect()
}

/// Normalises a registration number: upper case, whitespace removed.
///
/// # Errors
///
/// Returns `DomainError::InvalidField` if nothing is left after normalising.
pub fn normalize_registration_number(value: &str) -> Result<String, DomainError> {
    let normalized: String = value
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();
    if normalized.is_empty() {
        return Err(invalid("registration_number", "is required"));
    }
    Ok(normalized)
}

/// Rejects negative amounts.
///
/// # Errors
///
/// Returns `DomainError::NegativeAmount` if `value < 0`.
pub const fn validate_non_negative(field: &'static str, value: i64) -> Result<i64, DomainError> {
    if value < 0 {
        return Err(DomainError::NegativeAmount { field, value });
    }
    Ok(value)
}

/// Validates a car's model year.
///
/// # Errors
///
/// Returns `DomainError::InvalidField` outside 1950..=2100.
pub fn validate_model_year(year: i32) -> Result<u16, DomainError> {
    u16::try_from(year)
        .ok()
        .filter(|y| (1950..=2100).contains(y))
        .ok_or_else(|| invalid("year", "must be between 1950 and 2100"))
}

/// Validates a seat count.
///
/// # Errors
///
/// Returns `DomainError::InvalidField` outside 1..=20.
pub fn validate_seats(seats: i64) -> Result<u8, DomainError> {
    u8::try_from(seats)
        .ok()
        .filter(|s| (1..=20).contains(s))
        .ok_or_else(|| invalid("seats", "must be between 1 and 20"))
}
