// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Marketplace wall clock.
//!
//! Ride and pause windows are wall-clock values with no offset attached; they
//! are interpreted in the marketplace's configured IANA timezone. This
//! module converts a UTC instant into that wall clock.

use crate::error::DomainError;
use chrono::{DateTime, Datelike, NaiveDateTime, Timelike, Utc};
use chrono_tz::Tz;
use time::{Date, Month, OffsetDateTime, PrimitiveDateTime, Time};

/// Parses an IANA timezone identifier such as `Asia/Kolkata`.
///
/// # Errors
///
/// Returns `DomainError::InvalidTimezone` for unknown identifiers.
pub fn parse_timezone(name: &str) -> Result<Tz, DomainError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| DomainError::InvalidTimezone(name.to_string()))
}

/// Converts a UTC instant into the marketplace-local wall clock.
///
/// # Errors
///
/// Returns `DomainError::InvalidField` if the instant is outside the range
/// both clocks can represent.
pub fn to_market_local(
    instant: OffsetDateTime,
    tz: Tz,
) -> Result<PrimitiveDateTime, DomainError> {
    let out_of_range = || DomainError::InvalidField {
        field: String::from("now"),
        message: format!("instant {instant} cannot be represented"),
    };

    let utc: DateTime<Utc> =
        DateTime::<Utc>::from_timestamp(instant.unix_timestamp(), instant.nanosecond())
            .ok_or_else(out_of_range)?;
    let local: NaiveDateTime = utc.with_timezone(&tz).naive_local();

    let month: Month = u8::try_from(local.month())
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .ok_or_else(out_of_range)?;
    let day: u8 = u8::try_from(local.day()).map_err(|_| out_of_range())?;
    let date: Date =
        Date::from_calendar_date(local.year(), month, day).map_err(|_| out_of_range())?;

    let hour: u8 = u8::try_from(local.hour()).map_err(|_| out_of_range())?;
    let minute: u8 = u8::try_from(local.minute()).map_err(|_| out_of_range())?;
    let second: u8 = u8::try_from(local.second()).map_err(|_| out_of_range())?;
    let time: Time = Time::from_hms(hour, minute, second).map_err(|_| out_of_range())?;

    Ok(PrimitiveDateTime::new(date, time))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_utc_is_identity() {
        let tz: Tz = match parse_timezone("UTC") {
            Ok(tz) => tz,
            Err(e) => panic!("{e}"),
        };
        assert_eq!(
            to_market_local(datetime!(2024-06-01 09:30 UTC), tz),
            Ok(datetime!(2024-06-01 09:30))
        );
    }

    #[test]
    fn test_half_hour_offset_zone() {
        let tz: Tz = match parse_timezone("Asia/Kolkata") {
            Ok(tz) => tz,
            Err(e) => panic!("{e}"),
        };
        assert_eq!(
            to_market_local(datetime!(2024-06-01 20:00 UTC), tz),
            Ok(datetime!(2024-06-02 01:30))
        );
    }

    #[test]
    fn test_unknown_zone_is_rejected() {
        assert_eq!(
            parse_timezone("Mars/Olympus"),
            Err(DomainError::InvalidTimezone(String::from("Mars/Olympus")))
        );
    }
}
