// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Date and time-of-day ranges used by rides, pauses and listings.
//!
//! A [`Schedule`] pairs a [`DateRange`] with a [`TimeRange`] and describes one
//! continuous window, from `date.from` at `time.from` until `date.to` at
//! `time.to`. All instants are wall-clock values in the marketplace timezone
//! (see [`crate::to_market_local`]).

use crate::error::DomainError;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, PrimitiveDateTime, Time};

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
const TIME_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[hour]:[minute]");

/// Parses a `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns `DomainError::DateParseError` if the string is malformed.
pub fn parse_date(value: &str) -> Result<Date, DomainError> {
    Date::parse(value.trim(), DATE_FORMAT).map_err(|e| DomainError::DateParseError {
        date_string: value.to_string(),
        error: e.to_string(),
    })
}

/// Parses a 24h `HH:MM` time.
///
/// # Errors
///
/// Returns `DomainError::TimeParseError` if the string is malformed.
pub fn parse_time(value: &str) -> Result<Time, DomainError> {
    Time::parse(value.trim(), TIME_FORMAT).map_err(|e| DomainError::TimeParseError {
        time_string: value.to_string(),
        error: e.to_string(),
    })
}

/// Formats a date as `YYYY-MM-DD`.
#[must_use]
pub fn format_date(date: Date) -> String {
    date.format(DATE_FORMAT).unwrap_or_default()
}

/// Formats a time as `HH:MM`.
#[must_use]
pub fn format_time(time: Time) -> String {
    time.format(TIME_FORMAT).unwrap_or_default()
}

/// An inclusive calendar range, `from <= to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    from: Date,
    to: Date,
}

impl DateRange {
    /// # Errors
    ///
    /// Returns `DomainError::InvalidDateRange` if `from > to`.
    pub fn new(from: Date, to: Date) -> Result<Self, DomainError> {
        if from > to {
            return Err(DomainError::InvalidDateRange { from, to });
        }
        Ok(Self { from, to })
    }

    /// Parses and validates a range from two `YYYY-MM-DD` strings.
    ///
    /// # Errors
    ///
    /// Returns an error if either date is malformed or the range is inverted.
    pub fn parse(from: &str, to: &str) -> Result<Self, DomainError> {
        Self::new(parse_date(from)?, parse_date(to)?)
    }

    #[must_use]
    pub const fn from(&self) -> Date {
        self.from
    }

    #[must_use]
    pub const fn to(&self) -> Date {
        self.to
    }

    /// True when `other` lies entirely within this range.
    #[must_use]
    pub fn contains_range(&self, other: &Self) -> bool {
        self.from <= other.from && other.to <= self.to
    }
}

/// A same-day time-of-day range, `from < to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    from: Time,
    to: Time,
}

impl TimeRange {
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTimeRange` unless `from < to`.
    pub fn new(from: Time, to: Time) -> Result<Self, DomainError> {
        if from >= to {
            return Err(DomainError::InvalidTimeRange { from, to });
        }
        Ok(Self { from, to })
    }

    /// Parses and validates a range from two `HH:MM` strings.
    ///
    /// # Errors
    ///
    /// Returns an error if either time is malformed or `from >= to`.
    pub fn parse(from: &str, to: &str) -> Result<Self, DomainError> {
        Self::new(parse_time(from)?, parse_time(to)?)
    }

    #[must_use]
    pub const fn from(&self) -> Time {
        self.from
    }

    #[must_use]
    pub const fn to(&self) -> Time {
        self.to
    }
}

/// A booking or pause window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub date: DateRange,
    pub time: TimeRange,
}

impl Schedule {
    #[must_use]
    pub const fn new(date: DateRange, time: TimeRange) -> Self {
        Self { date, time }
    }

    /// Parses all four parts. The date and time ranges are validated
    /// together, so a partial update cannot leave either half inverted.
    ///
    /// # Errors
    ///
    /// Returns the first parse or range error encountered.
    pub fn parse(
        date_from: &str,
        date_to: &str,
        time_from: &str,
        time_to: &str,
    ) -> Result<Self, DomainError> {
        Ok(Self::new(
            DateRange::parse(date_from, date_to)?,
            TimeRange::parse(time_from, time_to)?,
        ))
    }

    /// First instant of the window.
    #[must_use]
    pub const fn starts_at(&self) -> PrimitiveDateTime {
        PrimitiveDateTime::new(self.date.from, self.time.from)
    }

    /// Last instant of the window.
    #[must_use]
    pub const fn ends_at(&self) -> PrimitiveDateTime {
        PrimitiveDateTime::new(self.date.to, self.time.to)
    }

    /// True when `now` falls inside the window, bounds included.
    #[must_use]
    pub fn contains(&self, now: PrimitiveDateTime) -> bool {
        self.starts_at() <= now && now <= self.ends_at()
    }

    /// True once the window's last instant has passed.
    #[must_use]
    pub fn has_ended(&self, now: PrimitiveDateTime) -> bool {
        now > self.ends_at()
    }

    /// True when the two windows share at least one instant.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.starts_at() <= other.ends_at() && other.starts_at() <= self.ends_at()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime, time};

    fn june_first_booking() -> Schedule {
        match Schedule::parse("2024-06-01", "2024-06-02", "09:00", "17:00") {
            Ok(schedule) => schedule,
            Err(e) => panic!("valid schedule rejected: {e}"),
        }
    }

    #[test]
    fn test_parse_valid_schedule() {
        let schedule: Schedule = june_first_booking();
        assert_eq!(schedule.date.from(), date!(2024 - 06 - 01));
        assert_eq!(schedule.date.to(), date!(2024 - 06 - 02));
        assert_eq!(schedule.time.from(), time!(09:00));
        assert_eq!(schedule.time.to(), time!(17:00));
    }

    #[test]
    fn test_single_day_range_is_allowed() {
        assert!(DateRange::parse("2024-06-01", "2024-06-01").is_ok());
    }

    #[test]
    fn test_inverted_date_range_is_rejected() {
        let result: Result<DateRange, DomainError> = DateRange::parse("2024-06-03", "2024-06-02");
        assert!(matches!(result, Err(DomainError::InvalidDateRange { .. })));
    }

    #[test]
    fn test_equal_times_are_rejected() {
        let result: Result<TimeRange, DomainError> = TimeRange::parse("09:00", "09:00");
        assert!(matches!(result, Err(DomainError::InvalidTimeRange { .. })));
    }

    #[test]
    fn test_malformed_inputs_are_rejected() {
        assert!(matches!(
            parse_date("2024/06/01"),
            Err(DomainError::DateParseError { .. })
        ));
        assert!(matches!(
            parse_time("25:00"),
            Err(DomainError::TimeParseError { .. })
        ));
        assert!(matches!(
            parse_time("9am"),
            Err(DomainError::TimeParseError { .. })
        ));
    }

    #[test]
    fn test_format_round_trips_canonical_strings() {
        assert_eq!(format_date(date!(2024 - 06 - 01)), "2024-06-01");
        assert_eq!(format_time(time!(09:05)), "09:05");
    }

    #[test]
    fn test_window_bounds_are_inclusive() {
        let schedule: Schedule = june_first_booking();
        assert!(schedule.contains(datetime!(2024-06-01 09:00)));
        assert!(schedule.contains(datetime!(2024-06-02 17:00)));
        assert!(schedule.contains(datetime!(2024-06-01 23:30)));
        assert!(!schedule.contains(datetime!(2024-06-01 08:59)));
        assert!(!schedule.contains(datetime!(2024-06-02 17:01)));
    }

    #[test]
    fn test_has_ended_only_after_last_instant() {
        let schedule: Schedule = june_first_booking();
        assert!(!schedule.has_ended(datetime!(2024-05-20 12:00)));
        assert!(!schedule.has_ended(datetime!(2024-06-02 17:00)));
        assert!(schedule.has_ended(datetime!(2024-06-02 17:01)));
    }

    #[test]
    fn test_overlap_detection() {
        let booking: Schedule = june_first_booking();
        let touching: Schedule = match Schedule::parse("2024-06-02", "2024-06-03", "17:00", "18:00")
        {
            Ok(s) => s,
            Err(e) => panic!("{e}"),
        };
        let later: Schedule = match Schedule::parse("2024-06-03", "2024-06-04", "09:00", "10:00") {
            Ok(s) => s,
            Err(e) => panic!("{e}"),
        };

        assert!(booking.overlaps(&touching));
        assert!(touching.overlaps(&booking));
        assert!(!booking.overlaps(&later));
    }

    #[test]
    fn test_date_range_containment() {
        let season: DateRange = match DateRange::parse("2024-06-01", "2024-06-30") {
            Ok(r) => r,
            Err(e) => panic!("{e}"),
        };
        let inside: DateRange = match DateRange::parse("2024-06-10", "2024-06-12") {
            Ok(r) => r,
            Err(e) => panic!("{e}"),
        };
        let straddling: DateRange = match DateRange::parse("2024-06-29", "2024-07-02") {
            Ok(r) => r,
            Err(e) => panic!("{e}"),
        };
        assert!(season.contains_range(&inside));
        assert!(!season.contains_range(&straddling));
    }
}
