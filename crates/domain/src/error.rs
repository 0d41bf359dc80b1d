// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A required field is missing, empty, or malformed.
    InvalidField {
        /// The offending field.
        field: String,
        /// What is wrong with it.
        message: String,
    },
    /// Role string does not name a known role.
    InvalidRole(String),
    /// Status string does not name a known status of the given kind.
    InvalidStatus {
        /// The status family (e.g. `ride`, `car`).
        kind: &'static str,
        /// The rejected value.
        value: String,
    },
    /// A lifecycle transition is not permitted.
    InvalidStatusTransition {
        /// The entity whose status was changing.
        entity: &'static str,
        /// Current status.
        from: String,
        /// Requested status.
        to: String,
        /// Why the transition is refused.
        reason: String,
    },
    /// Failed to parse a `YYYY-MM-DD` date.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
    /// Failed to parse an `HH:MM` time.
    TimeParseError {
        /// The invalid time string.
        time_string: String,
        /// The parsing error message.
        error: String,
    },
    /// `date.from` is after `date.to`.
    InvalidDateRange {
        /// Range start.
        from: time::Date,
        /// Range end.
        to: time::Date,
    },
    /// `time.from` is not strictly before `time.to`.
    InvalidTimeRange {
        /// Range start.
        from: time::Time,
        /// Range end.
        to: time::Time,
    },
    /// Longitude or latitude outside its valid range.
    InvalidCoordinate {
        /// `longitude` or `latitude`.
        axis: &'static str,
        /// The rejected value, rendered.
        value: String,
    },
    /// Car image count outside 5..=10.
    InvalidImageCount {
        /// Number of images supplied.
        count: usize,
    },
    /// A mandatory car document is missing.
    MissingDocument(&'static str),
    /// Registration number already used by another car.
    DuplicateRegistration(String),
    /// The car has been deleted and can no longer change.
    CarDeleted(i64),
    /// The car cannot currently take bookings.
    CarNotBookable {
        /// The car.
        car_id: i64,
        /// Its publication status.
        status: String,
    },
    /// Another approved ride already holds an overlapping window.
    RideOverlap {
        /// The car.
        car_id: i64,
        /// The approved ride that overlaps.
        conflicting_ride_id: i64,
    },
    /// The ride may no longer be edited by the rider.
    RideLocked {
        /// The ride.
        ride_id: i64,
        /// Its current status.
        status: String,
    },
    /// KYC ledger mismatch (e.g. a rider submitting a fleet-owner record).
    KycKindMismatch {
        /// Ledger the caller belongs to.
        expected: &'static str,
        /// Ledger the payload targets.
        actual: &'static str,
    },
    /// The caller has no approved KYC record.
    KycNotApproved {
        /// Current status, or `None` when nothing was submitted.
        status: Option<String>,
    },
    /// The KYC record is already approved.
    KycAlreadyApproved,
    /// Field cannot be changed while the KYC record is approved.
    KycFieldLocked {
        /// The locked field.
        field: String,
    },
    /// The KYC record is blocked and cannot be self-updated.
    KycBlocked,
    /// An update carried no fields.
    EmptyUpdate,
    /// Rating score outside 0..=5.
    InvalidRating(i64),
    /// A rating must target a car, a rider, or both.
    MissingRatingTarget,
    /// Monetary or metric value must not be negative.
    NegativeAmount {
        /// The offending field.
        field: &'static str,
        /// The rejected value.
        value: i64,
    },
    /// Timezone identifier is not a known IANA zone.
    InvalidTimezone(String),
    /// Pagination parameters out of range.
    InvalidPage {
        /// What is wrong.
        reason: String,
    },
}

impl std::fmt::Display for DomainError {
    #[allow(clippy::too_many_lines)]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidField { field, message } => write!(f, "Invalid {field}: {message}"),
            Self::InvalidRole(role) => write!(f, "Invalid role: {role}"),
            Self::InvalidStatus { kind, value } => write!(f, "Invalid {kind} status: {value}"),
            Self::InvalidStatusTransition {
                entity,
                from,
                to,
                reason,
            } => {
                write!(
                    f,
                    "Cannot move {entity} from '{from}' to '{to}': {reason}"
                )
            }
            Self::DateParseError { date_string, error } => {
                write!(f, "Invalid date '{date_string}' (expected YYYY-MM-DD): {error}")
            }
            Self::TimeParseError { time_string, error } => {
                write!(f, "Invalid time '{time_string}' (expected HH:MM): {error}")
            }
            Self::InvalidDateRange { .. } => {
                write!(f, "date.from must be before or equal to date.to")
            }
            Self::InvalidTimeRange { .. } => write!(f, "time.from must be before time.to"),
            Self::InvalidCoordinate { axis, value } => {
                let bound: u16 = if *axis == "longitude" { 180 } else { 90 };
                write!(f, "{axis} {value} must be within -{bound} and {bound}")
            }
            Self::InvalidImageCount { count } => {
                write!(f, "A car needs between 5 and 10 images, got {count}")
            }
            Self::MissingDocument(document) => write!(f, "Document '{document}' is required"),
            Self::DuplicateRegistration(number) => {
                write!(f, "Registration number '{number}' is already listed")
            }
            Self::CarDeleted(car_id) => write!(f, "Car {car_id} has been deleted"),
            Self::CarNotBookable { car_id, status } => {
                write!(f, "Car {car_id} is not bookable while '{status}'")
            }
            Self::RideOverlap {
                car_id,
                conflicting_ride_id,
            } => {
                write!(
                    f,
                    "Car {car_id} is already booked by ride {conflicting_ride_id} for an overlapping window"
                )
            }
            Self::RideLocked { ride_id, status } => {
                write!(f, "Ride {ride_id} cannot be edited while '{status}'")
            }
            Self::KycKindMismatch { expected, actual } => {
                write!(f, "Expected a {expected} KYC record, got {actual}")
            }
            Self::KycNotApproved { status: None } => {
                write!(f, "KYC required: submit your KYC before booking")
            }
            Self::KycNotApproved {
                status: Some(status),
            } => write!(f, "KYC is {status}: approval required before booking"),
            Self::KycAlreadyApproved => write!(f, "KYC is already approved"),
            Self::KycFieldLocked { field } => write!(
                f,
                "KYC is approved; only referCode can be updated (attempted '{field}')"
            ),
            Self::KycBlocked => write!(f, "KYC is blocked"),
            Self::EmptyUpdate => write!(f, "Update contains no fields"),
            Self::InvalidRating(rate) => write!(f, "Rating {rate} must be between 0 and 5"),
            Self::MissingRatingTarget => write!(f, "A rating needs a car, a rider, or both"),
            Self::NegativeAmount { field, value } => {
                write!(f, "{field} must not be negative, got {value}")
            }
            Self::InvalidTimezone(tz) => write!(f, "Unknown timezone: {tz}"),
            Self::InvalidPage { reason } => write!(f, "Invalid page: {reason}"),
        }
    }
}

impl std::error::Error for DomainError {}
