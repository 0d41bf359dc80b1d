// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Car catalog types and the publication lifecycle.
//!
//! A car carries one stored lifecycle, its [`PublicationStatus`], plus an
//! optional admin [`AvailabilityHold`]. Whether a car can actually be booked
//! right now is never stored; see [`crate::compute_availability`].

use crate::error::DomainError;
use crate::validation::{
    normalize_optional, normalize_registration_number, validate_images, validate_model_year,
    validate_non_negative, validate_required, validate_seats, validate_url,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Admin review state of a car listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublicationStatus {
    Pending,
    Approved,
    Rejected,
    Block,
    /// Soft delete. Terminal.
    Delete,
}

impl PublicationStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Block => "block",
            Self::Delete => "delete",
        }
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" | "approve" => Ok(Self::Approved),
            "rejected" | "reject" => Ok(Self::Rejected),
            "block" | "blocked" => Ok(Self::Block),
            "delete" | "deleted" => Ok(Self::Delete),
            _ => Err(DomainError::InvalidStatus {
                kind: "car",
                value: s.to_string(),
            }),
        }
    }

    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Delete)
    }

    /// Validates a publication change requested by an admin.
    ///
    /// Every status may be reached from every non-terminal status; nothing
    /// leaves `delete`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` when the car is already
    /// deleted.
    pub fn validate_transition(&self, new_status: Self) -> Result<(), DomainError> {
        if self.is_terminal() {
            return Err(DomainError::InvalidStatusTransition {
                entity: "car",
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: String::from("deleted cars cannot change"),
            });
        }
        Ok(())
    }
}

impl FromStr for PublicationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

/// Effective bookability of a car, always computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityStatus {
    Available,
    Unavailable,
    Maintenance,
}

impl AvailabilityStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Unavailable => "unavailable",
            Self::Maintenance => "maintenance",
        }
    }

    /// The stored hold an admin sets to request this availability.
    #[must_use]
    pub const fn as_hold(&self) -> AvailabilityHold {
        match self {
            Self::Available => AvailabilityHold::None,
            Self::Unavailable => AvailabilityHold::Unavailable,
            Self::Maintenance => AvailabilityHold::Maintenance,
        }
    }
}

impl FromStr for AvailabilityStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "available" => Ok(Self::Available),
            "unavailable" => Ok(Self::Unavailable),
            "maintenance" => Ok(Self::Maintenance),
            _ => Err(DomainError::InvalidStatus {
                kind: "availability",
                value: s.to_string(),
            }),
        }
    }
}

/// Admin-set override that suppresses availability regardless of bookings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AvailabilityHold {
    #[default]
    None,
    Unavailable,
    Maintenance,
}

impl AvailabilityHold {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Unavailable => "unavailable",
            Self::Maintenance => "maintenance",
        }
    }
}

impl FromStr for AvailabilityHold {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "unavailable" => Ok(Self::Unavailable),
            "maintenance" => Ok(Self::Maintenance),
            _ => Err(DomainError::InvalidStatus {
                kind: "availability hold",
                value: s.to_string(),
            }),
        }
    }
}

/// Admin decision on a car.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarAction {
    Approve,
    Reject,
    Block,
    Delete,
    SetStatus(PublicationStatus),
}

impl CarAction {
    /// The publication status this action lands on.
    #[must_use]
    pub const fn target_status(&self) -> PublicationStatus {
        match self {
            Self::Approve => PublicationStatus::Approved,
            Self::Reject => PublicationStatus::Rejected,
            Self::Block => PublicationStatus::Block,
            Self::Delete => PublicationStatus::Delete,
            Self::SetStatus(status) => *status,
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Approve => "ApproveCar",
            Self::Reject => "RejectCar",
            Self::Block => "BlockCar",
            Self::Delete => "DeleteCar",
            Self::SetStatus(_) => "SetCarStatus",
        }
    }
}

macro_rules! keyword_enum {
    ($(#[$meta:meta])* $name:ident, $kind:literal, { $($variant:ident => $text:literal $(| $alias:literal)*),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($text $(| $alias)* => Ok(Self::$variant),)+
                    _ => Err(DomainError::InvalidField {
                        field: String::from($kind),
                        message: format!("unknown value '{s}'"),
                    }),
                }
            }
        }
    };
}

keyword_enum!(
    /// Body style.
    Category, "category", {
        Sedan => "sedan",
        Suv => "suv",
        Hatchback => "hatchback",
        Luxury => "luxury",
        Van => "van",
        Other => "other",
    }
);

keyword_enum!(
    Transmission, "transmission", {
        Auto => "auto" | "automatic",
        Manual => "manual",
    }
);

keyword_enum!(
    Fuel, "fuel", {
        Electric => "electric" | "ev",
        Petrol => "petrol" | "gasoline",
        Diesel => "diesel",
        Cng => "cng",
    }
);

/// The four documents every listed car must carry, as uploaded URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarDocuments {
    pub insurance: String,
    pub pollution: String,
    pub tax: String,
    pub registration_book: String,
}

impl CarDocuments {
    /// Builds the document set, requiring all four.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MissingDocument` for the first absent document,
    /// or `DomainError::InvalidField` for a malformed URL.
    pub fn try_new(
        insurance: Option<&str>,
        pollution: Option<&str>,
        tax: Option<&str>,
        registration_book: Option<&str>,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            insurance: require_document("insurance", insurance)?,
            pollution: require_document("pollution", pollution)?,
            tax: require_document("tax", tax)?,
            registration_book: require_document("registration_book", registration_book)?,
        })
    }
}

fn require_document(name: &'static str, value: Option<&str>) -> Result<String, DomainError> {
    match normalize_optional(value) {
        Some(url) => validate_url(name, &url),
        None => Err(DomainError::MissingDocument(name)),
    }
}

/// Raw, unvalidated car attributes as received from a submitter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarDraft {
    pub name: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub color: String,
    pub registration_number: String,
    pub category: String,
    pub transmission: String,
    pub fuel: String,
    pub seats: i64,
    pub hourly_rate: i64,
    pub price_per_day: i64,
    pub km_per_hour: i64,
    pub images: Vec<String>,
    pub video: Option<String>,
    pub insurance: Option<String>,
    pub pollution: Option<String>,
    pub tax: Option<String>,
    pub registration_book: Option<String>,
}

/// Validated descriptive and capability attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarDetails {
    pub name: String,
    pub brand: String,
    pub model: String,
    pub year: u16,
    pub color: String,
    pub registration_number: String,
    pub category: Category,
    pub transmission: Transmission,
    pub fuel: Fuel,
    pub seats: u8,
    /// Minor currency units.
    pub hourly_rate: i64,
    /// Minor currency units.
    pub price_per_day: i64,
    pub km_per_hour: i64,
}

/// A car in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Car {
    pub car_id: Option<i64>,
    pub owner_id: Option<i64>,
    pub details: CarDetails,
    pub images: Vec<String>,
    pub video: Option<String>,
    pub documents: CarDocuments,
    pub publication: PublicationStatus,
    pub hold: AvailabilityHold,
}

impl Car {
    /// Validates a draft into a freshly submitted car.
    ///
    /// Whatever the draft says, a new car starts `pending` with no hold,
    /// which makes it unavailable until approved.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure; nothing is built on error.
    pub fn submit(draft: &CarDraft, owner_id: Option<i64>) -> Result<Self, DomainError> {
        let images: Vec<String> = validate_images(&draft.images)?;
        let documents: CarDocuments = CarDocuments::try_new(
            draft.insurance.as_deref(),
            draft.pollution.as_deref(),
            draft.tax.as_deref(),
            draft.registration_book.as_deref(),
        )?;
        let video: Option<String> = match normalize_optional(draft.video.as_deref()) {
            Some(url) => Some(validate_url("video", &url)?),
            None => None,
        };

        Ok(Self {
            car_id: None,
            owner_id,
            details: CarDetails::from_draft(draft)?,
            images,
            video,
            documents,
            publication: PublicationStatus::Pending,
            hold: AvailabilityHold::None,
        })
    }

    /// Returns the car id or an error if the car was never persisted.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidField` for unsaved cars.
    pub fn require_id(&self) -> Result<i64, DomainError> {
        self.car_id.ok_or_else(|| DomainError::InvalidField {
            field: String::from("car_id"),
            message: String::from("car has not been persisted"),
        })
    }

    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.publication.is_terminal()
    }

    /// Compact description used in audit snapshots.
    #[must_use]
    pub fn snapshot(&self) -> String {
        format!(
            "car_id={},owner_id={},registration={},publication={},hold={},images={}",
            self.car_id.map_or_else(|| String::from("new"), |id| id.to_string()),
            self.owner_id
                .map_or_else(|| String::from("none"), |id| id.to_string()),
            self.details.registration_number,
            self.publication.as_str(),
            self.hold.as_str(),
            self.images.len()
        )
    }
}

impl CarDetails {
    /// # Errors
    ///
    /// Returns the first invalid attribute.
    pub fn from_draft(draft: &CarDraft) -> Result<Self, DomainError> {
        Ok(Self {
            name: validate_required("name", &draft.name)?,
            brand: validate_required("brand", &draft.brand)?,
            model: validate_required("model", &draft.model)?,
            year: validate_model_year(draft.year)?,
            color: validate_required("color", &draft.color)?,
            registration_number: normalize_registration_number(&draft.registration_number)?,
            category: draft.category.parse()?,
            transmission: draft.transmission.parse()?,
            fuel: draft.fuel.parse()?,
            seats: validate_seats(draft.seats)?,
            hourly_rate: validate_non_negative("hourly_rate", draft.hourly_rate)?,
            price_per_day: validate_non_negative("price_per_day", draft.price_per_day)?,
            km_per_hour: validate_non_negative("km_per_hour", draft.km_per_hour)?,
        })
    }

    /// Converts validated details back into a draft, used to merge partial
    /// updates before revalidating.
    #[must_use]
    pub fn to_draft(&self) -> CarDraft {
        CarDraft {
            name: self.name.clone(),
            brand: self.brand.clone(),
            model: self.model.clone(),
            year: i32::from(self.year),
            color: self.color.clone(),
            registration_number: self.registration_number.clone(),
            category: self.category.as_str().to_string(),
            transmission: self.transmission.as_str().to_string(),
            fuel: self.fuel.as_str().to_string(),
            seats: i64::from(self.seats),
            hourly_rate: self.hourly_rate,
            price_per_day: self.price_per_day,
            km_per_hour: self.km_per_hour,
            ..CarDraft::default()
        }
    }
}

/// A partial car update. `None` leaves a field unchanged; `images` and
/// document fields replace the whole value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarPatch {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub color: Option<String>,
    pub registration_number: Option<String>,
    pub category: Option<String>,
    pub transmission: Option<String>,
    pub fuel: Option<String>,
    pub seats: Option<i64>,
    pub hourly_rate: Option<i64>,
    pub price_per_day: Option<i64>,
    pub km_per_hour: Option<i64>,
    pub images: Option<Vec<String>>,
    pub video: Option<String>,
    pub insurance: Option<String>,
    pub pollution: Option<String>,
    pub tax: Option<String>,
    pub registration_book: Option<String>,
    /// Admin only.
    pub owner_id: Option<i64>,
    /// Admin only.
    pub availability: Option<AvailabilityStatus>,
}

impl CarPatch {
    /// True when the patch touches an admin-only field.
    #[must_use]
    pub const fn touches_admin_fields(&self) -> bool {
        self.owner_id.is_some() || self.availability.is_some()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Applies the patch to `car`, revalidating everything it touches.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::CarDeleted` for deleted cars, or the first
    /// validation failure.
    pub fn apply_to(&self, car: &Car) -> Result<Car, DomainError> {
        if car.is_deleted() {
            return Err(DomainError::CarDeleted(car.car_id.unwrap_or_default()));
        }
        if self.is_empty() {
            return Err(DomainError::EmptyUpdate);
        }

        let mut draft: CarDraft = car.details.to_draft();
        merge(&mut draft.name, self.name.as_ref());
        merge(&mut draft.brand, self.brand.as_ref());
        merge(&mut draft.model, self.model.as_ref());
        merge(&mut draft.year, self.year.as_ref());
        merge(&mut draft.color, self.color.as_ref());
        merge(
            &mut draft.registration_number,
            self.registration_number.as_ref(),
        );
        merge(&mut draft.category, self.category.as_ref());
        merge(&mut draft.transmission, self.transmission.as_ref());
        merge(&mut draft.fuel, self.fuel.as_ref());
        merge(&mut draft.seats, self.seats.as_ref());
        merge(&mut draft.hourly_rate, self.hourly_rate.as_ref());
        merge(&mut draft.price_per_day, self.price_per_day.as_ref());
        merge(&mut draft.km_per_hour, self.km_per_hour.as_ref());

        let mut updated: Car = car.clone();
        updated.details = CarDetails::from_draft(&draft)?;

        if let Some(images) = &self.images {
            updated.images = validate_images(images)?;
        }
        if let Some(video) = &self.video {
            updated.video = match normalize_optional(Some(video)) {
                Some(url) => Some(validate_url("video", &url)?),
                None => None,
            };
        }
        let documents: &CarDocuments = &car.documents;
        updated.documents = CarDocuments::try_new(
            Some(self.insurance.as_deref().unwrap_or(&documents.insurance)),
            Some(self.pollution.as_deref().unwrap_or(&documents.pollution)),
            Some(self.tax.as_deref().unwrap_or(&documents.tax)),
            Some(
                self.registration_book
                    .as_deref()
                    .unwrap_or(&documents.registration_book),
            ),
        )?;
        if let Some(owner_id) = self.owner_id {
            updated.owner_id = Some(owner_id);
        }
        if let Some(availability) = self.availability {
            updated.hold = availability.as_hold();
        }
        Ok(updated)
    }
}

fn merge<T: Clone>(target: &mut T, value: Option<&T>) {
    if let Some(value) = value {
        *target = value.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_draft() -> CarDraft {
        CarDraft {
            name: String::from("City Cruiser"),
            brand: String::from("Maruti"),
            model: String::from("Dzire"),
            year: 2022,
            color: String::from("white"),
            registration_number: String::from("ka 01 ab 1234"),
            category: String::from("Sedan"),
            transmission: String::from("manual"),
            fuel: String::from("Petrol"),
            seats: 5,
            hourly_rate: 25_000,
            price_per_day: 250_000,
            km_per_hour: 40,
            images: (1..=5)
                .map(|i| format!("https://cdn.example.com/car/{i}.jpg"))
                .collect(),
            video: None,
            insurance: Some(String::from("https://cdn.example.com/docs/insurance.pdf")),
            pollution: Some(String::from("https://cdn.example.com/docs/puc.pdf")),
            tax: Some(String::from("https://cdn.example.com/docs/tax.pdf")),
            registration_book: Some(String::from("https://cdn.example.com/docs/rc.pdf")),
        }
    }

    #[test]
    fn test_submit_forces_pending_without_hold() {
        let car: Car = match Car::submit(&valid_draft(), Some(7)) {
            Ok(car) => car,
            Err(e) => panic!("valid draft rejected: {e}"),
        };
        assert_eq!(car.publication, PublicationStatus::Pending);
        assert_eq!(car.hold, AvailabilityHold::None);
        assert_eq!(car.owner_id, Some(7));
        assert_eq!(car.details.registration_number, "KA01AB1234");
        assert_eq!(car.details.category, Category::Sedan);
    }

    #[test]
    fn test_submit_with_four_images_is_rejected() {
        let mut draft: CarDraft = valid_draft();
        draft.images.truncate(4);
        assert_eq!(
            Car::submit(&draft, None),
            Err(DomainError::InvalidImageCount { count: 4 })
        );
    }

    #[test]
    fn test_submit_with_eleven_images_is_rejected() {
        let mut draft: CarDraft = valid_draft();
        draft.images = (1..=11)
            .map(|i| format!("https://cdn.example.com/{i}.jpg"))
            .collect();
        assert_eq!(
            Car::submit(&draft, None),
            Err(DomainError::InvalidImageCount { count: 11 })
        );
    }

    #[test]
    fn test_submit_without_document_is_rejected() {
        let mut draft: CarDraft = valid_draft();
        draft.tax = Some(String::from("  "));
        assert_eq!(
            Car::submit(&draft, None),
            Err(DomainError::MissingDocument("tax"))
        );
    }

    #[test]
    fn test_unknown_fuel_is_rejected() {
        let mut draft: CarDraft = valid_draft();
        draft.fuel = String::from("steam");
        assert!(matches!(
            Car::submit(&draft, None),
            Err(DomainError::InvalidField { .. })
        ));
    }

    #[test]
    fn test_deleted_is_terminal() {
        let result: Result<(), DomainError> =
            PublicationStatus::Delete.validate_transition(PublicationStatus::Approved);
        assert!(matches!(
            result,
            Err(DomainError::InvalidStatusTransition { entity: "car", .. })
        ));
        assert!(
            PublicationStatus::Block
                .validate_transition(PublicationStatus::Approved)
                .is_ok()
        );
    }

    #[test]
    fn test_status_parsing_accepts_verbs_and_adjectives() {
        assert_eq!("approve".parse(), Ok(PublicationStatus::Approved));
        assert_eq!("Rejected".parse(), Ok(PublicationStatus::Rejected));
        assert_eq!("blocked".parse(), Ok(PublicationStatus::Block));
        assert!("archived".parse::<PublicationStatus>().is_err());
    }

    #[test]
    fn test_patch_replaces_images_whole() {
        let car: Car = match Car::submit(&valid_draft(), Some(1)) {
            Ok(car) => car,
            Err(e) => panic!("{e}"),
        };
        let patch: CarPatch = CarPatch {
            images: Some(
                (1..=6)
                    .map(|i| format!("https://cdn.example.com/new/{i}.jpg"))
                    .collect(),
            ),
            ..CarPatch::default()
        };
        let updated: Car = match patch.apply_to(&car) {
            Ok(car) => car,
            Err(e) => panic!("{e}"),
        };
        assert_eq!(updated.images.len(), 6);
        assert!(updated.images.iter().all(|url| url.contains("/new/")));
        assert_eq!(updated.documents, car.documents);
    }

    #[test]
    fn test_patch_revalidates_images() {
        let car: Car = match Car::submit(&valid_draft(), Some(1)) {
            Ok(car) => car,
            Err(e) => panic!("{e}"),
        };
        let patch: CarPatch = CarPatch {
            images: Some(vec![String::from("https://cdn.example.com/1.jpg")]),
            ..CarPatch::default()
        };
        assert_eq!(
            patch.apply_to(&car),
            Err(DomainError::InvalidImageCount { count: 1 })
        );
    }

    #[test]
    fn test_patch_on_deleted_car_is_refused() {
        let mut car: Car = match Car::submit(&valid_draft(), Some(1)) {
            Ok(car) => car,
            Err(e) => panic!("{e}"),
        };
        car.car_id = Some(3);
        car.publication = PublicationStatus::Delete;
        let patch: CarPatch = CarPatch {
            color: Some(String::from("red")),
            ..CarPatch::default()
        };
        assert_eq!(patch.apply_to(&car), Err(DomainError::CarDeleted(3)));
    }

    #[test]
    fn test_availability_request_maps_to_hold() {
        assert_eq!(
            AvailabilityStatus::Available.as_hold(),
            AvailabilityHold::None
        );
        assert_eq!(
            AvailabilityStatus::Maintenance.as_hold(),
            AvailabilityHold::Maintenance
        );
    }
}
