// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Workflow commands.
//!
//! Commands carry data only. They describe intent and are applied by the
//! `apply_*` functions, which validate them against current state.

use carhive_domain::{
    AvailabilityStatus, CarAction, CarDraft, CarPatch, DateRange, KycDraft, KycStatus,
    PauseStatus, RideStatus, Route, Schedule,
};

/// Commands on the car catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CarCommand {
    /// List a new car. `owner_id` is the resolved fleet owner, if any.
    Submit {
        draft: CarDraft,
        owner_id: Option<i64>,
    },
    /// Edit descriptive fields, media, documents or (admin only) owner and
    /// hold.
    Update { patch: CarPatch },
    /// Admin publication decision.
    Decide { action: CarAction },
    /// Admin direct availability override.
    SetAvailability { availability: AvailabilityStatus },
}

/// Commands on bookings.
#[derive(Debug, Clone, PartialEq)]
pub enum RideCommand {
    /// Rider books a car.
    Request {
        car_id: i64,
        route: Route,
        schedule: Schedule,
    },
    /// Rider edits a pending booking.
    Update {
        route: Option<Route>,
        schedule: Option<Schedule>,
    },
    /// Admin decision.
    Decide { status: RideStatus },
}

/// Commands on pause requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PauseCommand {
    Request {
        car_id: i64,
        reason: String,
        schedule: Schedule,
        note: Option<String>,
    },
    Decide { status: PauseStatus },
}

/// Commands on the verification ledgers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KycCommand {
    /// Create or replace the caller's record. Always lands on `pending`.
    Submit { draft: KycDraft },
    /// Owner edits a subset of fields.
    SelfUpdate { draft: KycDraft },
    /// Admin decision with an optional note.
    Decide {
        status: KycStatus,
        note: Option<String>,
    },
}

/// Commands on listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingCommand {
    Create {
        car_id: i64,
        city: String,
        parking_location: String,
        price_per_day: i64,
        rental_period: DateRange,
        delivery_available: bool,
        /// Admin only; already resolved to a fleet owner.
        fleet_by: Option<i64>,
        /// Admin only.
        approved_price_per_day: Option<i64>,
    },
    SetApprovedPrice { price: Option<i64> },
}
