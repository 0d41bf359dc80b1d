// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{event, missing_target, unexpected_target};
use crate::command::ListingCommand;
use crate::error::CoreError;
use crate::state::TransitionResult;
use carhive_audit::{Actor, AuditEvent, EntityKind};
use carhive_domain::CarListing;

fn snapshot(listing: &CarListing) -> String {
    format!(
        "listing_id={},car_id={},city={},price={},approved_price={}",
        listing
            .listing_id
            .map_or_else(|| String::from("new"), |id| id.to_string()),
        listing.car_id,
        listing.city,
        listing.price_per_day,
        listing
            .approved_price_per_day
            .map_or_else(|| String::from("none"), |p| p.to_string())
    )
}

/// Applies a listing command.
///
/// # Errors
///
/// Returns an error if a field is blank or a price is negative.
pub fn apply_listing(
    current: Option<&CarListing>,
    command: ListingCommand,
    actor: Actor,
) -> Result<TransitionResult<CarListing>, CoreError> {
    match (current, command) {
        (
            None,
            ListingCommand::Create {
                car_id,
                city,
                parking_location,
                price_per_day,
                rental_period,
                delivery_available,
                fleet_by,
                approved_price_per_day,
            },
        ) => {
            let mut listing: CarListing = CarListing::new(
                car_id,
                &city,
                &parking_location,
                price_per_day,
                rental_period,
                delivery_available,
            )?;
            listing.fleet_by = fleet_by;
            listing.set_approved_price(approved_price_per_day)?;

            let audit_event: AuditEvent = event(
                actor,
                "CreateListing",
                Some(format!("Listed car {car_id} in {}", listing.city)),
                EntityKind::Listing,
                None,
                String::from("none"),
                snapshot(&listing),
            );
            Ok(TransitionResult::applied(listing, audit_event))
        }
        (Some(_), ListingCommand::Create { .. }) => Err(unexpected_target("listing")),
        (None, ListingCommand::SetApprovedPrice { .. }) => Err(missing_target("listing")),
        (Some(listing), ListingCommand::SetApprovedPrice { price }) => {
            let mut updated: CarListing = listing.clone();
            updated.set_approved_price(price)?;
            if updated == *listing {
                return Ok(TransitionResult::unchanged(updated));
            }

            let audit_event: AuditEvent = event(
                actor,
                "SetListingPrice",
                None,
                EntityKind::Listing,
                listing.listing_id,
                snapshot(listing),
                snapshot(&updated),
            );
            Ok(TransitionResult::applied(updated, audit_event))
        }
    }
}
