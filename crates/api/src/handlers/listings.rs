// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Listing and search handlers.

use carhive::{ListingCommand, TransitionResult, apply_listing};
use carhive_domain::{
    AvailabilityStatus, Car, CarListing, Category, DateRange, DomainError, Fuel, ListingSort, Page,
    Paged, Transmission, average_rate,
};
use carhive_persistence::{ListingFilter, Persistence};
use std::str::FromStr;
use time::PrimitiveDateTime;
use tracing::{debug, info};

use super::cars::publicly_visible;
use super::{
    availability_of, date_range_dto, load_live_car, not_found, page_of, present_car,
    require_fleet_owner, stored_id,
};
use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
use crate::request_response::{
    CreateListingRequest, ListingInfo, ListingQuery, PagedResponse, SetListingPriceRequest,
};

/// A listing that passed the search filters, with what it is ordered by.
struct Candidate {
    listing: CarListing,
    car: Car,
    availability: AvailabilityStatus,
    average_rating: Option<f64>,
}

fn present_listing(
    listing: &CarListing,
    car: &Car,
    availability: AvailabilityStatus,
    average_rating: Option<f64>,
    admin_view: bool,
) -> Result<ListingInfo, ApiError> {
    Ok(ListingInfo {
        listing_id: stored_id(listing.listing_id, "listing")?,
        car_id: listing.car_id,
        city: listing.city.clone(),
        parking_location: listing.parking_location.clone(),
        price_per_day: listing.effective_price(),
        owner_price_per_day: admin_view.then_some(listing.price_per_day),
        approved_price_per_day: listing.approved_price_per_day.filter(|_| admin_view),
        fleet_by: listing.fleet_by.filter(|_| admin_view),
        rental_period: date_range_dto(&listing.rental_period),
        delivery_available: listing.delivery_available,
        average_rating,
        car: present_car(car, availability, admin_view)?,
    })
}

fn car_rating(persistence: &mut Persistence, car_id: i64) -> Result<Option<f64>, ApiError> {
    let rates: Vec<u8> = persistence
        .car_rates(car_id)
        .map_err(translate_persistence_error)?;
    Ok(average_rate(&rates))
}

fn commit(
    persistence: &mut Persistence,
    result: TransitionResult<CarListing>,
    admin_view: bool,
    now: PrimitiveDateTime,
) -> Result<ListingInfo, ApiError> {
    let listing_id: i64 = persistence
        .persist_listing_transition(&result)
        .map_err(translate_persistence_error)?;
    let mut listing: CarListing = result.new_state;
    listing.listing_id = Some(listing_id);

    let car: Car = persistence
        .get_car(listing.car_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| not_found("Car", listing.car_id))?;
    let availability: AvailabilityStatus = availability_of(persistence, &car, now)?;
    let average_rating: Option<f64> = car_rating(persistence, listing.car_id)?;
    present_listing(&listing, &car, availability, average_rating, admin_view)
}

/// Offers a car for rent in a city.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `actor` - The listing identity
/// * `request` - Location, asking price and rental period
/// * `now` - Marketplace-local wall clock
///
/// # Errors
///
/// Returns an error if:
/// - The car does not exist or is deleted
/// - The actor neither administers nor owns the car
/// - A non-admin sets the operating fleet owner or a price override
/// - The operating fleet owner is not a fleet owner
/// - A field is blank, a price negative or the period inverted
pub fn create_listing(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request: &CreateListingRequest,
    now: PrimitiveDateTime,
) -> Result<ListingInfo, ApiError> {
    let car: Car = load_live_car(persistence, request.car_id)?;
    AuthorizationService::authorize_manage_car(actor, &car, "list car for rent")?;
    if request.fleet_by.is_some() || request.approved_price_per_day.is_some() {
        AuthorizationService::require_admin(actor, "set listing operator or price")?;
    }
    if let Some(fleet_by) = request.fleet_by {
        require_fleet_owner(persistence, fleet_by)?;
    }
    let rental_period: DateRange = request
        .rental_period
        .to_range()
        .map_err(translate_domain_error)?;

    let result: TransitionResult<CarListing> = apply_listing(
        None,
        ListingCommand::Create {
            car_id: request.car_id,
            city: request.city.clone(),
            parking_location: request.parking_location.clone(),
            price_per_day: request.price_per_day,
            rental_period,
            delivery_available: request.delivery_available,
            fleet_by: request.fleet_by,
            approved_price_per_day: request.approved_price_per_day,
        },
        actor.to_audit_actor(),
    )
    .map_err(translate_core_error)?;

    let info: ListingInfo = commit(persistence, result, actor.is_admin(), now)?;
    info!(
        listing_id = info.listing_id,
        car_id = info.car_id,
        city = %info.city,
        "Listing created"
    );
    Ok(info)
}

/// Sets or clears the admin price override of a listing.
///
/// # Errors
///
/// Returns an error if the caller is not an admin, the listing does not
/// exist, or the price is negative.
pub fn set_listing_price(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    listing_id: i64,
    request: &SetListingPriceRequest,
    now: PrimitiveDateTime,
) -> Result<ListingInfo, ApiError> {
    AuthorizationService::require_admin(actor, "set listing price")?;
    let listing: CarListing = persistence
        .get_listing(listing_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| not_found("Listing", listing_id))?;

    let result: TransitionResult<CarListing> = apply_listing(
        Some(&listing),
        ListingCommand::SetApprovedPrice {
            price: request.approved_price_per_day,
        },
        actor.to_audit_actor(),
    )
    .map_err(translate_core_error)?;

    let info: ListingInfo = commit(persistence, result, true, now)?;
    info!(listing_id, price = ?request.approved_price_per_day, "Listing price override set");
    Ok(info)
}

fn parse_filter<T: FromStr<Err = DomainError>>(
    value: Option<&str>,
) -> Result<Option<T>, ApiError> {
    value
        .map(str::parse)
        .transpose()
        .map_err(translate_domain_error)
}

/// The requested rental period, when both ends are given.
fn requested_period(query: &ListingQuery) -> Result<Option<DateRange>, ApiError> {
    match (query.from.as_deref(), query.to.as_deref()) {
        (None, None) => Ok(None),
        (Some(from), Some(to)) => DateRange::parse(from, to)
            .map(Some)
            .map_err(translate_domain_error),
        (Some(_), None) | (None, Some(_)) => Err(ApiError::InvalidInput {
            field: String::from("from"),
            message: String::from("from and to must be given together"),
        }),
    }
}

/// Searches listings.
///
/// Non-admins only see listings of cars that are approved and available
/// right now, priced at the effective price with admin fields removed.
/// Admins see every listing of a non-deleted car.
///
/// # Errors
///
/// Returns an error if a filter, the sort key or the page is invalid, or
/// only one end of the rental period is given.
pub fn search_listings(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    query: &ListingQuery,
    now: PrimitiveDateTime,
) -> Result<PagedResponse<ListingInfo>, ApiError> {
    let page: Page = page_of(query.page, query.page_size)?;
    let sort: Option<ListingSort> = parse_filter(query.sort.as_deref())?;
    let transmission: Option<Transmission> = parse_filter(query.transmission.as_deref())?;
    let fuel: Option<Fuel> = parse_filter(query.fuel.as_deref())?;
    let category: Option<Category> = parse_filter(query.category.as_deref())?;
    let period: Option<DateRange> = requested_period(query)?;
    let admin_view: bool = actor.is_admin();

    let listings: Vec<CarListing> = persistence
        .list_listings(&ListingFilter {
            car_id: query.car_id,
            city: query.city.clone(),
            delivery_available: query.delivery_available,
        })
        .map_err(translate_persistence_error)?;

    let mut candidates: Vec<Candidate> = Vec::new();
    for listing in listings {
        let Some(car) = persistence
            .get_car(listing.car_id)
            .map_err(translate_persistence_error)?
            .filter(|car| !car.is_deleted())
        else {
            continue;
        };

        let availability: AvailabilityStatus = if admin_view {
            availability_of(persistence, &car, now)?
        } else {
            match publicly_visible(persistence, &car, now)? {
                Some(availability) => availability,
                None => continue,
            }
        };

        let details_match: bool = transmission.is_none_or(|t| car.details.transmission == t)
            && fuel.is_none_or(|f| car.details.fuel == f)
            && category.is_none_or(|c| car.details.category == c)
            && query
                .min_seats
                .is_none_or(|seats| i64::from(car.details.seats) >= seats);
        let price: i64 = listing.effective_price();
        let price_match: bool = query.min_price.is_none_or(|min| price >= min)
            && query.max_price.is_none_or(|max| price <= max);
        let period_match: bool = period.is_none_or(|period| listing.covers(&period));
        if !(details_match && price_match && period_match) {
            continue;
        }

        let average_rating: Option<f64> = car_rating(persistence, listing.car_id)?;
        if let Some(min_rating) = query.min_rating
            && average_rating.is_none_or(|rating| rating < min_rating)
        {
            continue;
        }

        candidates.push(Candidate {
            listing,
            car,
            availability,
            average_rating,
        });
    }

    if let Some(sort) = sort {
        candidates.sort_by(|a, b| {
            sort.compare(
                (a.listing.effective_price(), a.average_rating),
                (b.listing.effective_price(), b.average_rating),
            )
        });
    }
    debug!(matches = candidates.len(), "Listing search evaluated");

    let paged: Paged<Candidate> = page.slice(candidates);
    let mut items: Vec<ListingInfo> = Vec::with_capacity(paged.items.len());
    for candidate in &paged.items {
        items.push(present_listing(
            &candidate.listing,
            &candidate.car,
            candidate.availability,
            candidate.average_rating,
            admin_view,
        )?);
    }
    Ok(PagedResponse {
        items,
        page: paged.page,
        page_size: paged.page_size,
        total: paged.total,
    })
}
