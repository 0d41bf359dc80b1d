// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use carhive_persistence::Persistence;

use super::helpers::{
    create_approved_car, create_test_admin, create_test_fleet_owner, create_test_rider,
    setup_test_persistence, test_now,
};
use crate::{
    ApiError, AuthenticatedActor, CarInfo, CreateListingRequest, CreateRatingRequest,
    DateRangeDto, ListingInfo, ListingQuery, PagedResponse, SetListingPriceRequest,
    create_listing, create_rating, search_listings, set_listing_price,
};

fn create_test_listing_request(car_id: i64, city: &str, price: i64) -> CreateListingRequest {
    CreateListingRequest {
        car_id,
        city: city.to_string(),
        parking_location: String::from("MG Road metro parking"),
        price_per_day: price,
        rental_period: DateRangeDto {
            from: String::from("2024-05-01"),
            to: String::from("2024-08-31"),
        },
        delivery_available: false,
        fleet_by: None,
        approved_price_per_day: None,
    }
}

struct Catalogue {
    persistence: Persistence,
    admin: AuthenticatedActor,
    owner: AuthenticatedActor,
    rider: AuthenticatedActor,
    cheap: ListingInfo,
    pricey: ListingInfo,
}

/// Two approved cars listed in Bengaluru at different prices.
fn setup_catalogue() -> Catalogue {
    let mut persistence = setup_test_persistence();
    let admin: AuthenticatedActor = create_test_admin(&mut persistence);
    let owner: AuthenticatedActor = create_test_fleet_owner(&mut persistence);
    let rider: AuthenticatedActor = create_test_rider(&mut persistence);
    let first: CarInfo = create_approved_car(&mut persistence, &admin, &owner, "KA01AB1234");
    let second: CarInfo = create_approved_car(&mut persistence, &admin, &owner, "KA01AB5678");

    let cheap: ListingInfo = create_listing(
        &mut persistence,
        &owner,
        &create_test_listing_request(first.car_id, "Bengaluru", 200_000),
        test_now(),
    )
    .unwrap();
    let pricey: ListingInfo = create_listing(
        &mut persistence,
        &owner,
        &create_test_listing_request(second.car_id, "Bengaluru", 450_000),
        test_now(),
    )
    .unwrap();

    Catalogue {
        persistence,
        admin,
        owner,
        rider,
        cheap,
        pricey,
    }
}

#[test]
fn test_owner_listing_hides_admin_fields() {
    let c: Catalogue = setup_catalogue();

    assert_eq!(c.cheap.price_per_day, 200_000);
    assert_eq!(c.cheap.owner_price_per_day, None);
    assert_eq!(c.cheap.approved_price_per_day, None);
    assert_eq!(c.cheap.car.owner_id, None);
    assert_eq!(c.cheap.average_rating, None);
}

#[test]
fn test_only_admins_set_operator_or_override() {
    let mut c: Catalogue = setup_catalogue();

    let mut request: CreateListingRequest =
        create_test_listing_request(c.cheap.car_id, "Mysuru", 210_000);
    request.fleet_by = Some(c.owner.user_id);
    assert!(matches!(
        create_listing(&mut c.persistence, &c.owner, &request, test_now()),
        Err(ApiError::Unauthorized { .. })
    ));

    request.fleet_by = Some(c.rider.user_id);
    assert!(matches!(
        create_listing(&mut c.persistence, &c.admin, &request, test_now()),
        Err(ApiError::ResourceNotFound { .. })
    ));

    assert!(matches!(
        set_listing_price(
            &mut c.persistence,
            &c.owner,
            c.cheap.listing_id,
            &SetListingPriceRequest {
                approved_price_per_day: Some(1),
            },
            test_now()
        ),
        Err(ApiError::Unauthorized { .. })
    ));
}

#[test]
fn test_price_override_changes_effective_price() {
    let mut c: Catalogue = setup_catalogue();

    let overridden: ListingInfo = set_listing_price(
        &mut c.persistence,
        &c.admin,
        c.pricey.listing_id,
        &SetListingPriceRequest {
            approved_price_per_day: Some(150_000),
        },
        test_now(),
    )
    .unwrap();
    assert_eq!(overridden.price_per_day, 150_000);
    assert_eq!(overridden.owner_price_per_day, Some(450_000));
    assert_eq!(overridden.approved_price_per_day, Some(150_000));

    let sorted: PagedResponse<ListingInfo> = search_listings(
        &mut c.persistence,
        &c.rider,
        &ListingQuery {
            sort: Some(String::from("price_low_to_high")),
            ..ListingQuery::default()
        },
        test_now(),
    )
    .unwrap();
    assert_eq!(sorted.items[0].listing_id, c.pricey.listing_id);
    assert_eq!(sorted.items[0].approved_price_per_day, None);
}

#[test]
fn test_search_filters_and_sorts() {
    let mut c: Catalogue = setup_catalogue();

    let descending: PagedResponse<ListingInfo> = search_listings(
        &mut c.persistence,
        &c.rider,
        &ListingQuery {
            city: Some(String::from("Bengaluru")),
            sort: Some(String::from("price_high_to_low")),
            ..ListingQuery::default()
        },
        test_now(),
    )
    .unwrap();
    assert_eq!(descending.total, 2);
    assert_eq!(descending.items[0].listing_id, c.pricey.listing_id);
    assert_eq!(descending.items[1].listing_id, c.cheap.listing_id);

    let budget: PagedResponse<ListingInfo> = search_listings(
        &mut c.persistence,
        &c.rider,
        &ListingQuery {
            max_price: Some(300_000),
            ..ListingQuery::default()
        },
        test_now(),
    )
    .unwrap();
    assert_eq!(budget.total, 1);
    assert_eq!(budget.items[0].listing_id, c.cheap.listing_id);

    let elsewhere: PagedResponse<ListingInfo> = search_listings(
        &mut c.persistence,
        &c.rider,
        &ListingQuery {
            city: Some(String::from("Chennai")),
            ..ListingQuery::default()
        },
        test_now(),
    )
    .unwrap();
    assert_eq!(elsewhere.total, 0);

    let manual: PagedResponse<ListingInfo> = search_listings(
        &mut c.persistence,
        &c.rider,
        &ListingQuery {
            transmission: Some(String::from("manual")),
            ..ListingQuery::default()
        },
        test_now(),
    )
    .unwrap();
    assert_eq!(manual.total, 0);
}

#[test]
fn test_search_by_rating_and_period() {
    let mut c: Catalogue = setup_catalogue();
    create_rating(
        &mut c.persistence,
        &c.rider,
        &CreateRatingRequest {
            car_id: Some(c.cheap.car_id),
            rider_id: None,
            rate: 5,
            review: String::from("Spotless"),
        },
    )
    .unwrap();

    let rated: PagedResponse<ListingInfo> = search_listings(
        &mut c.persistence,
        &c.rider,
        &ListingQuery {
            min_rating: Some(4.0),
            ..ListingQuery::default()
        },
        test_now(),
    )
    .unwrap();
    assert_eq!(rated.total, 1);
    assert_eq!(rated.items[0].average_rating, Some(5.0));

    let covered: PagedResponse<ListingInfo> = search_listings(
        &mut c.persistence,
        &c.rider,
        &ListingQuery {
            from: Some(String::from("2024-06-01")),
            to: Some(String::from("2024-06-10")),
            ..ListingQuery::default()
        },
        test_now(),
    )
    .unwrap();
    assert_eq!(covered.total, 2);

    let outside: PagedResponse<ListingInfo> = search_listings(
        &mut c.persistence,
        &c.rider,
        &ListingQuery {
            from: Some(String::from("2024-08-20")),
            to: Some(String::from("2024-09-10")),
            ..ListingQuery::default()
        },
        test_now(),
    )
    .unwrap();
    assert_eq!(outside.total, 0);
}

#[test]
fn test_search_rejects_half_open_period_and_bad_sort() {
    let mut c: Catalogue = setup_catalogue();

    assert!(matches!(
        search_listings(
            &mut c.persistence,
            &c.rider,
            &ListingQuery {
                from: Some(String::from("2024-06-01")),
                ..ListingQuery::default()
            },
            test_now()
        ),
        Err(ApiError::InvalidInput { ref field, .. }) if field == "from"
    ));
    assert!(matches!(
        search_listings(
            &mut c.persistence,
            &c.rider,
            &ListingQuery {
                sort: Some(String::from("alphabetical")),
                ..ListingQuery::default()
            },
            test_now()
        ),
        Err(ApiError::InvalidInput { .. })
    ));
}
