// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Rating handlers. Ratings are plain records without a workflow, so they
//! carry no audit trail.

use carhive_domain::{Page, Paged, Rating, Role, average_rate};
use carhive_persistence::{Persistence, UserData};
use tracing::info;

use super::{load_live_car, not_found, page_of, stored_id};
use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::request_response::{
    CreateRatingRequest, ListRatingsResponse, PagedResponse, RatingInfo, RatingQuery,
};

fn present_rating(rating: &Rating) -> Result<RatingInfo, ApiError> {
    Ok(RatingInfo {
        rating_id: stored_id(rating.rating_id, "rating")?,
        author_id: rating.author_id,
        car_id: rating.car_id,
        rider_id: rating.rider_id,
        rate: rating.rate,
        review: rating.review.clone(),
    })
}

/// Rates a car, a rider, or both.
///
/// # Errors
///
/// Returns an error if:
/// - Neither target is given, or the rate is outside 0..=5
/// - The car does not exist or is deleted
/// - The rider does not exist or is not a rider
pub fn create_rating(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request: &CreateRatingRequest,
) -> Result<RatingInfo, ApiError> {
    let mut rating: Rating = Rating::new(
        actor.user_id,
        request.car_id,
        request.rider_id,
        request.rate,
        &request.review,
    )
    .map_err(translate_domain_error)?;

    if let Some(car_id) = rating.car_id {
        load_live_car(persistence, car_id)?;
    }
    if let Some(rider_id) = rating.rider_id {
        let rider: Option<UserData> = persistence
            .get_user_by_id(rider_id)
            .map_err(translate_persistence_error)?;
        if !rider.is_some_and(|user| user.role == Role::Rider) {
            return Err(not_found("Rider", rider_id));
        }
    }

    let rating_id: i64 = persistence
        .create_rating(&rating)
        .map_err(translate_persistence_error)?;
    rating.rating_id = Some(rating_id);

    info!(
        rating_id,
        author_id = actor.user_id,
        rate = rating.rate,
        "Rating created"
    );
    present_rating(&rating)
}

/// Lists ratings about a car and/or a rider, newest first.
///
/// When filtering by car the response also carries the car's mean score
/// over all of its ratings.
///
/// # Errors
///
/// Returns an error if the page is invalid.
pub fn list_ratings(
    persistence: &mut Persistence,
    query: &RatingQuery,
) -> Result<ListRatingsResponse, ApiError> {
    let page: Page = page_of(query.page, query.page_size)?;
    let ratings: Vec<Rating> = persistence
        .list_ratings(query.car_id, query.rider_id)
        .map_err(translate_persistence_error)?;

    let average: Option<f64> = match query.car_id {
        Some(car_id) => {
            let rates: Vec<u8> = persistence
                .car_rates(car_id)
                .map_err(translate_persistence_error)?;
            average_rate(&rates)
        }
        None => None,
    };

    let paged: Paged<Rating> = page.slice(ratings);
    let items: Vec<RatingInfo> = paged
        .items
        .iter()
        .map(present_rating)
        .collect::<Result<Vec<RatingInfo>, ApiError>>()?;

    Ok(ListRatingsResponse {
        ratings: PagedResponse {
            items,
            page: paged.page,
            page_size: paged.page_size,
            total: paged.total,
        },
        average_rate: average,
    })
}

/// Removes a rating. Only its author or an admin may.
///
/// # Errors
///
/// Returns an error if the rating does not exist or the caller may not
/// remove it.
pub fn delete_rating(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    rating_id: i64,
) -> Result<(), ApiError> {
    let rating: Rating = persistence
        .get_rating(rating_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| not_found("Rating", rating_id))?;
    AuthorizationService::authorize_delete_rating(actor, &rating)?;

    persistence
        .delete_rating(rating_id)
        .map_err(translate_persistence_error)?;
    info!(rating_id, actor_id = actor.user_id, "Rating deleted");
    Ok(())
}
