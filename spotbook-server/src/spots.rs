use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json,
};
use spotbook_core::{
    availability::DateRange, NewReview, NewSpot, NewSpotImage, Pagination, UpdatedSpot,
};

use crate::{
    auth::Session,
    context::ServerContext,
    errors::ServerResult,
    schemas::{
        BookingSchema, NewReviewSchema, NewSpotSchema, PaginationQuery, SpotImageSchema,
        UpdateSpotSchema, ValidatedJson,
    },
    serialized::{
        Booking, BookingSummary, RatedSpot, Review, ReviewDetails, Spot, SpotDetails, SpotImage,
        SpotPage, ToSerialized,
    },
    Router,
};

#[utoipa::path(
    get,
    path = "/v1/spots",
    tag = "spots",
    params(PaginationQuery),
    responses(
        (status = 200, body = SpotPage)
    )
)]
pub(crate) async fn list_spots(
    State(context): State<ServerContext>,
    Query(query): Query<PaginationQuery>,
) -> ServerResult<Json<SpotPage>> {
    let page = Pagination::new(query.page, query.size);
    let spots = context.spotbook.spots.list(page).await?;

    Ok(Json(SpotPage::new(
        spots.to_serialized(),
        page.page,
        page.size,
    )))
}

#[utoipa::path(
    get,
    path = "/v1/spots/current",
    tag = "spots",
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 200, body = Vec<RatedSpot>)
    )
)]
pub(crate) async fn current_spots(
    session: Session,
    State(context): State<ServerContext>,
) -> ServerResult<Json<Vec<RatedSpot>>> {
    let spots = context
        .spotbook
        .spots
        .spots_for_owner(session.user().id)
        .await?;

    Ok(Json(spots.to_serialized()))
}

#[utoipa::path(
    get,
    path = "/v1/spots/{id}",
    tag = "spots",
    responses(
        (status = 200, body = SpotDetails),
        (status = 404, description = "Spot doesn't exist")
    )
)]
pub(crate) async fn spot(
    State(context): State<ServerContext>,
    Path(spot_id): Path<i32>,
) -> ServerResult<Json<SpotDetails>> {
    let details = context.spotbook.spots.spot_by_id(spot_id).await?;

    Ok(Json(details.to_serialized()))
}

#[utoipa::path(
    post,
    path = "/v1/spots",
    tag = "spots",
    request_body = NewSpotSchema,
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 201, body = Spot)
    )
)]
pub(crate) async fn create_spot(
    session: Session,
    State(context): State<ServerContext>,
    ValidatedJson(body): ValidatedJson<NewSpotSchema>,
) -> ServerResult<(StatusCode, Json<Spot>)> {
    let spot = context
        .spotbook
        .spots
        .create_spot(NewSpot {
            owner_id: session.user().id,
            address: body.address,
            city: body.city,
            state: body.state,
            country: body.country,
            lat: body.lat,
            lng: body.lng,
            name: body.name,
            description: body.description,
            price: body.price,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(spot.to_serialized())))
}

#[utoipa::path(
    put,
    path = "/v1/spots/{id}",
    tag = "spots",
    request_body = UpdateSpotSchema,
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 200, body = Spot),
        (status = 403, description = "Acting user doesn't own the spot"),
        (status = 404, description = "Spot doesn't exist")
    )
)]
pub(crate) async fn update_spot(
    session: Session,
    State(context): State<ServerContext>,
    Path(spot_id): Path<i32>,
    ValidatedJson(body): ValidatedJson<UpdateSpotSchema>,
) -> ServerResult<Json<Spot>> {
    let spot = context
        .spotbook
        .spots
        .update_spot(
            session.user().id,
            UpdatedSpot {
                id: spot_id,
                address: body.address,
                city: body.city,
                state: body.state,
                country: body.country,
                lat: body.lat,
                lng: body.lng,
                name: body.name,
                description: body.description,
                price: body.price,
            },
        )
        .await?;

    Ok(Json(spot.to_serialized()))
}

#[utoipa::path(
    delete,
    path = "/v1/spots/{id}",
    tag = "spots",
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 200, description = "Spot and its dependents were deleted"),
        (status = 403, description = "Acting user doesn't own the spot"),
        (status = 404, description = "Spot doesn't exist")
    )
)]
pub(crate) async fn delete_spot(
    session: Session,
    State(context): State<ServerContext>,
    Path(spot_id): Path<i32>,
) -> ServerResult<()> {
    context
        .spotbook
        .spots
        .delete_spot(session.user().id, spot_id)
        .await?;

    Ok(())
}

#[utoipa::path(
    post,
    path = "/v1/spots/{id}/images",
    tag = "spots",
    request_body = SpotImageSchema,
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 201, body = SpotImage),
        (status = 403, description = "Acting user doesn't own the spot"),
        (status = 404, description = "Spot doesn't exist")
    )
)]
pub(crate) async fn create_spot_image(
    session: Session,
    State(context): State<ServerContext>,
    Path(spot_id): Path<i32>,
    ValidatedJson(body): ValidatedJson<SpotImageSchema>,
) -> ServerResult<(StatusCode, Json<SpotImage>)> {
    let image = context
        .spotbook
        .spots
        .add_image(
            session.user().id,
            NewSpotImage {
                spot_id,
                url: body.url,
                preview: body.preview,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(image.to_serialized())))
}

#[utoipa::path(
    get,
    path = "/v1/spots/{id}/reviews",
    tag = "reviews",
    responses(
        (status = 200, body = Vec<ReviewDetails>),
        (status = 404, description = "Spot doesn't exist")
    )
)]
pub(crate) async fn spot_reviews(
    State(context): State<ServerContext>,
    Path(spot_id): Path<i32>,
) -> ServerResult<Json<Vec<ReviewDetails>>> {
    let reviews = context.spotbook.reviews.reviews_for_spot(spot_id).await?;

    Ok(Json(reviews.to_serialized()))
}

#[utoipa::path(
    post,
    path = "/v1/spots/{id}/reviews",
    tag = "reviews",
    request_body = NewReviewSchema,
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 201, body = Review),
        (status = 404, description = "Spot doesn't exist"),
        (status = 409, description = "User already reviewed this spot")
    )
)]
pub(crate) async fn create_spot_review(
    session: Session,
    State(context): State<ServerContext>,
    Path(spot_id): Path<i32>,
    ValidatedJson(body): ValidatedJson<NewReviewSchema>,
) -> ServerResult<(StatusCode, Json<Review>)> {
    let review = context
        .spotbook
        .reviews
        .create_review(NewReview {
            user_id: session.user().id,
            spot_id,
            stars: body.stars,
            text: body.review,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(review.to_serialized())))
}

#[utoipa::path(
    get,
    path = "/v1/spots/{id}/bookings",
    tag = "bookings",
    responses(
        (status = 200, body = Vec<BookingSummary>),
        (status = 404, description = "Spot doesn't exist")
    )
)]
pub(crate) async fn spot_bookings(
    State(context): State<ServerContext>,
    Path(spot_id): Path<i32>,
) -> ServerResult<Json<Vec<BookingSummary>>> {
    let bookings = context.spotbook.bookings.bookings_for_spot(spot_id).await?;

    Ok(Json(bookings.to_serialized()))
}

#[utoipa::path(
    post,
    path = "/v1/spots/{id}/bookings",
    tag = "bookings",
    request_body = BookingSchema,
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 201, body = Booking),
        (status = 400, description = "End date is on or before start date"),
        (status = 403, description = "Dates conflict with an existing booking"),
        (status = 404, description = "Spot doesn't exist")
    )
)]
pub(crate) async fn create_spot_booking(
    session: Session,
    State(context): State<ServerContext>,
    Path(spot_id): Path<i32>,
    ValidatedJson(body): ValidatedJson<BookingSchema>,
) -> ServerResult<(StatusCode, Json<Booking>)> {
    // Shape validation happens before any conflict scan
    let range = DateRange::new(body.start_date, body.end_date)?;

    let booking = context
        .spotbook
        .bookings
        .create_booking(session.user().id, spot_id, range)
        .await?;

    Ok((StatusCode::CREATED, Json(booking.to_serialized())))
}

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_spots).post(create_spot))
        .route("/current", get(current_spots))
        .route("/:id", get(spot).put(update_spot).delete(delete_spot))
        .route("/:id/images", post(create_spot_image))
        .route("/:id/reviews", get(spot_reviews).post(create_spot_review))
        .route("/:id/bookings", get(spot_bookings).post(create_spot_booking))
}
