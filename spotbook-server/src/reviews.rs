use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json,
};
use spotbook_core::{NewReviewImage, UpdatedReview};

use crate::{
    auth::Session,
    context::ServerContext,
    errors::ServerResult,
    schemas::{ReviewImageSchema, UpdateReviewSchema, ValidatedJson},
    serialized::{Review, ReviewImage, ToSerialized},
    Router,
};

#[utoipa::path(
    get,
    path = "/v1/reviews/current",
    tag = "reviews",
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 200, body = Vec<Review>)
    )
)]
pub(crate) async fn current_reviews(
    session: Session,
    State(context): State<ServerContext>,
) -> ServerResult<Json<Vec<Review>>> {
    let reviews = context
        .spotbook
        .reviews
        .reviews_for_user(session.user().id)
        .await?;

    Ok(Json(reviews.to_serialized()))
}

#[utoipa::path(
    put,
    path = "/v1/reviews/{id}",
    tag = "reviews",
    request_body = UpdateReviewSchema,
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 200, body = Review),
        (status = 403, description = "Acting user doesn't own the review"),
        (status = 404, description = "Review doesn't exist")
    )
)]
pub(crate) async fn update_review(
    session: Session,
    State(context): State<ServerContext>,
    Path(review_id): Path<i32>,
    ValidatedJson(body): ValidatedJson<UpdateReviewSchema>,
) -> ServerResult<Json<Review>> {
    let review = context
        .spotbook
        .reviews
        .update_review(
            session.user().id,
            UpdatedReview {
                id: review_id,
                stars: body.stars,
                text: body.review,
            },
        )
        .await?;

    Ok(Json(review.to_serialized()))
}

#[utoipa::path(
    delete,
    path = "/v1/reviews/{id}",
    tag = "reviews",
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 200, description = "Review and its images were deleted"),
        (status = 403, description = "Acting user doesn't own the review"),
        (status = 404, description = "Review doesn't exist")
    )
)]
pub(crate) async fn delete_review(
    session: Session,
    State(context): State<ServerContext>,
    Path(review_id): Path<i32>,
) -> ServerResult<()> {
    context
        .spotbook
        .reviews
        .delete_review(session.user().id, review_id)
        .await?;

    Ok(())
}

#[utoipa::path(
    post,
    path = "/v1/reviews/{id}/images",
    tag = "reviews",
    request_body = ReviewImageSchema,
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 201, body = ReviewImage),
        (status = 403, description = "Acting user doesn't own the review"),
        (status = 404, description = "Review doesn't exist")
    )
)]
pub(crate) async fn create_review_image(
    session: Session,
    State(context): State<ServerContext>,
    Path(review_id): Path<i32>,
    ValidatedJson(body): ValidatedJson<ReviewImageSchema>,
) -> ServerResult<(StatusCode, Json<ReviewImage>)> {
    let image = context
        .spotbook
        .reviews
        .add_image(
            session.user().id,
            NewReviewImage {
                review_id,
                url: body.url,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(image.to_serialized())))
}

pub fn router() -> Router {
    Router::new()
        .route("/current", get(current_reviews))
        .route("/:id", put(update_review).delete(delete_review))
        .route("/:id/images", post(create_review_image))
}
