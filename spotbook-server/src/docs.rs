use std::borrow::BorrowMut;

use axum::{response::IntoResponse, Json};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::{auth, bookings, reviews, schemas, serialized, spots};

#[derive(OpenApi)]
#[openapi(
    modifiers(&Security),
    info(
        description = "spotbook-server exposes endpoints to browse, review, and book spots"
    ),
    paths(
        auth::register,
        auth::login,
        auth::logout,
        auth::current_user,
        spots::list_spots,
        spots::current_spots,
        spots::spot,
        spots::create_spot,
        spots::update_spot,
        spots::delete_spot,
        spots::create_spot_image,
        spots::spot_reviews,
        spots::create_spot_review,
        spots::spot_bookings,
        spots::create_spot_booking,
        bookings::current_bookings,
        bookings::update_booking,
        bookings::delete_booking,
        reviews::current_reviews,
        reviews::update_review,
        reviews::delete_review,
        reviews::create_review_image,
    ),
    components(schemas(
        schemas::RegisterSchema,
        schemas::LoginSchema,
        schemas::NewSpotSchema,
        schemas::UpdateSpotSchema,
        schemas::SpotImageSchema,
        schemas::NewReviewSchema,
        schemas::UpdateReviewSchema,
        schemas::ReviewImageSchema,
        schemas::BookingSchema,
        serialized::User,
        serialized::LoginResult,
        serialized::Spot,
        serialized::SpotImage,
        serialized::SpotDetails,
        serialized::RatedSpot,
        serialized::SpotPage,
        serialized::Review,
        serialized::ReviewImage,
        serialized::ReviewDetails,
        serialized::Booking,
        serialized::BookingSummary,
        serialized::BookingWithSpot,
    ))
)]
pub struct ApiDoc;

struct Security;

impl Modify for Security {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.borrow_mut() {
            let scheme = HttpBuilder::new()
                .scheme(HttpAuthScheme::Bearer)
                .bearer_format("Bearer <token>")
                .build();

            components.add_security_scheme("BearerAuth", SecurityScheme::Http(scheme))
        }
    }
}

pub async fn docs() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
