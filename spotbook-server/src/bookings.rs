use axum::{
    extract::{Path, State},
    routing::get,
    Json,
};
use chrono::Utc;
use spotbook_core::availability::DateRange;

use crate::{
    auth::Session,
    context::ServerContext,
    errors::ServerResult,
    schemas::{BookingSchema, ValidatedJson},
    serialized::{Booking, BookingWithSpot, ToSerialized},
    Router,
};

#[utoipa::path(
    get,
    path = "/v1/bookings/current",
    tag = "bookings",
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 200, body = Vec<BookingWithSpot>)
    )
)]
pub(crate) async fn current_bookings(
    session: Session,
    State(context): State<ServerContext>,
) -> ServerResult<Json<Vec<BookingWithSpot>>> {
    let bookings = context
        .spotbook
        .bookings
        .bookings_for_user(session.user().id)
        .await?;

    Ok(Json(bookings.to_serialized()))
}

#[utoipa::path(
    put,
    path = "/v1/bookings/{id}",
    tag = "bookings",
    request_body = BookingSchema,
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 200, body = Booking),
        (status = 400, description = "End date is on or before start date"),
        (status = 403, description = "Acting user doesn't own the booking, or the dates conflict"),
        (status = 404, description = "Booking doesn't exist")
    )
)]
pub(crate) async fn update_booking(
    session: Session,
    State(context): State<ServerContext>,
    Path(booking_id): Path<i32>,
    ValidatedJson(body): ValidatedJson<BookingSchema>,
) -> ServerResult<Json<Booking>> {
    let range = DateRange::new(body.start_date, body.end_date)?;

    let booking = context
        .spotbook
        .bookings
        .update_booking(session.user().id, booking_id, range)
        .await?;

    Ok(Json(booking.to_serialized()))
}

#[utoipa::path(
    delete,
    path = "/v1/bookings/{id}",
    tag = "bookings",
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 200, description = "Booking was deleted"),
        (status = 403, description = "Acting user doesn't own the booking, or it has started"),
        (status = 404, description = "Booking doesn't exist")
    )
)]
pub(crate) async fn delete_booking(
    session: Session,
    State(context): State<ServerContext>,
    Path(booking_id): Path<i32>,
) -> ServerResult<()> {
    let today = Utc::now().date_naive();

    context
        .spotbook
        .bookings
        .delete_booking(session.user().id, booking_id, today)
        .await?;

    Ok(())
}

pub fn router() -> Router {
    Router::new()
        .route("/current", get(current_bookings))
        .route("/:id", axum::routing::put(update_booking).delete(delete_booking))
}
