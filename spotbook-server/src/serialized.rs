//! All schemas that are exposed from endpoints are defined here
//! along with the conversions from core data

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use spotbook_core::{
    BookingData, BookingWithSpot as CoreBookingWithSpot, RatedSpot as CoreRatedSpot,
    ReviewData, ReviewDetails as CoreReviewDetails, ReviewImageData, SessionData,
    SpotData, SpotDetails as CoreSpotDetails, SpotImageData, UserData,
};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: i32,
    email: String,
    username: String,
    first_name: String,
    last_name: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResult {
    token: String,
    user: User,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Spot {
    id: i32,
    owner_id: i32,
    address: String,
    city: String,
    state: String,
    country: String,
    lat: f64,
    lng: f64,
    name: String,
    description: String,
    price: f64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SpotImage {
    id: i32,
    url: String,
    preview: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SpotDetails {
    #[serde(flatten)]
    spot: Spot,
    owner: User,
    spot_images: Vec<SpotImage>,
    avg_star_rating: Option<f64>,
    num_reviews: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RatedSpot {
    #[serde(flatten)]
    spot: Spot,
    avg_rating: Option<f64>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SpotPage {
    spots: Vec<Spot>,
    page: i64,
    size: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    id: i32,
    user_id: i32,
    spot_id: i32,
    stars: i32,
    review: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewImage {
    id: i32,
    url: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDetails {
    #[serde(flatten)]
    review: Review,
    user: User,
    review_images: Vec<ReviewImage>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    id: i32,
    spot_id: i32,
    user_id: i32,
    start_date: NaiveDate,
    end_date: NaiveDate,
}

/// The trimmed form listed for a spot's calendar
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingSummary {
    id: i32,
    start_date: NaiveDate,
    end_date: NaiveDate,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingWithSpot {
    #[serde(flatten)]
    booking: Booking,
    spot: Spot,
}

/// Helper trait to convert any type into a serialized version
pub trait ToSerialized<T>
where
    T: Serialize,
{
    fn to_serialized(&self) -> T;
}

impl<I, O> ToSerialized<Vec<O>> for Vec<I>
where
    I: ToSerialized<O>,
    O: Serialize,
{
    fn to_serialized(&self) -> Vec<O> {
        self.iter().map(|x| x.to_serialized()).collect()
    }
}

impl ToSerialized<User> for UserData {
    fn to_serialized(&self) -> User {
        User {
            id: self.id,
            email: self.email.clone(),
            username: self.username.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
        }
    }
}

impl ToSerialized<LoginResult> for SessionData {
    fn to_serialized(&self) -> LoginResult {
        LoginResult {
            token: self.token.clone(),
            user: self.user.to_serialized(),
        }
    }
}

impl ToSerialized<Spot> for SpotData {
    fn to_serialized(&self) -> Spot {
        Spot {
            id: self.id,
            owner_id: self.owner_id,
            address: self.address.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            country: self.country.clone(),
            lat: self.lat,
            lng: self.lng,
            name: self.name.clone(),
            description: self.description.clone(),
            price: self.price,
        }
    }
}

impl ToSerialized<SpotImage> for SpotImageData {
    fn to_serialized(&self) -> SpotImage {
        SpotImage {
            id: self.id,
            url: self.url.clone(),
            preview: self.preview,
        }
    }
}

impl ToSerialized<SpotDetails> for CoreSpotDetails {
    fn to_serialized(&self) -> SpotDetails {
        SpotDetails {
            spot: self.spot.to_serialized(),
            owner: self.owner.to_serialized(),
            spot_images: self.images.to_serialized(),
            avg_star_rating: self.rating.avg_stars,
            num_reviews: self.rating.review_count,
        }
    }
}

impl ToSerialized<RatedSpot> for CoreRatedSpot {
    fn to_serialized(&self) -> RatedSpot {
        RatedSpot {
            spot: self.spot.to_serialized(),
            avg_rating: self.rating.avg_stars,
        }
    }
}

impl SpotPage {
    pub fn new(spots: Vec<Spot>, page: i64, size: i64) -> Self {
        Self { spots, page, size }
    }
}

impl ToSerialized<Review> for ReviewData {
    fn to_serialized(&self) -> Review {
        Review {
            id: self.id,
            user_id: self.user_id,
            spot_id: self.spot_id,
            stars: self.stars,
            review: self.text.clone(),
        }
    }
}

impl ToSerialized<ReviewImage> for ReviewImageData {
    fn to_serialized(&self) -> ReviewImage {
        ReviewImage {
            id: self.id,
            url: self.url.clone(),
        }
    }
}

impl ToSerialized<ReviewDetails> for CoreReviewDetails {
    fn to_serialized(&self) -> ReviewDetails {
        ReviewDetails {
            review: self.review.to_serialized(),
            user: self.reviewer.to_serialized(),
            review_images: self.images.to_serialized(),
        }
    }
}

impl ToSerialized<Booking> for BookingData {
    fn to_serialized(&self) -> Booking {
        Booking {
            id: self.id,
            spot_id: self.spot_id,
            user_id: self.user_id,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

impl ToSerialized<BookingSummary> for BookingData {
    fn to_serialized(&self) -> BookingSummary {
        BookingSummary {
            id: self.id,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

impl ToSerialized<BookingWithSpot> for CoreBookingWithSpot {
    fn to_serialized(&self) -> BookingWithSpot {
        BookingWithSpot {
            booking: self.booking.to_serialized(),
            spot: self.spot.to_serialized(),
        }
    }
}
