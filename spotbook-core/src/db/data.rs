use chrono::{DateTime, NaiveDate, Utc};

/// The type used for primary keys in the database.
pub type PrimaryKey = i32;

/// A spotbook account
#[derive(Debug, Clone)]
pub struct UserData {
    pub id: PrimaryKey,
    pub email: String,
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Login session data for authentication
#[derive(Debug, Clone)]
pub struct SessionData {
    pub id: PrimaryKey,
    /// The session token, or key if you will
    pub token: String,
    pub expires_at: DateTime<Utc>,
    /// The user that is logged in
    pub user: UserData,
}

/// A bookable listing
#[derive(Debug, Clone)]
pub struct SpotData {
    pub id: PrimaryKey,
    /// The user that owns this spot and may mutate it
    pub owner_id: PrimaryKey,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub lat: f64,
    pub lng: f64,
    pub name: String,
    pub description: String,
    /// Price per night
    pub price: f64,
}

/// An image attached to a spot
#[derive(Debug, Clone)]
pub struct SpotImageData {
    pub id: PrimaryKey,
    pub spot_id: PrimaryKey,
    pub url: String,
    /// Whether this image is the spot's preview image
    pub preview: bool,
}

/// A review left by a user on a spot.
/// Note: `user_id` and `spot_id` are unique together.
#[derive(Debug, Clone)]
pub struct ReviewData {
    pub id: PrimaryKey,
    pub user_id: PrimaryKey,
    pub spot_id: PrimaryKey,
    /// 1 to 5 stars
    pub stars: i32,
    pub text: String,
}

/// An image attached to a review
#[derive(Debug, Clone)]
pub struct ReviewImageData {
    pub id: PrimaryKey,
    pub review_id: PrimaryKey,
    pub url: String,
}

/// A reservation of a spot for a date range.
/// The range is half-open: the booking occupies `[start_date, end_date)`.
#[derive(Debug, Clone)]
pub struct BookingData {
    pub id: PrimaryKey,
    pub spot_id: PrimaryKey,
    /// The renter, who alone may mutate the booking
    pub user_id: PrimaryKey,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Review aggregates for a spot
#[derive(Debug, Clone, Copy)]
pub struct SpotRating {
    pub avg_stars: Option<f64>,
    pub review_count: i64,
}
