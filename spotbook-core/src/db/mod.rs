use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::availability::DateRange;

mod data;
pub use data::*;

mod pg;
pub use pg::*;

#[cfg(test)]
mod memory;
#[cfg(test)]
pub use memory::MemoryDatabase;

pub type Result<T> = std::result::Result<T, DatabaseError>;

#[derive(Debug, Error)]
pub enum DatabaseError {
    /// An unknown or internal error happened with the database
    #[error(transparent)]
    Internal(Box<dyn std::error::Error + Send + Sync>),
    /// A resource already exists
    #[error("{resource} with {field} of value {value} already exists")]
    Conflict {
        /// The resource in question
        resource: &'static str,
        /// The field that is conflicting
        field: &'static str,
        /// The conflicting value
        value: String,
    },
    /// A resource in the database doesn't exist
    #[error("{resource}:{identifier} doesn't exist")]
    NotFound {
        resource: &'static str,
        identifier: &'static str,
    },
    /// A booking write collided with existing bookings for the same spot.
    /// The list is empty when the collision was detected by the store's
    /// exclusion constraint rather than the pre-write scan.
    #[error("booking dates collide with an existing booking")]
    BookingCollision { conflicting: Vec<BookingData> },
}

/// Helper trait to reduce boilerplate
pub trait IntoDatabaseError {
    fn not_found_or(self, resource: &'static str, identifier: &'static str) -> DatabaseError;
    fn any(self) -> DatabaseError;
}

/// Helper trait to reduce boilerplate
pub trait DatabaseResult {
    /// Turns the Result into a conflict error if it's Ok()
    fn conflict_or_ok(self, resource: &'static str, field: &'static str, value: &str)
        -> Result<()>;
}

impl<T> DatabaseResult for Result<T> {
    fn conflict_or_ok(
        self,
        resource: &'static str,
        field: &'static str,
        value: &str,
    ) -> Result<()> {
        match self {
            Ok(_) => Err(DatabaseError::Conflict {
                resource,
                field,
                value: value.to_string(),
            }),
            Err(e) => match e {
                DatabaseError::NotFound { .. } => Ok(()),
                e => Err(e),
            },
        }
    }
}

/// Represents a type that can fetch spotbook data from a database
#[async_trait]
pub trait Database: Send + Sync {
    async fn user_by_id(&self, user_id: PrimaryKey) -> Result<UserData>;
    /// Looks a user up by email or username
    async fn user_by_credential(&self, credential: &str) -> Result<UserData>;
    async fn create_user(&self, new_user: NewUser) -> Result<UserData>;

    async fn session_by_token(&self, token: &str) -> Result<SessionData>;
    async fn create_session(&self, new_session: NewSession) -> Result<SessionData>;
    async fn delete_session_by_token(&self, token: &str) -> Result<()>;
    async fn clear_expired_sessions(&self) -> Result<()>;

    async fn spot_by_id(&self, spot_id: PrimaryKey) -> Result<SpotData>;
    async fn list_spots(&self, page: Pagination) -> Result<Vec<SpotData>>;
    async fn spots_by_owner(&self, owner_id: PrimaryKey) -> Result<Vec<SpotData>>;
    async fn create_spot(&self, new_spot: NewSpot) -> Result<SpotData>;
    async fn update_spot(&self, updated_spot: UpdatedSpot) -> Result<SpotData>;
    /// Deletes a spot along with its bookings, reviews, and images
    async fn delete_spot(&self, spot_id: PrimaryKey) -> Result<()>;
    async fn spot_images(&self, spot_id: PrimaryKey) -> Result<Vec<SpotImageData>>;
    async fn create_spot_image(&self, new_image: NewSpotImage) -> Result<SpotImageData>;
    async fn spot_rating(&self, spot_id: PrimaryKey) -> Result<SpotRating>;

    async fn review_by_id(&self, review_id: PrimaryKey) -> Result<ReviewData>;
    async fn review_by_user_and_spot(
        &self,
        user_id: PrimaryKey,
        spot_id: PrimaryKey,
    ) -> Result<ReviewData>;
    async fn reviews_by_spot(&self, spot_id: PrimaryKey) -> Result<Vec<ReviewData>>;
    async fn reviews_by_user(&self, user_id: PrimaryKey) -> Result<Vec<ReviewData>>;
    async fn create_review(&self, new_review: NewReview) -> Result<ReviewData>;
    async fn update_review(&self, updated_review: UpdatedReview) -> Result<ReviewData>;
    /// Deletes a review along with its images
    async fn delete_review(&self, review_id: PrimaryKey) -> Result<()>;
    async fn review_images(&self, review_id: PrimaryKey) -> Result<Vec<ReviewImageData>>;
    async fn create_review_image(&self, new_image: NewReviewImage) -> Result<ReviewImageData>;

    async fn booking_by_id(&self, booking_id: PrimaryKey) -> Result<BookingData>;
    async fn bookings_by_spot(&self, spot_id: PrimaryKey) -> Result<Vec<BookingData>>;
    async fn bookings_by_user(&self, user_id: PrimaryKey) -> Result<Vec<BookingData>>;
    /// Inserts a booking. The scan for colliding date ranges and the insert
    /// happen in one serialized critical section, so two racing writes for
    /// overlapping ranges on the same spot cannot both succeed.
    async fn create_booking(&self, new_booking: NewBooking) -> Result<BookingData>;
    /// Same contract as [Database::create_booking], with the booking itself
    /// excluded from the collision scan.
    async fn update_booking(&self, updated_booking: UpdatedBooking) -> Result<BookingData>;
    async fn delete_booking(&self, booking_id: PrimaryKey) -> Result<()>;
}

#[derive(Debug)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug)]
pub struct NewSession {
    pub token: String,
    pub user_id: PrimaryKey,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct NewSpot {
    /// The owner of the new spot
    pub owner_id: PrimaryKey,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub lat: f64,
    pub lng: f64,
    pub name: String,
    pub description: String,
    pub price: f64,
}

#[derive(Debug, Default)]
pub struct UpdatedSpot {
    pub id: PrimaryKey,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
}

#[derive(Debug)]
pub struct NewSpotImage {
    pub spot_id: PrimaryKey,
    pub url: String,
    pub preview: bool,
}

#[derive(Debug)]
pub struct NewReview {
    pub user_id: PrimaryKey,
    pub spot_id: PrimaryKey,
    pub stars: i32,
    pub text: String,
}

#[derive(Debug)]
pub struct UpdatedReview {
    pub id: PrimaryKey,
    pub stars: Option<i32>,
    pub text: Option<String>,
}

#[derive(Debug)]
pub struct NewReviewImage {
    pub review_id: PrimaryKey,
    pub url: String,
}

#[derive(Debug)]
pub struct NewBooking {
    pub spot_id: PrimaryKey,
    /// The renter making the booking
    pub user_id: PrimaryKey,
    pub range: DateRange,
}

#[derive(Debug)]
pub struct UpdatedBooking {
    pub id: PrimaryKey,
    pub range: DateRange,
}

/// Limit/offset pagination for spot listings
#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    pub page: i64,
    pub size: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self { page: 0, size: 10 }
    }
}

impl Pagination {
    pub fn new(page: Option<i64>, size: Option<i64>) -> Self {
        let default = Self::default();

        Self {
            page: page.unwrap_or(default.page).max(0),
            size: size.unwrap_or(default.size).clamp(1, 100),
        }
    }

    pub fn limit(&self) -> i64 {
        self.size
    }

    pub fn offset(&self) -> i64 {
        self.page * self.size
    }
}
