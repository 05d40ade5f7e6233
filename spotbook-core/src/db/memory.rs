//! An in-memory [Database] used by the manager tests. Booking writes do the
//! collision scan and the insert under one lock, honoring the same
//! serialization contract as the postgres implementation.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;

use super::{
    BookingData, Database, DatabaseError, DatabaseResult, NewBooking, NewReview, NewReviewImage,
    NewSession, NewSpot, NewSpotImage, NewUser, Pagination, PrimaryKey, Result, ReviewData,
    ReviewImageData, SessionData, SpotData, SpotImageData, SpotRating, UpdatedBooking,
    UpdatedReview, UpdatedSpot, UserData,
};

#[derive(Default)]
struct Tables {
    next_id: PrimaryKey,
    users: Vec<UserData>,
    sessions: Vec<SessionData>,
    spots: Vec<SpotData>,
    spot_images: Vec<SpotImageData>,
    reviews: Vec<ReviewData>,
    review_images: Vec<ReviewImageData>,
    bookings: Vec<BookingData>,
}

impl Tables {
    fn next_id(&mut self) -> PrimaryKey {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct MemoryDatabase {
    tables: Mutex<Tables>,
}

fn not_found(resource: &'static str, identifier: &'static str) -> DatabaseError {
    DatabaseError::NotFound {
        resource,
        identifier,
    }
}

#[async_trait]
impl Database for MemoryDatabase {
    async fn user_by_id(&self, user_id: PrimaryKey) -> Result<UserData> {
        self.tables
            .lock()
            .users
            .iter()
            .find(|u| u.id == user_id)
            .cloned()
            .ok_or(not_found("user", "id"))
    }

    async fn user_by_credential(&self, credential: &str) -> Result<UserData> {
        self.tables
            .lock()
            .users
            .iter()
            .find(|u| u.email == credential || u.username == credential)
            .cloned()
            .ok_or(not_found("user", "credential"))
    }

    async fn create_user(&self, new_user: NewUser) -> Result<UserData> {
        self.user_by_credential(&new_user.email)
            .await
            .conflict_or_ok("user", "email", &new_user.email)?;
        self.user_by_credential(&new_user.username)
            .await
            .conflict_or_ok("user", "username", &new_user.username)?;

        let mut tables = self.tables.lock();
        let user = UserData {
            id: tables.next_id(),
            email: new_user.email,
            username: new_user.username,
            password: new_user.password,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
        };

        tables.users.push(user.clone());
        Ok(user)
    }

    async fn session_by_token(&self, token: &str) -> Result<SessionData> {
        self.tables
            .lock()
            .sessions
            .iter()
            .find(|s| s.token == token)
            .cloned()
            .ok_or(not_found("session", "token"))
    }

    async fn create_session(&self, new_session: NewSession) -> Result<SessionData> {
        let user = self.user_by_id(new_session.user_id).await?;

        let mut tables = self.tables.lock();
        let session = SessionData {
            id: tables.next_id(),
            token: new_session.token,
            expires_at: new_session.expires_at,
            user,
        };

        tables.sessions.push(session.clone());
        Ok(session)
    }

    async fn delete_session_by_token(&self, token: &str) -> Result<()> {
        let _ = self.session_by_token(token).await?;
        self.tables.lock().sessions.retain(|s| s.token != token);
        Ok(())
    }

    async fn clear_expired_sessions(&self) -> Result<()> {
        let now = Utc::now();
        self.tables.lock().sessions.retain(|s| s.expires_at > now);
        Ok(())
    }

    async fn spot_by_id(&self, spot_id: PrimaryKey) -> Result<SpotData> {
        self.tables
            .lock()
            .spots
            .iter()
            .find(|s| s.id == spot_id)
            .cloned()
            .ok_or(not_found("spot", "id"))
    }

    async fn list_spots(&self, page: Pagination) -> Result<Vec<SpotData>> {
        Ok(self
            .tables
            .lock()
            .spots
            .iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .cloned()
            .collect())
    }

    async fn spots_by_owner(&self, owner_id: PrimaryKey) -> Result<Vec<SpotData>> {
        Ok(self
            .tables
            .lock()
            .spots
            .iter()
            .filter(|s| s.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn create_spot(&self, new_spot: NewSpot) -> Result<SpotData> {
        let owner = self.user_by_id(new_spot.owner_id).await?;

        let mut tables = self.tables.lock();
        let spot = SpotData {
            id: tables.next_id(),
            owner_id: owner.id,
            address: new_spot.address,
            city: new_spot.city,
            state: new_spot.state,
            country: new_spot.country,
            lat: new_spot.lat,
            lng: new_spot.lng,
            name: new_spot.name,
            description: new_spot.description,
            price: new_spot.price,
        };

        tables.spots.push(spot.clone());
        Ok(spot)
    }

    async fn update_spot(&self, updated_spot: UpdatedSpot) -> Result<SpotData> {
        let mut tables = self.tables.lock();
        let spot = tables
            .spots
            .iter_mut()
            .find(|s| s.id == updated_spot.id)
            .ok_or(not_found("spot", "id"))?;

        if let Some(address) = updated_spot.address {
            spot.address = address;
        }
        if let Some(city) = updated_spot.city {
            spot.city = city;
        }
        if let Some(state) = updated_spot.state {
            spot.state = state;
        }
        if let Some(country) = updated_spot.country {
            spot.country = country;
        }
        if let Some(lat) = updated_spot.lat {
            spot.lat = lat;
        }
        if let Some(lng) = updated_spot.lng {
            spot.lng = lng;
        }
        if let Some(name) = updated_spot.name {
            spot.name = name;
        }
        if let Some(description) = updated_spot.description {
            spot.description = description;
        }
        if let Some(price) = updated_spot.price {
            spot.price = price;
        }

        Ok(spot.clone())
    }

    async fn delete_spot(&self, spot_id: PrimaryKey) -> Result<()> {
        let _ = self.spot_by_id(spot_id).await?;

        let mut tables = self.tables.lock();
        let review_ids: Vec<_> = tables
            .reviews
            .iter()
            .filter(|r| r.spot_id == spot_id)
            .map(|r| r.id)
            .collect();

        tables
            .review_images
            .retain(|i| !review_ids.contains(&i.review_id));
        tables.reviews.retain(|r| r.spot_id != spot_id);
        tables.bookings.retain(|b| b.spot_id != spot_id);
        tables.spot_images.retain(|i| i.spot_id != spot_id);
        tables.spots.retain(|s| s.id != spot_id);

        Ok(())
    }

    async fn spot_images(&self, spot_id: PrimaryKey) -> Result<Vec<SpotImageData>> {
        Ok(self
            .tables
            .lock()
            .spot_images
            .iter()
            .filter(|i| i.spot_id == spot_id)
            .cloned()
            .collect())
    }

    async fn create_spot_image(&self, new_image: NewSpotImage) -> Result<SpotImageData> {
        let mut tables = self.tables.lock();
        let image = SpotImageData {
            id: tables.next_id(),
            spot_id: new_image.spot_id,
            url: new_image.url,
            preview: new_image.preview,
        };

        tables.spot_images.push(image.clone());
        Ok(image)
    }

    async fn spot_rating(&self, spot_id: PrimaryKey) -> Result<SpotRating> {
        let tables = self.tables.lock();
        let stars: Vec<_> = tables
            .reviews
            .iter()
            .filter(|r| r.spot_id == spot_id)
            .map(|r| r.stars)
            .collect();

        let avg_stars = if stars.is_empty() {
            None
        } else {
            Some(stars.iter().sum::<i32>() as f64 / stars.len() as f64)
        };

        Ok(SpotRating {
            avg_stars,
            review_count: stars.len() as i64,
        })
    }

    async fn review_by_id(&self, review_id: PrimaryKey) -> Result<ReviewData> {
        self.tables
            .lock()
            .reviews
            .iter()
            .find(|r| r.id == review_id)
            .cloned()
            .ok_or(not_found("review", "id"))
    }

    async fn review_by_user_and_spot(
        &self,
        user_id: PrimaryKey,
        spot_id: PrimaryKey,
    ) -> Result<ReviewData> {
        self.tables
            .lock()
            .reviews
            .iter()
            .find(|r| r.user_id == user_id && r.spot_id == spot_id)
            .cloned()
            .ok_or(not_found("review", "user:spot"))
    }

    async fn reviews_by_spot(&self, spot_id: PrimaryKey) -> Result<Vec<ReviewData>> {
        Ok(self
            .tables
            .lock()
            .reviews
            .iter()
            .filter(|r| r.spot_id == spot_id)
            .cloned()
            .collect())
    }

    async fn reviews_by_user(&self, user_id: PrimaryKey) -> Result<Vec<ReviewData>> {
        Ok(self
            .tables
            .lock()
            .reviews
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create_review(&self, new_review: NewReview) -> Result<ReviewData> {
        self.review_by_user_and_spot(new_review.user_id, new_review.spot_id)
            .await
            .conflict_or_ok(
                "review",
                "user:spot",
                format!("{}:{}", new_review.user_id, new_review.spot_id).as_str(),
            )?;

        let mut tables = self.tables.lock();
        let review = ReviewData {
            id: tables.next_id(),
            user_id: new_review.user_id,
            spot_id: new_review.spot_id,
            stars: new_review.stars,
            text: new_review.text,
        };

        tables.reviews.push(review.clone());
        Ok(review)
    }

    async fn update_review(&self, updated_review: UpdatedReview) -> Result<ReviewData> {
        let mut tables = self.tables.lock();
        let review = tables
            .reviews
            .iter_mut()
            .find(|r| r.id == updated_review.id)
            .ok_or(not_found("review", "id"))?;

        if let Some(stars) = updated_review.stars {
            review.stars = stars;
        }
        if let Some(text) = updated_review.text {
            review.text = text;
        }

        Ok(review.clone())
    }

    async fn delete_review(&self, review_id: PrimaryKey) -> Result<()> {
        let _ = self.review_by_id(review_id).await?;

        let mut tables = self.tables.lock();
        tables.review_images.retain(|i| i.review_id != review_id);
        tables.reviews.retain(|r| r.id != review_id);
        Ok(())
    }

    async fn review_images(&self, review_id: PrimaryKey) -> Result<Vec<ReviewImageData>> {
        Ok(self
            .tables
            .lock()
            .review_images
            .iter()
            .filter(|i| i.review_id == review_id)
            .cloned()
            .collect())
    }

    async fn create_review_image(&self, new_image: NewReviewImage) -> Result<ReviewImageData> {
        let mut tables = self.tables.lock();
        let image = ReviewImageData {
            id: tables.next_id(),
            review_id: new_image.review_id,
            url: new_image.url,
        };

        tables.review_images.push(image.clone());
        Ok(image)
    }

    async fn booking_by_id(&self, booking_id: PrimaryKey) -> Result<BookingData> {
        self.tables
            .lock()
            .bookings
            .iter()
            .find(|b| b.id == booking_id)
            .cloned()
            .ok_or(not_found("booking", "id"))
    }

    async fn bookings_by_spot(&self, spot_id: PrimaryKey) -> Result<Vec<BookingData>> {
        Ok(self
            .tables
            .lock()
            .bookings
            .iter()
            .filter(|b| b.spot_id == spot_id)
            .cloned()
            .collect())
    }

    async fn bookings_by_user(&self, user_id: PrimaryKey) -> Result<Vec<BookingData>> {
        Ok(self
            .tables
            .lock()
            .bookings
            .iter()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create_booking(&self, new_booking: NewBooking) -> Result<BookingData> {
        // Scan and insert under one lock, like the serializable transaction
        // in postgres
        let mut tables = self.tables.lock();

        let conflicting: Vec<_> = tables
            .bookings
            .iter()
            .filter(|b| {
                b.spot_id == new_booking.spot_id
                    && b.start_date < new_booking.range.end()
                    && new_booking.range.start() < b.end_date
            })
            .cloned()
            .collect();

        if !conflicting.is_empty() {
            return Err(DatabaseError::BookingCollision { conflicting });
        }

        let booking = BookingData {
            id: tables.next_id(),
            spot_id: new_booking.spot_id,
            user_id: new_booking.user_id,
            start_date: new_booking.range.start(),
            end_date: new_booking.range.end(),
        };

        tables.bookings.push(booking.clone());
        Ok(booking)
    }

    async fn update_booking(&self, updated_booking: UpdatedBooking) -> Result<BookingData> {
        let mut tables = self.tables.lock();

        let current = tables
            .bookings
            .iter()
            .find(|b| b.id == updated_booking.id)
            .cloned()
            .ok_or(not_found("booking", "id"))?;

        let conflicting: Vec<_> = tables
            .bookings
            .iter()
            .filter(|b| {
                b.id != current.id
                    && b.spot_id == current.spot_id
                    && b.start_date < updated_booking.range.end()
                    && updated_booking.range.start() < b.end_date
            })
            .cloned()
            .collect();

        if !conflicting.is_empty() {
            return Err(DatabaseError::BookingCollision { conflicting });
        }

        let booking = tables
            .bookings
            .iter_mut()
            .find(|b| b.id == updated_booking.id)
            .expect("booking was found above");

        booking.start_date = updated_booking.range.start();
        booking.end_date = updated_booking.range.end();

        Ok(booking.clone())
    }

    async fn delete_booking(&self, booking_id: PrimaryKey) -> Result<()> {
        let _ = self.booking_by_id(booking_id).await?;
        self.tables.lock().bookings.retain(|b| b.id != booking_id);
        Ok(())
    }
}
