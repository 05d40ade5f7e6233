use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{postgres::PgPoolOptions, prelude::FromRow, Error as SqlxError, PgPool, Postgres,
    Transaction};

use crate::{
    BookingData, Database, DatabaseError, DatabaseResult, IntoDatabaseError, NewBooking,
    NewReview, NewReviewImage, NewSession, NewSpot, NewSpotImage, NewUser, Pagination,
    PrimaryKey, Result, ReviewData, ReviewImageData, SessionData, SpotData, SpotImageData,
    SpotRating, UpdatedBooking, UpdatedReview, UpdatedSpot, UserData,
};

/// A postgres database implementation for spotbook
pub struct PgDatabase {
    pool: PgPool,
}

// Postgres error codes surfaced by booking writes racing each other:
// exclusion constraint violation and serialization failure.
const EXCLUSION_VIOLATION: &str = "23P01";
const SERIALIZATION_FAILURE: &str = "40001";
const UNIQUE_VIOLATION: &str = "23505";

#[derive(FromRow)]
struct UserRow {
    id: PrimaryKey,
    email: String,
    username: String,
    password: String,
    first_name: String,
    last_name: String,
}

impl From<UserRow> for UserData {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            username: row.username,
            password: row.password,
            first_name: row.first_name,
            last_name: row.last_name,
        }
    }
}

#[derive(FromRow)]
struct SessionRow {
    id: PrimaryKey,
    token: String,
    expires_at: DateTime<Utc>,
    user_id: PrimaryKey,
    email: String,
    username: String,
    password: String,
    first_name: String,
    last_name: String,
}

impl From<SessionRow> for SessionData {
    fn from(row: SessionRow) -> Self {
        Self {
            id: row.id,
            token: row.token,
            expires_at: row.expires_at,
            user: UserData {
                id: row.user_id,
                email: row.email,
                username: row.username,
                password: row.password,
                first_name: row.first_name,
                last_name: row.last_name,
            },
        }
    }
}

#[derive(FromRow)]
struct SpotRow {
    id: PrimaryKey,
    owner_id: PrimaryKey,
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

impl From<SpotRow> for SpotData {
    fn from(row: SpotRow) -> Self {
        Self {
            id: row.id,
            owner_id: row.owner_id,
            address: row.address,
            city: row.city,
            state: row.state,
            country: row.country,
            lat: row.lat,
            lng: row.lng,
            name: row.name,
            description: row.description,
            price: row.price,
        }
    }
}

#[derive(FromRow)]
struct SpotImageRow {
    id: PrimaryKey,
    spot_id: PrimaryKey,
    url: String,
    preview: bool,
}

impl From<SpotImageRow> for SpotImageData {
    fn from(row: SpotImageRow) -> Self {
        Self {
            id: row.id,
            spot_id: row.spot_id,
            url: row.url,
            preview: row.preview,
        }
    }
}

#[derive(FromRow)]
struct ReviewRow {
    id: PrimaryKey,
    user_id: PrimaryKey,
    spot_id: PrimaryKey,
    stars: i32,
    text: String,
}

impl From<ReviewRow> for ReviewData {
    fn from(row: ReviewRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            spot_id: row.spot_id,
            stars: row.stars,
            text: row.text,
        }
    }
}

#[derive(FromRow)]
struct ReviewImageRow {
    id: PrimaryKey,
    review_id: PrimaryKey,
    url: String,
}

impl From<ReviewImageRow> for ReviewImageData {
    fn from(row: ReviewImageRow) -> Self {
        Self {
            id: row.id,
            review_id: row.review_id,
            url: row.url,
        }
    }
}

#[derive(FromRow)]
struct BookingRow {
    id: PrimaryKey,
    spot_id: PrimaryKey,
    user_id: PrimaryKey,
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl From<BookingRow> for BookingData {
    fn from(row: BookingRow) -> Self {
        Self {
            id: row.id,
            spot_id: row.spot_id,
            user_id: row.user_id,
            start_date: row.start_date,
            end_date: row.end_date,
        }
    }
}

impl PgDatabase {
    pub async fn new(url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await
            .map_err(|e| DatabaseError::Internal(Box::new(e)))?;

        Ok(Self { pool })
    }

    async fn user_by_email(&self, email: &str) -> Result<UserData> {
        sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map(Into::into)
            .map_err(|e| e.not_found_or("user", "email"))
    }

    async fn user_by_username(&self, username: &str) -> Result<UserData> {
        sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_one(&self.pool)
            .await
            .map(Into::into)
            .map_err(|e| e.not_found_or("user", "username"))
    }

    async fn begin_serializable(&self) -> Result<Transaction<'_, Postgres>> {
        let mut tx = self.pool.begin().await.map_err(|e| e.any())?;

        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut *tx)
            .await
            .map_err(|e| e.any())?;

        Ok(tx)
    }

    /// Scans for bookings colliding with a half-open range inside an open
    /// transaction, so the scan and the following write are serialized.
    async fn colliding_bookings(
        tx: &mut Transaction<'_, Postgres>,
        spot_id: PrimaryKey,
        start_date: NaiveDate,
        end_date: NaiveDate,
        exclude: Option<PrimaryKey>,
    ) -> Result<Vec<BookingData>> {
        let rows = sqlx::query_as::<_, BookingRow>(
            "SELECT * FROM bookings
             WHERE spot_id = $1 AND start_date < $3 AND $2 < end_date AND id <> $4
             ORDER BY start_date",
        )
        .bind(spot_id)
        .bind(start_date)
        .bind(end_date)
        .bind(exclude.unwrap_or(-1))
        .fetch_all(&mut **tx)
        .await
        .map_err(|e| e.any())?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

/// Maps errors from a booking insert or update. A violation of the range
/// exclusion constraint, or a serialization failure of the surrounding
/// transaction, means another booking won the race.
fn booking_write_error(e: SqlxError) -> DatabaseError {
    let code = match &e {
        SqlxError::Database(db) => db.code().map(|c| c.to_string()),
        _ => None,
    };

    match code.as_deref() {
        Some(EXCLUSION_VIOLATION) | Some(SERIALIZATION_FAILURE) => {
            DatabaseError::BookingCollision { conflicting: vec![] }
        }
        _ => e.any(),
    }
}

/// Maps a unique index violation to a conflict on the given field
fn unique_or_any(
    e: SqlxError,
    resource: &'static str,
    field: &'static str,
    value: &str,
) -> DatabaseError {
    let is_unique = match &e {
        SqlxError::Database(db) => db.code().as_deref() == Some(UNIQUE_VIOLATION),
        _ => false,
    };

    if is_unique {
        DatabaseError::Conflict {
            resource,
            field,
            value: value.to_string(),
        }
    } else {
        e.any()
    }
}

#[async_trait]
impl Database for PgDatabase {
    async fn user_by_id(&self, user_id: PrimaryKey) -> Result<UserData> {
        sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map(Into::into)
            .map_err(|e| e.not_found_or("user", "id"))
    }

    async fn user_by_credential(&self, credential: &str) -> Result<UserData> {
        sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1 OR username = $1")
            .bind(credential)
            .fetch_one(&self.pool)
            .await
            .map(Into::into)
            .map_err(|e| e.not_found_or("user", "credential"))
    }

    async fn create_user(&self, new_user: NewUser) -> Result<UserData> {
        self.user_by_email(&new_user.email)
            .await
            .conflict_or_ok("user", "email", &new_user.email)?;
        self.user_by_username(&new_user.username)
            .await
            .conflict_or_ok("user", "username", &new_user.username)?;

        sqlx::query_as::<_, UserRow>(
            "INSERT INTO users (email, username, password, first_name, last_name)
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(&new_user.email)
        .bind(&new_user.username)
        .bind(&new_user.password)
        .bind(&new_user.first_name)
        .bind(&new_user.last_name)
        .fetch_one(&self.pool)
        .await
        .map(Into::into)
        .map_err(|e| unique_or_any(e, "user", "email or username", &new_user.email))
    }

    async fn session_by_token(&self, token: &str) -> Result<SessionData> {
        sqlx::query_as::<_, SessionRow>(
            "SELECT
                sessions.id, sessions.token, sessions.expires_at,
                users.id AS user_id,
                users.email, users.username, users.password,
                users.first_name, users.last_name
            FROM sessions
                INNER JOIN users ON sessions.user_id = users.id
            WHERE token = $1",
        )
        .bind(token)
        .fetch_one(&self.pool)
        .await
        .map(Into::into)
        .map_err(|e| e.not_found_or("session", "token"))
    }

    async fn create_session(&self, new_session: NewSession) -> Result<SessionData> {
        self.session_by_token(&new_session.token)
            .await
            .conflict_or_ok("session", "token", &new_session.token)?;

        sqlx::query("INSERT INTO sessions (token, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(&new_session.token)
            .bind(new_session.user_id)
            .bind(new_session.expires_at)
            .execute(&self.pool)
            .await
            .map_err(|e| e.any())?;

        self.session_by_token(&new_session.token).await
    }

    async fn delete_session_by_token(&self, token: &str) -> Result<()> {
        // Ensure session exists
        let _ = self.session_by_token(token).await?;

        sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(|e| e.any())
            .map(|_| ())
    }

    async fn clear_expired_sessions(&self) -> Result<()> {
        sqlx::query("DELETE FROM sessions WHERE timezone('UTC', now()) > expires_at")
            .execute(&self.pool)
            .await
            .map_err(|e| e.any())
            .map(|_| ())
    }

    async fn spot_by_id(&self, spot_id: PrimaryKey) -> Result<SpotData> {
        sqlx::query_as::<_, SpotRow>("SELECT * FROM spots WHERE id = $1")
            .bind(spot_id)
            .fetch_one(&self.pool)
            .await
            .map(Into::into)
            .map_err(|e| e.not_found_or("spot", "id"))
    }

    async fn list_spots(&self, page: Pagination) -> Result<Vec<SpotData>> {
        let rows = sqlx::query_as::<_, SpotRow>(
            "SELECT * FROM spots ORDER BY id LIMIT $1 OFFSET $2",
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| e.any())?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn spots_by_owner(&self, owner_id: PrimaryKey) -> Result<Vec<SpotData>> {
        let rows = sqlx::query_as::<_, SpotRow>(
            "SELECT * FROM spots WHERE owner_id = $1 ORDER BY id",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| e.any())?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create_spot(&self, new_spot: NewSpot) -> Result<SpotData> {
        // Ensure the owner exists
        let owner = self.user_by_id(new_spot.owner_id).await?;

        sqlx::query_as::<_, SpotRow>(
            "INSERT INTO spots
                (owner_id, address, city, state, country, lat, lng, name, description, price)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING *",
        )
        .bind(owner.id)
        .bind(&new_spot.address)
        .bind(&new_spot.city)
        .bind(&new_spot.state)
        .bind(&new_spot.country)
        .bind(new_spot.lat)
        .bind(new_spot.lng)
        .bind(&new_spot.name)
        .bind(&new_spot.description)
        .bind(new_spot.price)
        .fetch_one(&self.pool)
        .await
        .map(Into::into)
        .map_err(|e| e.any())
    }

    async fn update_spot(&self, updated_spot: UpdatedSpot) -> Result<SpotData> {
        let spot = self.spot_by_id(updated_spot.id).await?;

        sqlx::query_as::<_, SpotRow>(
            "UPDATE spots SET
                address = $1, city = $2, state = $3, country = $4,
                lat = $5, lng = $6, name = $7, description = $8, price = $9
             WHERE id = $10
             RETURNING *",
        )
        .bind(updated_spot.address.unwrap_or(spot.address))
        .bind(updated_spot.city.unwrap_or(spot.city))
        .bind(updated_spot.state.unwrap_or(spot.state))
        .bind(updated_spot.country.unwrap_or(spot.country))
        .bind(updated_spot.lat.unwrap_or(spot.lat))
        .bind(updated_spot.lng.unwrap_or(spot.lng))
        .bind(updated_spot.name.unwrap_or(spot.name))
        .bind(updated_spot.description.unwrap_or(spot.description))
        .bind(updated_spot.price.unwrap_or(spot.price))
        .bind(updated_spot.id)
        .fetch_one(&self.pool)
        .await
        .map(Into::into)
        .map_err(|e| e.any())
    }

    async fn delete_spot(&self, spot_id: PrimaryKey) -> Result<()> {
        // Ensure spot exists
        let _ = self.spot_by_id(spot_id).await?;

        // No cascading delete in the schema, so the dependents are removed
        // explicitly inside one transaction
        let mut tx = self.pool.begin().await.map_err(|e| e.any())?;

        sqlx::query(
            "DELETE FROM review_images
             WHERE review_id IN (SELECT id FROM reviews WHERE spot_id = $1)",
        )
        .bind(spot_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| e.any())?;

        for statement in [
            "DELETE FROM reviews WHERE spot_id = $1",
            "DELETE FROM bookings WHERE spot_id = $1",
            "DELETE FROM spot_images WHERE spot_id = $1",
            "DELETE FROM spots WHERE id = $1",
        ] {
            sqlx::query(statement)
                .bind(spot_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| e.any())?;
        }

        tx.commit().await.map_err(|e| e.any())
    }

    async fn spot_images(&self, spot_id: PrimaryKey) -> Result<Vec<SpotImageData>> {
        let rows = sqlx::query_as::<_, SpotImageRow>(
            "SELECT * FROM spot_images WHERE spot_id = $1 ORDER BY id",
        )
        .bind(spot_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| e.any())?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create_spot_image(&self, new_image: NewSpotImage) -> Result<SpotImageData> {
        sqlx::query_as::<_, SpotImageRow>(
            "INSERT INTO spot_images (spot_id, url, preview) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(new_image.spot_id)
        .bind(&new_image.url)
        .bind(new_image.preview)
        .fetch_one(&self.pool)
        .await
        .map(Into::into)
        .map_err(|e| e.any())
    }

    async fn spot_rating(&self, spot_id: PrimaryKey) -> Result<SpotRating> {
        let (avg_stars, review_count) = sqlx::query_as::<_, (Option<f64>, i64)>(
            "SELECT AVG(stars)::float8, COUNT(*) FROM reviews WHERE spot_id = $1",
        )
        .bind(spot_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| e.any())?;

        Ok(SpotRating {
            avg_stars,
            review_count,
        })
    }

    async fn review_by_id(&self, review_id: PrimaryKey) -> Result<ReviewData> {
        sqlx::query_as::<_, ReviewRow>("SELECT * FROM reviews WHERE id = $1")
            .bind(review_id)
            .fetch_one(&self.pool)
            .await
            .map(Into::into)
            .map_err(|e| e.not_found_or("review", "id"))
    }

    async fn review_by_user_and_spot(
        &self,
        user_id: PrimaryKey,
        spot_id: PrimaryKey,
    ) -> Result<ReviewData> {
        sqlx::query_as::<_, ReviewRow>(
            "SELECT * FROM reviews WHERE user_id = $1 AND spot_id = $2",
        )
        .bind(user_id)
        .bind(spot_id)
        .fetch_one(&self.pool)
        .await
        .map(Into::into)
        .map_err(|e| e.not_found_or("review", "user:spot"))
    }

    async fn reviews_by_spot(&self, spot_id: PrimaryKey) -> Result<Vec<ReviewData>> {
        let rows = sqlx::query_as::<_, ReviewRow>(
            "SELECT * FROM reviews WHERE spot_id = $1 ORDER BY id",
        )
        .bind(spot_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| e.any())?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn reviews_by_user(&self, user_id: PrimaryKey) -> Result<Vec<ReviewData>> {
        let rows = sqlx::query_as::<_, ReviewRow>(
            "SELECT * FROM reviews WHERE user_id = $1 ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| e.any())?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create_review(&self, new_review: NewReview) -> Result<ReviewData> {
        // A user may only review a spot once
        self.review_by_user_and_spot(new_review.user_id, new_review.spot_id)
            .await
            .conflict_or_ok(
                "review",
                "user:spot",
                format!("{}:{}", new_review.user_id, new_review.spot_id).as_str(),
            )?;

        sqlx::query_as::<_, ReviewRow>(
            "INSERT INTO reviews (user_id, spot_id, stars, text)
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(new_review.user_id)
        .bind(new_review.spot_id)
        .bind(new_review.stars)
        .bind(&new_review.text)
        .fetch_one(&self.pool)
        .await
        .map(Into::into)
        .map_err(|e| {
            unique_or_any(
                e,
                "review",
                "user:spot",
                &format!("{}:{}", new_review.user_id, new_review.spot_id),
            )
        })
    }

    async fn update_review(&self, updated_review: UpdatedReview) -> Result<ReviewData> {
        let review = self.review_by_id(updated_review.id).await?;

        sqlx::query_as::<_, ReviewRow>(
            "UPDATE reviews SET stars = $1, text = $2 WHERE id = $3 RETURNING *",
        )
        .bind(updated_review.stars.unwrap_or(review.stars))
        .bind(updated_review.text.unwrap_or(review.text))
        .bind(updated_review.id)
        .fetch_one(&self.pool)
        .await
        .map(Into::into)
        .map_err(|e| e.any())
    }

    async fn delete_review(&self, review_id: PrimaryKey) -> Result<()> {
        // Ensure review exists
        let _ = self.review_by_id(review_id).await?;

        let mut tx = self.pool.begin().await.map_err(|e| e.any())?;

        sqlx::query("DELETE FROM review_images WHERE review_id = $1")
            .bind(review_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| e.any())?;

        sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(review_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| e.any())?;

        tx.commit().await.map_err(|e| e.any())
    }

    async fn review_images(&self, review_id: PrimaryKey) -> Result<Vec<ReviewImageData>> {
        let rows = sqlx::query_as::<_, ReviewImageRow>(
            "SELECT * FROM review_images WHERE review_id = $1 ORDER BY id",
        )
        .bind(review_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| e.any())?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create_review_image(&self, new_image: NewReviewImage) -> Result<ReviewImageData> {
        sqlx::query_as::<_, ReviewImageRow>(
            "INSERT INTO review_images (review_id, url) VALUES ($1, $2) RETURNING *",
        )
        .bind(new_image.review_id)
        .bind(&new_image.url)
        .fetch_one(&self.pool)
        .await
        .map(Into::into)
        .map_err(|e| e.any())
    }

    async fn booking_by_id(&self, booking_id: PrimaryKey) -> Result<BookingData> {
        sqlx::query_as::<_, BookingRow>("SELECT * FROM bookings WHERE id = $1")
            .bind(booking_id)
            .fetch_one(&self.pool)
            .await
            .map(Into::into)
            .map_err(|e| e.not_found_or("booking", "id"))
    }

    async fn bookings_by_spot(&self, spot_id: PrimaryKey) -> Result<Vec<BookingData>> {
        let rows = sqlx::query_as::<_, BookingRow>(
            "SELECT * FROM bookings WHERE spot_id = $1 ORDER BY start_date",
        )
        .bind(spot_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| e.any())?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn bookings_by_user(&self, user_id: PrimaryKey) -> Result<Vec<BookingData>> {
        let rows = sqlx::query_as::<_, BookingRow>(
            "SELECT * FROM bookings WHERE user_id = $1 ORDER BY start_date",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| e.any())?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create_booking(&self, new_booking: NewBooking) -> Result<BookingData> {
        let mut tx = self.begin_serializable().await?;

        let conflicting = Self::colliding_bookings(
            &mut tx,
            new_booking.spot_id,
            new_booking.range.start(),
            new_booking.range.end(),
            None,
        )
        .await?;

        if !conflicting.is_empty() {
            return Err(DatabaseError::BookingCollision { conflicting });
        }

        let row = sqlx::query_as::<_, BookingRow>(
            "INSERT INTO bookings (spot_id, user_id, start_date, end_date)
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(new_booking.spot_id)
        .bind(new_booking.user_id)
        .bind(new_booking.range.start())
        .bind(new_booking.range.end())
        .fetch_one(&mut *tx)
        .await
        .map_err(booking_write_error)?;

        tx.commit().await.map_err(booking_write_error)?;

        Ok(row.into())
    }

    async fn update_booking(&self, updated_booking: UpdatedBooking) -> Result<BookingData> {
        let booking = self.booking_by_id(updated_booking.id).await?;

        let mut tx = self.begin_serializable().await?;

        let conflicting = Self::colliding_bookings(
            &mut tx,
            booking.spot_id,
            updated_booking.range.start(),
            updated_booking.range.end(),
            Some(booking.id),
        )
        .await?;

        if !conflicting.is_empty() {
            return Err(DatabaseError::BookingCollision { conflicting });
        }

        let row = sqlx::query_as::<_, BookingRow>(
            "UPDATE bookings SET start_date = $1, end_date = $2 WHERE id = $3 RETURNING *",
        )
        .bind(updated_booking.range.start())
        .bind(updated_booking.range.end())
        .bind(updated_booking.id)
        .fetch_one(&mut *tx)
        .await
        .map_err(booking_write_error)?;

        tx.commit().await.map_err(booking_write_error)?;

        Ok(row.into())
    }

    async fn delete_booking(&self, booking_id: PrimaryKey) -> Result<()> {
        // Ensure booking exists
        let _ = self.booking_by_id(booking_id).await?;

        sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(booking_id)
            .execute(&self.pool)
            .await
            .map_err(|e| e.any())
            .map(|_| ())
    }
}

impl IntoDatabaseError for SqlxError {
    fn any(self) -> DatabaseError {
        DatabaseError::Internal(Box::new(self))
    }

    fn not_found_or(self, resource: &'static str, identifier: &'static str) -> DatabaseError {
        match self {
            SqlxError::RowNotFound => DatabaseError::NotFound {
                resource,
                identifier,
            },
            e => Self::any(e),
        }
    }
}
