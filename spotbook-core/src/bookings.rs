//! Booking orchestration: availability checking, ownership, and the
//! translation of store-level collisions into classified conflicts.

use chrono::NaiveDate;
use std::sync::Arc;
use thiserror::Error;

use crate::{
    availability::{find_conflicts, Conflict, ConflictKind, DateRange},
    guard::{ensure_booking_deletable, ensure_owner, GuardError},
    BookingData, Database, DatabaseError, NewBooking, PrimaryKey, SpotData, UpdatedBooking,
};

pub struct BookingManager<Db> {
    db: Arc<Db>,
}

#[derive(Debug, Error)]
pub enum BookingError {
    /// The requested range overlaps existing bookings for the spot. The list
    /// is empty when the store detected the collision after a clean
    /// pre-check, in which case both dates should be reported as taken.
    #[error("the spot is already booked for the specified dates")]
    Conflict { conflicts: Vec<Conflict> },
    #[error(transparent)]
    Guard(#[from] GuardError),
    #[error(transparent)]
    Db(DatabaseError),
}

impl From<DatabaseError> for BookingError {
    fn from(value: DatabaseError) -> Self {
        match value {
            DatabaseError::BookingCollision { conflicting } => Self::Conflict {
                conflicts: conflicting
                    .into_iter()
                    .map(|booking| Conflict {
                        kind: ConflictKind::Both,
                        booking,
                    })
                    .collect(),
            },
            e => Self::Db(e),
        }
    }
}

/// A booking joined with the spot it reserves
#[derive(Debug, Clone)]
pub struct BookingWithSpot {
    pub booking: BookingData,
    pub spot: SpotData,
}

impl<Db> BookingManager<Db>
where
    Db: Database,
{
    pub fn new(db: &Arc<Db>) -> Self {
        Self { db: db.clone() }
    }

    /// Evaluates a candidate range against every existing booking for the
    /// spot. `exclude` skips the booking being updated.
    pub async fn check_availability(
        &self,
        spot_id: PrimaryKey,
        range: DateRange,
        exclude: Option<PrimaryKey>,
    ) -> Result<Vec<Conflict>, DatabaseError> {
        let existing = self.db.bookings_by_spot(spot_id).await?;

        Ok(find_conflicts(range, &existing, exclude))
    }

    /// Books a spot for a date range. The pre-check produces classified,
    /// field-level conflicts; the store's own serialized scan closes the
    /// race between the check and the write.
    pub async fn create_booking(
        &self,
        user_id: PrimaryKey,
        spot_id: PrimaryKey,
        range: DateRange,
    ) -> Result<BookingData, BookingError> {
        // Missing spots take priority over conflicts
        let spot = self.db.spot_by_id(spot_id).await.map_err(BookingError::Db)?;

        let conflicts = self
            .check_availability(spot.id, range, None)
            .await
            .map_err(BookingError::Db)?;

        if !conflicts.is_empty() {
            return Err(BookingError::Conflict { conflicts });
        }

        let new_booking = NewBooking {
            spot_id: spot.id,
            user_id,
            range,
        };

        let booking = self.db.create_booking(new_booking).await?;

        Ok(booking)
    }

    /// Moves a booking to a new date range, excluding its own stored range
    /// from the conflict scan
    pub async fn update_booking(
        &self,
        user_id: PrimaryKey,
        booking_id: PrimaryKey,
        range: DateRange,
    ) -> Result<BookingData, BookingError> {
        let booking = self
            .db
            .booking_by_id(booking_id)
            .await
            .map_err(BookingError::Db)?;

        ensure_owner(user_id, &booking)?;

        let conflicts = self
            .check_availability(booking.spot_id, range, Some(booking.id))
            .await
            .map_err(BookingError::Db)?;

        if !conflicts.is_empty() {
            return Err(BookingError::Conflict { conflicts });
        }

        let updated = self
            .db
            .update_booking(UpdatedBooking {
                id: booking.id,
                range,
            })
            .await?;

        Ok(updated)
    }

    /// Deletes a booking. Only the renter may delete it, and only before it
    /// starts.
    pub async fn delete_booking(
        &self,
        user_id: PrimaryKey,
        booking_id: PrimaryKey,
        today: NaiveDate,
    ) -> Result<(), BookingError> {
        let booking = self
            .db
            .booking_by_id(booking_id)
            .await
            .map_err(BookingError::Db)?;

        ensure_owner(user_id, &booking)?;
        ensure_booking_deletable(&booking, today)?;

        self.db
            .delete_booking(booking.id)
            .await
            .map_err(BookingError::Db)
    }

    /// All bookings made by a user, with the spots they reserve
    pub async fn bookings_for_user(
        &self,
        user_id: PrimaryKey,
    ) -> Result<Vec<BookingWithSpot>, DatabaseError> {
        let bookings = self.db.bookings_by_user(user_id).await?;
        let mut result = Vec::with_capacity(bookings.len());

        for booking in bookings {
            let spot = self.db.spot_by_id(booking.spot_id).await?;
            result.push(BookingWithSpot { booking, spot });
        }

        Ok(result)
    }

    /// All bookings for a spot
    pub async fn bookings_for_spot(
        &self,
        spot_id: PrimaryKey,
    ) -> Result<Vec<BookingData>, DatabaseError> {
        // Ensure spot exists
        let _ = self.db.spot_by_id(spot_id).await?;

        self.db.bookings_by_spot(spot_id).await
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{MemoryDatabase, NewSpot, NewUser, UserData};

    async fn user(db: &Arc<MemoryDatabase>, name: &str) -> UserData {
        db.create_user(NewUser {
            email: format!("{name}@example.com"),
            username: name.to_string(),
            password: "hash".to_string(),
            first_name: name.to_string(),
            last_name: "Test".to_string(),
        })
        .await
        .expect("creates user")
    }

    async fn spot(db: &Arc<MemoryDatabase>, owner_id: PrimaryKey) -> SpotData {
        db.create_spot(NewSpot {
            owner_id,
            address: "123 Main St".to_string(),
            city: "Portland".to_string(),
            state: "OR".to_string(),
            country: "USA".to_string(),
            lat: 45.52,
            lng: -122.68,
            name: "Cozy cabin".to_string(),
            description: "A cabin".to_string(),
            price: 120.0,
        })
        .await
        .expect("creates spot")
    }

    fn range(start: &str, end: &str) -> DateRange {
        DateRange::new(
            start.parse().expect("valid date"),
            end.parse().expect("valid date"),
        )
        .expect("valid range")
    }

    async fn setup() -> (Arc<MemoryDatabase>, BookingManager<MemoryDatabase>, UserData, SpotData) {
        let db = Arc::new(MemoryDatabase::default());
        let manager = BookingManager::new(&db);
        let owner = user(&db, "owner").await;
        let spot = spot(&db, owner.id).await;
        let renter = user(&db, "renter").await;

        (db, manager, renter, spot)
    }

    #[tokio::test]
    async fn creates_a_booking_on_a_free_range() {
        let (_db, manager, renter, spot) = setup().await;

        let booking = manager
            .create_booking(renter.id, spot.id, range("2024-06-01", "2024-06-05"))
            .await
            .expect("books the spot");

        assert_eq!(booking.spot_id, spot.id);
        assert_eq!(booking.user_id, renter.id);
    }

    #[tokio::test]
    async fn booking_a_missing_spot_is_not_found() {
        let (_db, manager, renter, _spot) = setup().await;

        let result = manager
            .create_booking(renter.id, 999, range("2024-06-01", "2024-06-05"))
            .await;

        assert!(matches!(
            result,
            Err(BookingError::Db(DatabaseError::NotFound { .. }))
        ));
    }

    #[tokio::test]
    async fn overlapping_ranges_conflict() {
        let (_db, manager, renter, spot) = setup().await;

        manager
            .create_booking(renter.id, spot.id, range("2024-06-01", "2024-06-10"))
            .await
            .expect("books the spot");

        let result = manager
            .create_booking(renter.id, spot.id, range("2024-06-03", "2024-06-05"))
            .await;

        match result {
            Err(BookingError::Conflict { conflicts }) => {
                assert_eq!(conflicts.len(), 1);
                assert_eq!(conflicts[0].kind, ConflictKind::Both);
            }
            other => panic!("expected a conflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn adjacent_ranges_do_not_conflict() {
        let (_db, manager, renter, spot) = setup().await;

        manager
            .create_booking(renter.id, spot.id, range("2024-06-01", "2024-06-05"))
            .await
            .expect("books the first range");

        manager
            .create_booking(renter.id, spot.id, range("2024-06-05", "2024-06-10"))
            .await
            .expect("books the adjacent range");
    }

    #[tokio::test]
    async fn update_excludes_the_bookings_own_range() {
        let (_db, manager, renter, spot) = setup().await;

        let booking = manager
            .create_booking(renter.id, spot.id, range("2024-06-01", "2024-06-05"))
            .await
            .expect("books the spot");

        // Shift by one day, overlapping the old stored range
        let updated = manager
            .update_booking(renter.id, booking.id, range("2024-06-02", "2024-06-06"))
            .await
            .expect("moves the booking");

        assert_eq!(updated.start_date, range("2024-06-02", "2024-06-06").start());
    }

    #[tokio::test]
    async fn update_still_conflicts_with_other_bookings() {
        let (_db, manager, renter, spot) = setup().await;

        manager
            .create_booking(renter.id, spot.id, range("2024-06-10", "2024-06-15"))
            .await
            .expect("books the other range");

        let booking = manager
            .create_booking(renter.id, spot.id, range("2024-06-01", "2024-06-05"))
            .await
            .expect("books the spot");

        let result = manager
            .update_booking(renter.id, booking.id, range("2024-06-12", "2024-06-20"))
            .await;

        assert!(matches!(result, Err(BookingError::Conflict { .. })));
    }

    #[tokio::test]
    async fn only_the_renter_may_update_or_delete() {
        let (db, manager, renter, spot) = setup().await;
        let stranger = user(&db, "stranger").await;

        let booking = manager
            .create_booking(renter.id, spot.id, range("2024-06-10", "2024-06-15"))
            .await
            .expect("books the spot");

        let update = manager
            .update_booking(stranger.id, booking.id, range("2024-07-01", "2024-07-05"))
            .await;
        assert!(matches!(
            update,
            Err(BookingError::Guard(GuardError::NotOwner("booking")))
        ));

        let today = "2024-06-01".parse().expect("valid date");
        let delete = manager.delete_booking(stranger.id, booking.id, today).await;
        assert!(matches!(
            delete,
            Err(BookingError::Guard(GuardError::NotOwner("booking")))
        ));
    }

    #[tokio::test]
    async fn started_bookings_cannot_be_deleted() {
        let (_db, manager, renter, spot) = setup().await;

        let booking = manager
            .create_booking(renter.id, spot.id, range("2024-06-10", "2024-06-15"))
            .await
            .expect("books the spot");

        let today = "2024-06-12".parse().expect("valid date");
        let result = manager.delete_booking(renter.id, booking.id, today).await;

        assert!(matches!(
            result,
            Err(BookingError::Guard(GuardError::BookingStarted))
        ));

        let today = "2024-06-01".parse().expect("valid date");
        manager
            .delete_booking(renter.id, booking.id, today)
            .await
            .expect("deletes the future booking");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn concurrent_overlapping_creates_admit_exactly_one() {
        let (db, _manager, renter, spot) = setup().await;

        let mut handles = Vec::new();

        for _ in 0..2 {
            let db = db.clone();
            let spot_id = spot.id;
            let user_id = renter.id;

            handles.push(tokio::spawn(async move {
                let manager = BookingManager::new(&db);
                manager
                    .create_booking(user_id, spot_id, range("2024-06-01", "2024-06-05"))
                    .await
            }));
        }

        let mut successes = 0;
        let mut conflicts = 0;

        for handle in handles {
            match handle.await.expect("task finishes") {
                Ok(_) => successes += 1,
                Err(BookingError::Conflict { .. }) => conflicts += 1,
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(conflicts, 1);
    }

    #[tokio::test]
    async fn lists_bookings_with_their_spots() {
        let (_db, manager, renter, spot) = setup().await;

        manager
            .create_booking(renter.id, spot.id, range("2024-06-01", "2024-06-05"))
            .await
            .expect("books the spot");

        let listed = manager
            .bookings_for_user(renter.id)
            .await
            .expect("lists bookings");

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].spot.id, spot.id);

        let for_spot = manager
            .bookings_for_spot(spot.id)
            .await
            .expect("lists spot bookings");
        assert_eq!(for_spot.len(), 1);

        let missing = manager.bookings_for_spot(999).await;
        assert!(matches!(missing, Err(DatabaseError::NotFound { .. })));
    }
}
