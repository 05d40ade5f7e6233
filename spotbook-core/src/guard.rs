//! The single place ownership is decided. Handlers never compare user ids
//! inline; they hand the acting user and the resource to the guard.

use chrono::NaiveDate;
use thiserror::Error;

use crate::{BookingData, PrimaryKey, ReviewData, SpotData};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GuardError {
    /// The acting user does not own the resource
    #[error("{0} does not belong to the acting user")]
    NotOwner(&'static str),
    /// The booking's start date has passed, so the renter may no longer
    /// delete it
    #[error("bookings that have started cannot be deleted")]
    BookingStarted,
}

/// A resource with a single owning user
pub trait Owned {
    const RESOURCE: &'static str;

    fn owned_by(&self) -> PrimaryKey;
}

impl Owned for SpotData {
    const RESOURCE: &'static str = "spot";

    fn owned_by(&self) -> PrimaryKey {
        self.owner_id
    }
}

impl Owned for ReviewData {
    const RESOURCE: &'static str = "review";

    fn owned_by(&self) -> PrimaryKey {
        self.user_id
    }
}

impl Owned for BookingData {
    const RESOURCE: &'static str = "booking";

    fn owned_by(&self) -> PrimaryKey {
        self.user_id
    }
}

/// Allows the action iff the acting user owns the resource
pub fn ensure_owner<R>(user_id: PrimaryKey, resource: &R) -> Result<(), GuardError>
where
    R: Owned,
{
    if resource.owned_by() == user_id {
        Ok(())
    } else {
        Err(GuardError::NotOwner(R::RESOURCE))
    }
}

/// A booking counts as started from its start date onward, and from then on
/// it can no longer be deleted. Whether the booking has also ended makes no
/// difference here.
pub fn ensure_booking_deletable(
    booking: &BookingData,
    today: NaiveDate,
) -> Result<(), GuardError> {
    if booking.start_date <= today {
        return Err(GuardError::BookingStarted);
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    fn booking(user_id: PrimaryKey, start: &str, end: &str) -> BookingData {
        BookingData {
            id: 1,
            spot_id: 1,
            user_id,
            start_date: start.parse().expect("valid date"),
            end_date: end.parse().expect("valid date"),
        }
    }

    #[test]
    fn owner_is_allowed() {
        let booking = booking(7, "2024-06-01", "2024-06-05");

        assert_eq!(ensure_owner(7, &booking), Ok(()));
        assert_eq!(ensure_owner(8, &booking), Err(GuardError::NotOwner("booking")));
    }

    #[test]
    fn future_bookings_can_be_deleted() {
        let booking = booking(1, "2024-06-10", "2024-06-12");
        let today = "2024-06-01".parse().expect("valid date");

        assert_eq!(ensure_booking_deletable(&booking, today), Ok(()));
    }

    #[test]
    fn started_and_past_bookings_cannot_be_deleted() {
        let booking = booking(1, "2024-06-10", "2024-06-12");

        for today in ["2024-06-10", "2024-06-11", "2024-07-01"] {
            let today = today.parse().expect("valid date");
            assert_eq!(
                ensure_booking_deletable(&booking, today),
                Err(GuardError::BookingStarted)
            );
        }
    }
}
