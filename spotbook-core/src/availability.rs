//! Date-range conflict detection for bookings.
//!
//! A booking occupies the half-open interval `[start_date, end_date)`, so a
//! booking that ends on the day another starts does not conflict with it.

use chrono::NaiveDate;
use thiserror::Error;

use crate::{BookingData, PrimaryKey};

/// A half-open calendar date interval `[start, end)`.
/// Constructing one enforces `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateRangeError {
    #[error("endDate cannot be on or before startDate")]
    EndNotAfterStart,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateRangeError> {
        if end <= start {
            return Err(DateRangeError::EndNotAfterStart);
        }

        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Two half-open intervals overlap iff each starts before the other ends
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// How a candidate range collides with one existing booking, used for
/// field-level error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    /// The candidate's start date falls inside the existing booking
    Start,
    /// The candidate's end date falls inside the existing booking
    End,
    /// Both dates are affected: the ranges contain one another or collide on
    /// both boundaries
    Both,
}

impl ConflictKind {
    pub fn affects_start(&self) -> bool {
        matches!(self, Self::Start | Self::Both)
    }

    pub fn affects_end(&self) -> bool {
        matches!(self, Self::End | Self::Both)
    }

    /// Classifies an overlap between a candidate range and an existing
    /// booking's range. Must only be called for ranges that do overlap.
    pub fn classify(candidate: &DateRange, existing: &BookingData) -> Self {
        let start_inside =
            existing.start_date <= candidate.start() && candidate.start() < existing.end_date;
        let end_inside =
            existing.start_date < candidate.end() && candidate.end() <= existing.end_date;

        match (start_inside, end_inside) {
            (true, true) => Self::Both,
            (true, false) => Self::Start,
            (false, true) => Self::End,
            // The candidate strictly contains the existing booking, which
            // makes both of its dates unusable
            (false, false) => Self::Both,
        }
    }
}

/// An existing booking a candidate range collides with
#[derive(Debug, Clone)]
pub struct Conflict {
    pub booking: BookingData,
    pub kind: ConflictKind,
}

/// Scans every existing booking for a spot against a candidate range,
/// returning the classified collisions. `exclude` skips the booking being
/// updated so it never conflicts with its own stored range.
pub fn find_conflicts(
    candidate: DateRange,
    existing: &[BookingData],
    exclude: Option<PrimaryKey>,
) -> Vec<Conflict> {
    existing
        .iter()
        .filter(|booking| Some(booking.id) != exclude)
        .filter(|booking| {
            booking.start_date < candidate.end() && candidate.start() < booking.end_date
        })
        .map(|booking| Conflict {
            kind: ConflictKind::classify(&candidate, booking),
            booking: booking.clone(),
        })
        .collect()
}
