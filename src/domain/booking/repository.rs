//! Booking repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::model::{Booking, BookingStatus};
use crate::domain::error::ConflictingBooking;
use crate::domain::DomainResult;

/// Explicit, enumerated filter options for booking listings.
#[derive(Debug, Clone, Default)]
pub struct BookingQuery {
    pub customer_id: Option<String>,
    pub status: Option<BookingStatus>,
}

/// Result of a conditional insert.
#[derive(Debug)]
pub enum InsertOutcome {
    /// The window was free and the booking is now committed.
    Inserted(Booking),
    /// One or more active bookings occupy the window; nothing was written.
    Conflict(Vec<ConflictingBooking>),
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Atomically insert the booking if no active booking of the same
    /// vehicle overlaps its window.
    ///
    /// Implementations must make the overlap re-check and the insert a
    /// single indivisible operation (store transaction or an equivalent
    /// serialization point), so that two concurrent requests for the same
    /// vehicle and overlapping windows can never both commit.
    async fn insert_if_vacant(&self, booking: Booking) -> DomainResult<InsertOutcome>;

    /// Find booking by ID
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Booking>>;

    /// Active bookings of a vehicle overlapping the half-open window
    /// `[start, end)`. The result is a point-in-time view, not a hold;
    /// only `insert_if_vacant` reserves.
    async fn find_overlapping_active(
        &self,
        vehicle_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<Booking>>;

    /// Bookings matching the query, newest first
    async fn find_filtered(&self, query: &BookingQuery) -> DomainResult<Vec<Booking>>;

    /// Atomically move an active booking into the terminal status `to`,
    /// returning the updated booking.
    ///
    /// Implementations must compare-and-set: the status check and the write
    /// happen as one indivisible step, so a booking that has already reached
    /// a terminal state is never overwritten. A lost race surfaces as
    /// `AlreadyCancelled` or `AlreadyCompleted`.
    async fn transition(&self, id: Uuid, to: BookingStatus) -> DomainResult<Booking>;

    /// Active bookings whose end time has passed (candidates for completion)
    async fn find_due_for_completion(&self, now: DateTime<Utc>) -> DomainResult<Vec<Booking>>;
}
