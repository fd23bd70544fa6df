//! Booking domain entity

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::domain::error::{ConflictingBooking, DomainError, DomainResult};

/// Booking status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStatus {
    /// Booking holds its time window on the vehicle
    Active,
    /// Ride finished (end time passed); terminal
    Completed,
    /// Cancelled by the customer; terminal
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parse a status string. Returns `None` for unknown values so callers
    /// can reject bad filter input instead of silently matching nothing.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A committed claim on a vehicle for a half-open time window
/// `[start_time, end_time)`.
#[derive(Debug, Clone)]
pub struct Booking {
    /// Unique booking ID
    pub id: Uuid,
    /// Booked vehicle. Weak reference: the booking stays valid even if the
    /// vehicle is deactivated later.
    pub vehicle_id: Uuid,
    /// Origin pincode (6-digit numeric string)
    pub from_pincode: String,
    /// Destination pincode (6-digit numeric string)
    pub to_pincode: String,
    /// Window start
    pub start_time: DateTime<Utc>,
    /// Window end (start + estimated duration, fixed at creation)
    pub end_time: DateTime<Utc>,
    /// Opaque customer identifier
    pub customer_id: String,
    /// Current status
    pub status: BookingStatus,
    /// Estimated ride duration in hours, stored redundantly with the window
    /// for auditability
    pub estimated_ride_duration_hours: i64,
    /// When the booking was created
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// Create an active booking whose end time is derived from the
    /// estimated duration.
    pub fn new(
        vehicle_id: Uuid,
        from_pincode: impl Into<String>,
        to_pincode: impl Into<String>,
        start_time: DateTime<Utc>,
        customer_id: impl Into<String>,
        estimated_ride_duration_hours: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            vehicle_id,
            from_pincode: from_pincode.into(),
            to_pincode: to_pincode.into(),
            start_time,
            end_time: start_time + Duration::hours(estimated_ride_duration_hours),
            customer_id: customer_id.into(),
            status: BookingStatus::Active,
            estimated_ride_duration_hours,
            created_at: Utc::now(),
        }
    }

    /// Cancel this booking.
    ///
    /// Only active bookings can be cancelled; re-cancelling is an error,
    /// not a no-op.
    pub fn cancel(&mut self) -> DomainResult<()> {
        match self.status {
            BookingStatus::Active => {
                self.status = BookingStatus::Cancelled;
                Ok(())
            }
            BookingStatus::Cancelled => Err(DomainError::AlreadyCancelled(self.id)),
            BookingStatus::Completed => Err(DomainError::AlreadyCompleted(self.id)),
        }
    }

    /// Mark the ride as completed. Driven by the background completion task
    /// once the end time has passed, never by the engine itself.
    pub fn complete(&mut self) -> DomainResult<()> {
        match self.status {
            BookingStatus::Active => {
                self.status = BookingStatus::Completed;
                Ok(())
            }
            BookingStatus::Cancelled => Err(DomainError::AlreadyCancelled(self.id)),
            BookingStatus::Completed => Err(DomainError::AlreadyCompleted(self.id)),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == BookingStatus::Active
    }

    /// The colliding-booking view carried in conflict errors.
    pub fn as_conflict(&self) -> ConflictingBooking {
        ConflictingBooking {
            id: self.id,
            start_time: self.start_time,
            end_time: self.end_time,
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_booking() -> Booking {
        Booking::new(
            Uuid::new_v4(),
            "110001",
            "560034",
            Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap(),
            "CUST-001",
            3,
        )
    }

    #[test]
    fn new_booking_is_active_with_derived_end_time() {
        let b = sample_booking();
        assert!(b.is_active());
        assert_eq!(b.end_time - b.start_time, Duration::hours(3));
        assert_eq!(b.estimated_ride_duration_hours, 3);
    }

    #[test]
    fn cancel_active_sets_cancelled() {
        let mut b = sample_booking();
        b.cancel().unwrap();
        assert_eq!(b.status, BookingStatus::Cancelled);
        assert!(!b.is_active());
    }

    #[test]
    fn cancel_twice_is_an_error() {
        let mut b = sample_booking();
        b.cancel().unwrap();
        let err = b.cancel().unwrap_err();
        assert!(matches!(err, DomainError::AlreadyCancelled(id) if id == b.id));
        // Terminal state is untouched.
        assert_eq!(b.status, BookingStatus::Cancelled);
    }

    #[test]
    fn cancel_completed_is_an_error() {
        let mut b = sample_booking();
        b.complete().unwrap();
        let err = b.cancel().unwrap_err();
        assert!(matches!(err, DomainError::AlreadyCompleted(id) if id == b.id));
        assert_eq!(b.status, BookingStatus::Completed);
    }

    #[test]
    fn complete_active_sets_completed() {
        let mut b = sample_booking();
        b.complete().unwrap();
        assert_eq!(b.status, BookingStatus::Completed);
    }

    #[test]
    fn complete_cancelled_is_an_error() {
        let mut b = sample_booking();
        b.cancel().unwrap();
        assert!(b.complete().is_err());
    }

    #[test]
    fn status_string_roundtrip() {
        for status in [
            BookingStatus::Active,
            BookingStatus::Completed,
            BookingStatus::Cancelled,
        ] {
            assert_eq!(BookingStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(BookingStatus::parse("pending"), None);
    }
}
