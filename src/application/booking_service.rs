//! Booking service
//!
//! Orchestrates vehicle eligibility checks, ride-duration estimation,
//! conflict detection and the atomic commit of new bookings.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use futures_util::future::try_join_all;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::scheduling::estimate_ride_duration;
use crate::domain::{
    Booking, BookingQuery, BookingStatus, DomainError, DomainResult, InsertOutcome,
    RepositoryProvider, Vehicle,
};

/// Parameters for a booking creation request.
#[derive(Debug, Clone)]
pub struct CreateBookingCommand {
    pub vehicle_id: Uuid,
    pub from_pincode: String,
    pub to_pincode: String,
    pub start_time: DateTime<Utc>,
    pub customer_id: String,
}

/// Parameters for an availability search.
#[derive(Debug, Clone)]
pub struct AvailabilitySearch {
    pub capacity_required: i32,
    pub from_pincode: String,
    pub to_pincode: String,
    pub start_time: DateTime<Utc>,
}

/// Result of an availability search: the free vehicles plus the window the
/// search was evaluated against. The result is advisory; a later
/// create_booking still re-checks for conflicts.
#[derive(Debug)]
pub struct Availability {
    pub vehicles: Vec<Vehicle>,
    pub estimated_ride_duration_hours: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

pub struct BookingService {
    repos: Arc<dyn RepositoryProvider>,
}

impl BookingService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Create a booking for a vehicle, failing with a structured conflict
    /// error if any active booking of that vehicle overlaps the window.
    ///
    /// Conflict detection runs twice: an advisory pre-check that surfaces
    /// the colliding set without writing anything, then the store-level
    /// conditional insert, which re-checks inside a transaction and commits
    /// only if the window is still free. The conditional insert is the
    /// single internal retry after a lost race; if it still sees a
    /// conflict, the conflict is surfaced, never a double booking.
    pub async fn create_booking(&self, cmd: CreateBookingCommand) -> DomainResult<Booking> {
        let vehicle = self
            .repos
            .vehicles()
            .find_by_id(cmd.vehicle_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "Vehicle",
                field: "id",
                value: cmd.vehicle_id.to_string(),
            })?;

        if !vehicle.is_active {
            return Err(DomainError::VehicleInactive(vehicle.id));
        }

        let duration_hours = estimate_ride_duration(&cmd.from_pincode, &cmd.to_pincode)?;
        let end_time = cmd.start_time + Duration::hours(duration_hours);

        // Advisory pre-check: report conflicts before attempting the write.
        let overlapping = self
            .repos
            .bookings()
            .find_overlapping_active(vehicle.id, cmd.start_time, end_time)
            .await?;
        if !overlapping.is_empty() {
            return Err(DomainError::BookingConflict {
                vehicle_id: vehicle.id,
                conflicts: overlapping.iter().map(Booking::as_conflict).collect(),
            });
        }

        let booking = Booking::new(
            vehicle.id,
            cmd.from_pincode,
            cmd.to_pincode,
            cmd.start_time,
            cmd.customer_id,
            duration_hours,
        );

        match self.repos.bookings().insert_if_vacant(booking).await? {
            InsertOutcome::Inserted(booking) => {
                info!(
                    booking_id = %booking.id,
                    vehicle_id = %booking.vehicle_id,
                    "Booking created"
                );
                Ok(booking)
            }
            InsertOutcome::Conflict(conflicts) => {
                // Lost the race between pre-check and insert; the insert's
                // own re-check already retried against fresh state.
                warn!(
                    vehicle_id = %vehicle.id,
                    conflicts = conflicts.len(),
                    "Concurrent booking won the window"
                );
                Err(DomainError::BookingConflict {
                    vehicle_id: vehicle.id,
                    conflicts,
                })
            }
        }
    }

    /// Find all active vehicles with sufficient capacity that are free for
    /// the window implied by the route and start time.
    pub async fn search_available(&self, search: AvailabilitySearch) -> DomainResult<Availability> {
        if search.capacity_required <= 0 {
            return Err(DomainError::Validation(
                "capacity_required must be a positive number".to_string(),
            ));
        }

        let duration_hours =
            estimate_ride_duration(&search.from_pincode, &search.to_pincode)?;
        let end_time = search.start_time + Duration::hours(duration_hours);

        let candidates = self
            .repos
            .vehicles()
            .find_available_candidates(search.capacity_required)
            .await?;

        // Independent per-vehicle overlap checks; fan out concurrently.
        let checks = candidates.iter().map(|v| {
            self.repos
                .bookings()
                .find_overlapping_active(v.id, search.start_time, end_time)
        });
        let overlaps = try_join_all(checks).await?;

        let vehicles = candidates
            .into_iter()
            .zip(overlaps)
            .filter(|(_, overlapping)| overlapping.is_empty())
            .map(|(v, _)| v)
            .collect();

        Ok(Availability {
            vehicles,
            estimated_ride_duration_hours: duration_hours,
            start_time: search.start_time,
            end_time,
        })
    }

    /// Cancel an active booking. Cancellation is deliberately not
    /// idempotent: re-cancelling reports `AlreadyCancelled`.
    ///
    /// The transition is a store-level compare-and-set, so a booking the
    /// completion task has already finished reports `AlreadyCompleted`
    /// instead of being overwritten.
    pub async fn cancel_booking(&self, id: Uuid) -> DomainResult<Booking> {
        let booking = self
            .repos
            .bookings()
            .transition(id, BookingStatus::Cancelled)
            .await?;

        info!(booking_id = %id, "Booking cancelled");
        Ok(booking)
    }

    pub async fn get_booking(&self, id: Uuid) -> DomainResult<Booking> {
        self.repos
            .bookings()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "Booking",
                field: "id",
                value: id.to_string(),
            })
    }

    /// Bookings matching the filter, newest first.
    pub async fn list_bookings(&self, query: BookingQuery) -> DomainResult<Vec<Booking>> {
        self.repos.bookings().find_filtered(&query).await
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::InMemoryRepositoryProvider;
    use chrono::TimeZone;

    fn service() -> (BookingService, Arc<InMemoryRepositoryProvider>) {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        (BookingService::new(repos.clone()), repos)
    }

    async fn register_vehicle(
        repos: &InMemoryRepositoryProvider,
        name: &str,
        capacity_kg: i32,
    ) -> Vehicle {
        let v = Vehicle::new(name, capacity_kg, 4);
        repos.vehicles().save(v.clone()).await.unwrap();
        v
    }

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, h, m, 0).unwrap()
    }

    /// One-hour window: pincodes one apart estimate to 1 hour.
    fn one_hour_booking(vehicle_id: Uuid, start: DateTime<Utc>) -> CreateBookingCommand {
        CreateBookingCommand {
            vehicle_id,
            from_pincode: "110001".to_string(),
            to_pincode: "110002".to_string(),
            start_time: start,
            customer_id: "CUST-001".to_string(),
        }
    }

    #[tokio::test]
    async fn create_booking_commits_active_booking() {
        let (svc, repos) = service();
        let v = register_vehicle(&repos, "Tata Ace", 750).await;

        let booking = svc.create_booking(one_hour_booking(v.id, at(10, 0))).await.unwrap();
        assert_eq!(booking.status, BookingStatus::Active);
        assert_eq!(booking.estimated_ride_duration_hours, 1);
        assert_eq!(booking.end_time, at(11, 0));
    }

    #[tokio::test]
    async fn unknown_vehicle_is_not_found() {
        let (svc, _repos) = service();
        let err = svc
            .create_booking(one_hour_booking(Uuid::new_v4(), at(10, 0)))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "Vehicle", .. }));
    }

    #[tokio::test]
    async fn inactive_vehicle_is_rejected() {
        let (svc, repos) = service();
        let v = register_vehicle(&repos, "Tata Ace", 750).await;
        repos.vehicles().set_active(v.id, false).await.unwrap();

        let err = svc
            .create_booking(one_hour_booking(v.id, at(10, 0)))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::VehicleInactive(id) if id == v.id));
    }

    #[tokio::test]
    async fn bad_pincode_is_rejected() {
        let (svc, repos) = service();
        let v = register_vehicle(&repos, "Tata Ace", 750).await;

        let mut cmd = one_hour_booking(v.id, at(10, 0));
        cmd.to_pincode = "11000x".to_string();
        let err = svc.create_booking(cmd).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidPincode(_)));
    }

    #[tokio::test]
    async fn overlapping_booking_conflicts_and_adjacent_succeeds() {
        let (svc, repos) = service();
        let v = register_vehicle(&repos, "Tata Ace", 750).await;

        // [10:00, 11:00)
        let first = svc.create_booking(one_hour_booking(v.id, at(10, 0))).await.unwrap();

        // [10:30, 11:30) overlaps and must list the first booking.
        let err = svc
            .create_booking(one_hour_booking(v.id, at(10, 30)))
            .await
            .unwrap_err();
        match err {
            DomainError::BookingConflict { vehicle_id, conflicts } => {
                assert_eq!(vehicle_id, v.id);
                assert_eq!(conflicts.len(), 1);
                assert_eq!(conflicts[0].id, first.id);
                assert_eq!(conflicts[0].start_time, at(10, 0));
                assert_eq!(conflicts[0].end_time, at(11, 0));
            }
            other => panic!("expected BookingConflict, got {other:?}"),
        }

        // [11:00, 12:00) is adjacent, not overlapping.
        let third = svc.create_booking(one_hour_booking(v.id, at(11, 0))).await.unwrap();
        assert_eq!(third.start_time, at(11, 0));
    }

    #[tokio::test]
    async fn cancelled_booking_frees_the_window() {
        let (svc, repos) = service();
        let v = register_vehicle(&repos, "Tata Ace", 750).await;

        let first = svc.create_booking(one_hour_booking(v.id, at(10, 0))).await.unwrap();
        svc.cancel_booking(first.id).await.unwrap();

        // Same window is free again.
        svc.create_booking(one_hour_booking(v.id, at(10, 0))).await.unwrap();
    }

    #[tokio::test]
    async fn search_filters_by_capacity_and_overlap() {
        let (svc, repos) = service();
        register_vehicle(&repos, "Small", 500).await;
        let mid = register_vehicle(&repos, "Mid", 1000).await;
        let big = register_vehicle(&repos, "Big", 2000).await;

        let search = AvailabilitySearch {
            capacity_required: 800,
            from_pincode: "110001".to_string(),
            to_pincode: "110002".to_string(),
            start_time: at(10, 0),
        };

        let result = svc.search_available(search.clone()).await.unwrap();
        let ids: Vec<Uuid> = result.vehicles.iter().map(|v| v.id).collect();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&mid.id) && ids.contains(&big.id));
        assert_eq!(result.estimated_ride_duration_hours, 1);
        assert_eq!(result.end_time, at(11, 0));

        // Book the mid vehicle for the same window; repeat search only
        // returns the big one.
        svc.create_booking(one_hour_booking(mid.id, at(10, 0))).await.unwrap();
        let result = svc.search_available(search).await.unwrap();
        let ids: Vec<Uuid> = result.vehicles.iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![big.id]);
    }

    #[tokio::test]
    async fn search_rejects_non_positive_capacity() {
        let (svc, _repos) = service();
        let err = svc
            .search_available(AvailabilitySearch {
                capacity_required: 0,
                from_pincode: "110001".to_string(),
                to_pincode: "110002".to_string(),
                start_time: at(10, 0),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn cancel_is_not_idempotent() {
        let (svc, repos) = service();
        let v = register_vehicle(&repos, "Tata Ace", 750).await;
        let booking = svc.create_booking(one_hour_booking(v.id, at(10, 0))).await.unwrap();

        let cancelled = svc.cancel_booking(booking.id).await.unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);

        let err = svc.cancel_booking(booking.id).await.unwrap_err();
        assert!(matches!(err, DomainError::AlreadyCancelled(id) if id == booking.id));
    }

    /// A cancel that arrives after the completion task has finished the
    /// ride must report the terminal state, not overwrite it.
    #[tokio::test]
    async fn cancel_after_completion_reports_already_completed() {
        let (svc, repos) = service();
        let v = register_vehicle(&repos, "Tata Ace", 750).await;
        let booking = svc.create_booking(one_hour_booking(v.id, at(10, 0))).await.unwrap();

        // The completion task commits its transition first.
        repos
            .bookings()
            .transition(booking.id, BookingStatus::Completed)
            .await
            .unwrap();

        let err = svc.cancel_booking(booking.id).await.unwrap_err();
        assert!(matches!(err, DomainError::AlreadyCompleted(id) if id == booking.id));

        // The terminal status stands.
        let stored = repos.bookings().find_by_id(booking.id).await.unwrap().unwrap();
        assert_eq!(stored.status, BookingStatus::Completed);
    }

    #[tokio::test]
    async fn cancel_unknown_booking_is_not_found() {
        let (svc, _repos) = service();
        let err = svc.cancel_booking(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "Booking", .. }));
    }

    #[tokio::test]
    async fn list_bookings_filters_by_customer_and_status() {
        let (svc, repos) = service();
        let v = register_vehicle(&repos, "Tata Ace", 750).await;

        let mut cmd = one_hour_booking(v.id, at(10, 0));
        cmd.customer_id = "CUST-A".to_string();
        let a = svc.create_booking(cmd).await.unwrap();

        let mut cmd = one_hour_booking(v.id, at(12, 0));
        cmd.customer_id = "CUST-B".to_string();
        let b = svc.create_booking(cmd).await.unwrap();
        svc.cancel_booking(b.id).await.unwrap();

        let active = svc
            .list_bookings(BookingQuery {
                customer_id: None,
                status: Some(BookingStatus::Active),
            })
            .await
            .unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, a.id);

        let for_b = svc
            .list_bookings(BookingQuery {
                customer_id: Some("CUST-B".to_string()),
                status: None,
            })
            .await
            .unwrap();
        assert_eq!(for_b.len(), 1);
        assert_eq!(for_b[0].id, b.id);
    }

    /// N parallel attempts on the same vehicle and overlapping window must
    /// produce exactly one committed booking, the rest conflicts.
    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn concurrent_creates_commit_exactly_one() {
        let (svc, repos) = service();
        let svc = Arc::new(svc);
        let v = register_vehicle(&repos, "Tata Ace", 750).await;

        let attempts = 8;
        let mut handles = Vec::with_capacity(attempts);
        for i in 0..attempts {
            let svc = svc.clone();
            let mut cmd = one_hour_booking(v.id, at(10, 0));
            cmd.customer_id = format!("CUST-{i}");
            handles.push(tokio::spawn(async move { svc.create_booking(cmd).await }));
        }

        let mut successes = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(DomainError::BookingConflict { .. }) => conflicts += 1,
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }
        assert_eq!(successes, 1);
        assert_eq!(conflicts, attempts - 1);

        // Committed state holds the invariant.
        let active = repos
            .bookings()
            .find_overlapping_active(v.id, at(10, 0), at(11, 0))
            .await
            .unwrap();
        assert_eq!(active.len(), 1);
    }
}
