//! In-memory repository implementations
//!
//! Backing store for development and tests. The conditional booking insert
//! is serialized through a mutex held across the check-then-insert section,
//! which keeps the no-overlap invariant without a database.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use crate::domain::scheduling::intervals_overlap;
use crate::domain::{
    Booking, BookingQuery, BookingRepository, BookingStatus, DomainError, DomainResult,
    InsertOutcome, RepositoryProvider, Vehicle, VehicleRepository,
};

pub struct InMemoryVehicleRepository {
    vehicles: DashMap<Uuid, Vehicle>,
}

#[async_trait]
impl VehicleRepository for InMemoryVehicleRepository {
    async fn save(&self, vehicle: Vehicle) -> DomainResult<()> {
        self.vehicles.insert(vehicle.id, vehicle);
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Vehicle>> {
        Ok(self.vehicles.get(&id).map(|v| v.clone()))
    }

    async fn find_active(&self) -> DomainResult<Vec<Vehicle>> {
        let mut vehicles: Vec<Vehicle> = self
            .vehicles
            .iter()
            .filter(|e| e.value().is_active)
            .map(|e| e.value().clone())
            .collect();
        vehicles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(vehicles)
    }

    async fn find_available_candidates(&self, min_capacity_kg: i32) -> DomainResult<Vec<Vehicle>> {
        let mut vehicles: Vec<Vehicle> = self
            .vehicles
            .iter()
            .filter(|e| e.value().is_active && e.value().can_carry(min_capacity_kg))
            .map(|e| e.value().clone())
            .collect();
        vehicles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(vehicles)
    }

    async fn set_active(&self, id: Uuid, active: bool) -> DomainResult<()> {
        let mut vehicle = self.vehicles.get_mut(&id).ok_or(DomainError::NotFound {
            entity: "Vehicle",
            field: "id",
            value: id.to_string(),
        })?;
        vehicle.is_active = active;
        Ok(())
    }
}

pub struct InMemoryBookingRepository {
    bookings: DashMap<Uuid, Booking>,
    // Serializes check-then-insert; held only across synchronous code.
    insert_guard: Mutex<()>,
}

impl InMemoryBookingRepository {
    fn overlapping_active(
        &self,
        vehicle_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<Booking> {
        let mut bookings: Vec<Booking> = self
            .bookings
            .iter()
            .filter(|e| {
                let b = e.value();
                b.vehicle_id == vehicle_id
                    && b.is_active()
                    && intervals_overlap(b.start_time, b.end_time, start, end)
            })
            .map(|e| e.value().clone())
            .collect();
        bookings.sort_by_key(|b| b.start_time);
        bookings
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn insert_if_vacant(&self, booking: Booking) -> DomainResult<InsertOutcome> {
        let _guard = self
            .insert_guard
            .lock()
            .map_err(|_| DomainError::Storage("insert guard poisoned".to_string()))?;

        let overlapping =
            self.overlapping_active(booking.vehicle_id, booking.start_time, booking.end_time);
        if !overlapping.is_empty() {
            return Ok(InsertOutcome::Conflict(
                overlapping.iter().map(Booking::as_conflict).collect(),
            ));
        }

        self.bookings.insert(booking.id, booking.clone());
        Ok(InsertOutcome::Inserted(booking))
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Booking>> {
        Ok(self.bookings.get(&id).map(|b| b.clone()))
    }

    async fn find_overlapping_active(
        &self,
        vehicle_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<Booking>> {
        Ok(self.overlapping_active(vehicle_id, start, end))
    }

    async fn find_filtered(&self, query: &BookingQuery) -> DomainResult<Vec<Booking>> {
        let mut bookings: Vec<Booking> = self
            .bookings
            .iter()
            .filter(|e| {
                let b = e.value();
                if let Some(ref customer_id) = query.customer_id {
                    if &b.customer_id != customer_id {
                        return false;
                    }
                }
                if let Some(status) = query.status {
                    if b.status != status {
                        return false;
                    }
                }
                true
            })
            .map(|e| e.value().clone())
            .collect();
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bookings)
    }

    async fn transition(&self, id: Uuid, to: BookingStatus) -> DomainResult<Booking> {
        // The entry reference locks its shard, so check-and-set is atomic
        // with respect to concurrent transitions of the same booking.
        let mut entry = self.bookings.get_mut(&id).ok_or(DomainError::NotFound {
            entity: "Booking",
            field: "id",
            value: id.to_string(),
        })?;

        match to {
            BookingStatus::Cancelled => entry.cancel()?,
            BookingStatus::Completed => entry.complete()?,
            BookingStatus::Active => {
                return Err(DomainError::Validation(
                    "active is not a transition target".to_string(),
                ))
            }
        }
        Ok(entry.value().clone())
    }

    async fn find_due_for_completion(&self, now: DateTime<Utc>) -> DomainResult<Vec<Booking>> {
        Ok(self
            .bookings
            .iter()
            .filter(|e| e.value().is_active() && e.value().end_time <= now)
            .map(|e| e.value().clone())
            .collect())
    }
}

/// Repository provider backed entirely by process memory.
pub struct InMemoryRepositoryProvider {
    vehicles: InMemoryVehicleRepository,
    bookings: InMemoryBookingRepository,
}

impl InMemoryRepositoryProvider {
    pub fn new() -> Self {
        Self {
            vehicles: InMemoryVehicleRepository {
                vehicles: DashMap::new(),
            },
            bookings: InMemoryBookingRepository {
                bookings: DashMap::new(),
                insert_guard: Mutex::new(()),
            },
        }
    }
}

impl Default for InMemoryRepositoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryProvider for InMemoryRepositoryProvider {
    fn vehicles(&self) -> &dyn VehicleRepository {
        &self.vehicles
    }

    fn bookings(&self) -> &dyn BookingRepository {
        &self.bookings
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, h, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn conditional_insert_rejects_overlap_and_allows_adjacent() {
        let repos = InMemoryRepositoryProvider::new();
        let vehicle_id = Uuid::new_v4();

        let first = Booking::new(vehicle_id, "110001", "110003", at(10), "C1", 2);
        assert!(matches!(
            repos.bookings().insert_if_vacant(first.clone()).await.unwrap(),
            InsertOutcome::Inserted(_)
        ));

        // Overlapping window loses.
        let overlapping = Booking::new(vehicle_id, "110001", "110002", at(11), "C2", 1);
        match repos.bookings().insert_if_vacant(overlapping).await.unwrap() {
            InsertOutcome::Conflict(conflicts) => {
                assert_eq!(conflicts.len(), 1);
                assert_eq!(conflicts[0].id, first.id);
            }
            InsertOutcome::Inserted(_) => panic!("overlap must not insert"),
        }

        // Adjacent window fits.
        let adjacent = Booking::new(vehicle_id, "110001", "110002", at(12), "C3", 1);
        assert!(matches!(
            repos.bookings().insert_if_vacant(adjacent).await.unwrap(),
            InsertOutcome::Inserted(_)
        ));
    }

    #[tokio::test]
    async fn other_vehicles_do_not_conflict() {
        let repos = InMemoryRepositoryProvider::new();
        let a = Booking::new(Uuid::new_v4(), "110001", "110002", at(10), "C1", 1);
        let b = Booking::new(Uuid::new_v4(), "110001", "110002", at(10), "C2", 1);
        assert!(matches!(
            repos.bookings().insert_if_vacant(a).await.unwrap(),
            InsertOutcome::Inserted(_)
        ));
        assert!(matches!(
            repos.bookings().insert_if_vacant(b).await.unwrap(),
            InsertOutcome::Inserted(_)
        ));
    }

    #[tokio::test]
    async fn transition_unknown_booking_fails() {
        let repos = InMemoryRepositoryProvider::new();
        let err = repos
            .bookings()
            .transition(Uuid::new_v4(), BookingStatus::Cancelled)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "Booking", .. }));
    }

    #[tokio::test]
    async fn transition_is_first_writer_wins() {
        let repos = InMemoryRepositoryProvider::new();
        let booking = Booking::new(Uuid::new_v4(), "110001", "110002", at(10), "C1", 1);
        let id = booking.id;
        repos.bookings().insert_if_vacant(booking).await.unwrap();

        let completed = repos
            .bookings()
            .transition(id, BookingStatus::Completed)
            .await
            .unwrap();
        assert_eq!(completed.status, BookingStatus::Completed);

        // A later cancel must not overwrite the terminal state.
        let err = repos
            .bookings()
            .transition(id, BookingStatus::Cancelled)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::AlreadyCompleted(b) if b == id));

        let stored = repos.bookings().find_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.status, BookingStatus::Completed);
    }
}
