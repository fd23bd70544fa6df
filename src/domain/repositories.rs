//! Repository provider
//!
//! Bundles the per-aggregate repositories behind one injection point.
//! Constructed once at process start; the engine never reaches for a
//! process-wide singleton.

use crate::domain::booking::BookingRepository;
use crate::domain::vehicle::VehicleRepository;

pub trait RepositoryProvider: Send + Sync {
    fn vehicles(&self) -> &dyn VehicleRepository;
    fn bookings(&self) -> &dyn BookingRepository;
}
