//! Vehicle domain entity

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A fleet vehicle available for booking.
///
/// Vehicles are never hard-deleted; `is_active` acts as a soft-delete flag
/// so existing bookings keep a resolvable reference.
#[derive(Debug, Clone)]
pub struct Vehicle {
    /// Unique vehicle ID
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Load capacity in kilograms
    pub capacity_kg: i32,
    /// Number of tyres
    pub tyres: i32,
    /// Whether the vehicle can accept new bookings
    pub is_active: bool,
    /// When the vehicle was registered
    pub created_at: DateTime<Utc>,
}

impl Vehicle {
    pub fn new(name: impl Into<String>, capacity_kg: i32, tyres: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            capacity_kg,
            tyres,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    /// Soft-delete: the vehicle stops accepting new bookings.
    pub fn deactivate(&mut self) {
        self.is_active = false;
    }

    /// Whether this vehicle satisfies a capacity requirement.
    pub fn can_carry(&self, capacity_required: i32) -> bool {
        self.capacity_kg >= capacity_required
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_vehicle_is_active() {
        let v = Vehicle::new("Tata Ace", 750, 4);
        assert!(v.is_active);
        assert_eq!(v.capacity_kg, 750);
        assert_eq!(v.tyres, 4);
    }

    #[test]
    fn deactivate_clears_active_flag() {
        let mut v = Vehicle::new("Tata Ace", 750, 4);
        v.deactivate();
        assert!(!v.is_active);
    }

    #[test]
    fn can_carry_compares_capacity() {
        let v = Vehicle::new("Eicher Pro", 1000, 6);
        assert!(v.can_carry(800));
        assert!(v.can_carry(1000));
        assert!(!v.can_carry(1001));
    }
}
