//! Ride duration estimation
//!
//! Placeholder for a real distance service. The only properties the booking
//! engine relies on: deterministic, symmetric in argument order, and always
//! at least one hour.

use crate::domain::error::{DomainError, DomainResult};

/// Estimate the ride duration in whole hours between two pincodes.
///
/// Both pincodes must parse as integers, otherwise
/// [`DomainError::InvalidPincode`] is returned. The estimate is
/// `max(1, |to - from| mod 24)`.
pub fn estimate_ride_duration(from_pincode: &str, to_pincode: &str) -> DomainResult<i64> {
    let from: i64 = from_pincode
        .trim()
        .parse()
        .map_err(|_| DomainError::InvalidPincode(from_pincode.to_string()))?;
    let to: i64 = to_pincode
        .trim()
        .parse()
        .map_err(|_| DomainError::InvalidPincode(to_pincode.to_string()))?;

    Ok(((to - from).abs() % 24).max(1))
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_pincode_is_one_hour() {
        assert_eq!(estimate_ride_duration("110001", "110001").unwrap(), 1);
    }

    #[test]
    fn known_estimates() {
        assert_eq!(estimate_ride_duration("110001", "110002").unwrap(), 1);
        assert_eq!(estimate_ride_duration("110001", "110010").unwrap(), 9);
        assert_eq!(estimate_ride_duration("100001", "999999").unwrap(), 22);
    }

    #[test]
    fn symmetric_in_argument_order() {
        let a = estimate_ride_duration("110001", "560034").unwrap();
        let b = estimate_ride_duration("560034", "110001").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn always_at_least_one_hour() {
        // Difference of exactly 24 wraps to 0 and gets floored to 1.
        assert_eq!(estimate_ride_duration("110000", "110024").unwrap(), 1);
        assert_eq!(estimate_ride_duration("110000", "110048").unwrap(), 1);
    }

    #[test]
    fn non_numeric_pincode_is_rejected() {
        let err = estimate_ride_duration("11000a", "110001").unwrap_err();
        assert!(matches!(err, DomainError::InvalidPincode(_)));

        let err = estimate_ride_duration("110001", "").unwrap_err();
        assert!(matches!(err, DomainError::InvalidPincode(_)));
    }
}
