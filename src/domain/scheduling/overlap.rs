//! Interval overlap predicate
//!
//! The single correctness primitive for conflict detection. Intervals are
//! half-open `[start, end)`, so back-to-back bookings never collide.

use chrono::{DateTime, Utc};

/// Check whether two half-open intervals `[start_a, end_a)` and
/// `[start_b, end_b)` overlap.
pub fn intervals_overlap(
    start_a: DateTime<Utc>,
    end_a: DateTime<Utc>,
    start_b: DateTime<Utc>,
    end_b: DateTime<Utc>,
) -> bool {
    start_a < end_b && start_b < end_a
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn hour(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, h, 0, 0).unwrap()
    }

    #[test]
    fn partial_overlap() {
        assert!(intervals_overlap(hour(10), hour(12), hour(11), hour(13)));
    }

    #[test]
    fn containment_overlaps() {
        assert!(intervals_overlap(hour(9), hour(15), hour(10), hour(11)));
    }

    #[test]
    fn identical_intervals_overlap() {
        assert!(intervals_overlap(hour(10), hour(12), hour(10), hour(12)));
    }

    #[test]
    fn adjacent_intervals_do_not_overlap() {
        // One interval's end equals the other's start.
        assert!(!intervals_overlap(hour(10), hour(11), hour(11), hour(12)));
        assert!(!intervals_overlap(hour(11), hour(12), hour(10), hour(11)));
    }

    #[test]
    fn disjoint_intervals_do_not_overlap() {
        assert!(!intervals_overlap(hour(8), hour(9), hour(12), hour(13)));
    }

    #[test]
    fn symmetric_in_interval_order() {
        let cases = [
            (hour(10), hour(12), hour(11), hour(13)),
            (hour(10), hour(11), hour(11), hour(12)),
            (hour(8), hour(9), hour(12), hour(13)),
            (hour(10), hour(12), hour(10), hour(12)),
        ];
        for (a1, a2, b1, b2) in cases {
            assert_eq!(
                intervals_overlap(a1, a2, b1, b2),
                intervals_overlap(b1, b2, a1, a2)
            );
        }
    }
}
