//! Pure scheduling functions
//!
//! The ride-duration estimator and the interval-overlap predicate. Both are
//! deterministic, side-effect free, and exercised directly by tests.

pub mod overlap;
pub mod ride_duration;

pub use overlap::intervals_overlap;
pub use ride_duration::estimate_ride_duration;
