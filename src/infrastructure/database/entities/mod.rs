//! Database entities

pub mod booking;
pub mod vehicle;
