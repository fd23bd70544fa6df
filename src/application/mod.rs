//! Business logic and use cases

pub mod booking_service;
pub mod completion;
pub mod fleet_service;

pub use booking_service::{
    Availability, AvailabilitySearch, BookingService, CreateBookingCommand,
};
pub use completion::start_completion_task;
pub use fleet_service::FleetService;
