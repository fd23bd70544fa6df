//! FleetLink - logistics vehicle booking service
//!
//! Registers a fleet of vehicles, searches them for availability over a
//! delivery window, and books them without double-allocation.
//!
//! ## Architecture
//!
//! - `domain`: vehicles, bookings, scheduling rules, repository traits
//! - `application`: booking engine, fleet service, background completion
//! - `infrastructure`: SeaORM persistence and in-memory storage
//! - `interfaces`: HTTP REST API with Swagger documentation
//! - `shared`: shutdown coordination
//! - `config`: TOML application configuration

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod shared;

pub use application::{BookingService, FleetService};
pub use config::AppConfig;
pub use infrastructure::database::migrator::Migrator;
pub use infrastructure::{
    init_database, DatabaseConfig, InMemoryRepositoryProvider, SeaOrmRepositoryProvider,
};
pub use interfaces::http::create_api_router;
