//! Domain ports for the hexagonal boundary.
//!
//! Driving ports (`MovieCatalog`, `ShowtimeSchedule`, `BookingLedger`) are the
//! use cases inbound adapters call. Driven ports (`*Repository`) are what the
//! services require from storage. `StorageHealth` backs the readiness check.

mod macros;
pub(crate) use macros::define_port_error;

mod booking_ledger;
mod booking_repository;
mod movie_catalog;
mod movie_repository;
mod showtime_repository;
mod showtime_schedule;
mod storage_health;

pub use booking_ledger::BookingLedger;
#[cfg(test)]
pub use booking_ledger::MockBookingLedger;
#[cfg(test)]
pub use booking_repository::MockBookingRepository;
pub use booking_repository::{BookingRepository, BookingRepositoryError};
#[cfg(test)]
pub use movie_catalog::MockMovieCatalog;
pub use movie_catalog::MovieCatalog;
#[cfg(test)]
pub use movie_repository::MockMovieRepository;
pub use movie_repository::{MovieRepository, MovieRepositoryError};
#[cfg(test)]
pub use showtime_repository::MockShowtimeRepository;
pub use showtime_repository::{ShowtimeRepository, ShowtimeRepositoryError};
#[cfg(test)]
pub use showtime_schedule::MockShowtimeSchedule;
pub use showtime_schedule::ShowtimeSchedule;
#[cfg(test)]
pub use storage_health::MockStorageHealth;
pub use storage_health::{StorageHealth, StorageHealthError};
