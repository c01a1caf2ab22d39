//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the repository ports backed by PostgreSQL via
//! `diesel-async` and a `bb8` pool.
//!
//! - Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//!   private; rows become domain values through the validating constructors.
//! - Check-then-act races are closed in the database: the `movies_title_key`
//!   and `bookings_seat_key` unique constraints, per-theater advisory locks,
//!   and the `showtimes_no_overlap` exclusion constraint.
//!
//! # Example
//!
//! ```rust,no_run
//! use cinema_backend::outbound::persistence::{DbPool, DieselMovieRepository, PoolConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/cinema")).await?;
//! let movies = DieselMovieRepository::new(pool);
//! # let _ = movies;
//! # Ok(())
//! # }
//! ```

mod diesel_booking_repository;
mod diesel_error_mapping;
mod diesel_movie_repository;
mod diesel_showtime_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_booking_repository::DieselBookingRepository;
pub use diesel_movie_repository::DieselMovieRepository;
pub use diesel_showtime_repository::DieselShowtimeRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
