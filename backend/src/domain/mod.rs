//! Domain primitives, ports and services.
//!
//! Purpose: define the cinema entities (movies, showtimes, bookings), their
//! validation rules, and the three services that own them. Nothing here
//! depends on Actix or Diesel; adapters live under `inbound` and `outbound`.
//!
//! Public surface:
//! - `Error`/`ErrorCode`: transport agnostic failure payload.
//! - `Movie`, `Showtime`, `Booking` and their drafts and updates.
//! - `CatalogService`, `ShowtimeSchedulerService`, `BookingLedgerService`.
//! - `ports`: driving and driven port traits.

pub mod booking;
pub mod catalog_service;
pub mod deadline;
pub mod error;
pub mod ledger_service;
pub mod movie;
pub mod ports;
pub mod scheduler_service;
pub mod showtime;
pub mod trace_id;

pub use self::booking::{
    Booking, BookingDraft, BookingId, BookingValidationError, CustomerId, SeatNumber,
};
pub use self::catalog_service::CatalogService;
pub use self::deadline::OperationDeadline;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::ledger_service::BookingLedgerService;
pub use self::movie::{Movie, MovieDraft, MovieId, MovieUpdate, MovieValidationError};
pub use self::scheduler_service::ShowtimeSchedulerService;
pub use self::showtime::{
    ScreeningWindow, Showtime, ShowtimeDraft, ShowtimeId, ShowtimeUpdate,
    ShowtimeValidationError,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use cinema_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("Showtime with ID 1 not found"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
