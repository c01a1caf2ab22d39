//! Port for booking persistence.

use async_trait::async_trait;

use crate::domain::{Booking, SeatNumber, ShowtimeId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by booking repository adapters.
    pub enum BookingRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "booking repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "booking repository query failed: {message}",
        /// The seat is already booked for the showtime.
        SeatTaken { seat_number: i32 } =>
            "seat {seat_number} is already booked",
    }
}

/// Port for the append-only booking ledger.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Booking holding `seat` for `showtime_id`, if any.
    async fn find_by_seat(
        &self,
        showtime_id: ShowtimeId,
        seat: SeatNumber,
    ) -> Result<Option<Booking>, BookingRepositoryError>;

    /// Append a booking; a second claim on the same seat fails with
    /// [`BookingRepositoryError::SeatTaken`].
    async fn insert(&self, booking: &Booking) -> Result<(), BookingRepositoryError>;
}
