//! Booking ledger service.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ports::{
    BookingLedger, BookingRepository, BookingRepositoryError, ShowtimeSchedule,
};
use crate::domain::{Booking, BookingDraft, BookingId, Error, OperationDeadline};

fn seat_taken(seat_number: i32) -> Error {
    Error::conflict(format!(
        "Seat {seat_number} is already booked for this showtime"
    ))
}

fn map_repository_error(error: BookingRepositoryError) -> Error {
    match error {
        BookingRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("booking repository unavailable: {message}"))
        }
        BookingRepositoryError::Query { message } => {
            Error::internal(format!("booking repository error: {message}"))
        }
        BookingRepositoryError::SeatTaken { seat_number } => seat_taken(seat_number),
    }
}

/// Ledger service backed by a booking repository and the scheduler.
pub struct BookingLedgerService<R, S: ?Sized> {
    booking_repo: Arc<R>,
    schedule: Arc<S>,
    deadline: OperationDeadline,
}

impl<R, S: ?Sized> Clone for BookingLedgerService<R, S> {
    fn clone(&self) -> Self {
        Self {
            booking_repo: Arc::clone(&self.booking_repo),
            schedule: Arc::clone(&self.schedule),
            deadline: self.deadline,
        }
    }
}

impl<R, S: ?Sized> BookingLedgerService<R, S> {
    /// Create a ledger without an operation deadline.
    pub fn new(booking_repo: Arc<R>, schedule: Arc<S>) -> Self {
        Self {
            booking_repo,
            schedule,
            deadline: OperationDeadline::unbounded(),
        }
    }

    /// Bound every operation by `deadline`.
    pub fn with_deadline(mut self, deadline: OperationDeadline) -> Self {
        self.deadline = deadline;
        self
    }
}

impl<R, S> BookingLedgerService<R, S>
where
    R: BookingRepository,
    S: ShowtimeSchedule + ?Sized,
{
    async fn create_booking(&self, draft: BookingDraft) -> Result<Booking, Error> {
        let booking = Booking::new(BookingId::random(), draft)?;
        self.schedule.find_one(booking.showtime_id()).await?;

        let existing = self
            .booking_repo
            .find_by_seat(booking.showtime_id(), booking.seat_number())
            .await
            .map_err(map_repository_error)?;
        if existing.is_some() {
            warn!(
                showtime_id = %booking.showtime_id(),
                seat = booking.seat_number().get(),
                "rejected booking for taken seat"
            );
            return Err(seat_taken(booking.seat_number().get()));
        }

        self.booking_repo
            .insert(&booking)
            .await
            .map_err(map_repository_error)?;
        info!(
            booking_id = %booking.id(),
            showtime_id = %booking.showtime_id(),
            seat = booking.seat_number().get(),
            "booking recorded"
        );
        Ok(booking)
    }
}

#[async_trait]
impl<R, S> BookingLedger for BookingLedgerService<R, S>
where
    R: BookingRepository,
    S: ShowtimeSchedule + ?Sized,
{
    async fn create(&self, draft: BookingDraft) -> Result<Booking, Error> {
        self.deadline
            .run("create booking", self.create_booking(draft))
            .await
    }
}

#[cfg(test)]
#[path = "ledger_service_tests.rs"]
mod tests;
