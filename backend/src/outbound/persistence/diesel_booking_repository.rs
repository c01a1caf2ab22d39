//! PostgreSQL-backed `BookingRepository` implementation using Diesel ORM.
//!
//! Seat uniqueness rests on the `bookings_seat_key` constraint; of two racing
//! inserts for the same seat, the loser receives `SeatTaken`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{BookingRepository, BookingRepositoryError};
use crate::domain::{Booking, BookingDraft, BookingId, SeatNumber, ShowtimeId};

use super::diesel_error_mapping::StoreFailure;
use super::models::{BookingRow, NewBookingRow};
use super::pool::DbPool;
use super::schema::bookings;

/// Diesel-backed implementation of the booking repository port.
#[derive(Clone)]
pub struct DieselBookingRepository {
    pool: DbPool,
}

impl DieselBookingRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: impl Into<StoreFailure>, seat_number: i32) -> BookingRepositoryError {
    match failure.into() {
        StoreFailure::Connection(message) => BookingRepositoryError::connection(message),
        StoreFailure::UniqueViolation { .. } => BookingRepositoryError::seat_taken(seat_number),
        StoreFailure::OverlapViolation => {
            BookingRepositoryError::query("unexpected exclusion violation on bookings")
        }
        StoreFailure::Query(message) => BookingRepositoryError::query(message),
    }
}

fn row_to_booking(row: BookingRow) -> Result<Booking, BookingRepositoryError> {
    let BookingRow {
        id,
        showtime_id,
        seat_number,
        user_id,
    } = row;
    Booking::new(
        BookingId::from_uuid(id),
        BookingDraft {
            showtime_id: ShowtimeId::new(showtime_id),
            seat_number,
            user_id,
        },
    )
    .map_err(|err| BookingRepositoryError::query(format!("invalid booking row {id}: {err}")))
}

#[async_trait]
impl BookingRepository for DieselBookingRepository {
    async fn find_by_seat(
        &self,
        showtime_id: ShowtimeId,
        seat: SeatNumber,
    ) -> Result<Option<Booking>, BookingRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_failure(err, seat.get()))?;
        let row = bookings::table
            .filter(bookings::showtime_id.eq(showtime_id.get()))
            .filter(bookings::seat_number.eq(seat.get()))
            .select(BookingRow::as_select())
            .first::<BookingRow>(&mut conn)
            .await
            .optional()
            .map_err(|err| map_failure(err, seat.get()))?;
        row.map(row_to_booking).transpose()
    }

    async fn insert(&self, booking: &Booking) -> Result<(), BookingRepositoryError> {
        let seat_number = booking.seat_number().get();
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_failure(err, seat_number))?;
        let new_row = NewBookingRow {
            id: *booking.id().as_uuid(),
            showtime_id: booking.showtime_id().get(),
            seat_number,
            user_id: booking.user_id().as_str(),
        };

        diesel::insert_into(bookings::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_failure(err, seat_number))
    }
}
