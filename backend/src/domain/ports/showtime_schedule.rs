//! Driving port for the showtime scheduler.

use async_trait::async_trait;

use crate::domain::{Error, Showtime, ShowtimeDraft, ShowtimeId, ShowtimeUpdate};

/// Scheduler use cases. Implementations guarantee that no two showtimes in
/// one theater overlap.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShowtimeSchedule: Send + Sync {
    /// Schedule a showtime for an existing movie.
    ///
    /// Fails with `InvalidRequest`, `NotFound` (unknown movie) or `Overlap`.
    async fn create(&self, draft: ShowtimeDraft) -> Result<Showtime, Error>;

    /// Resolve a showtime by identifier; `NotFound` when absent.
    async fn find_one(&self, id: ShowtimeId) -> Result<Showtime, Error>;

    /// Apply the provided fields, re-checking overlap when the theater or
    /// window moves.
    async fn update(&self, id: ShowtimeId, update: ShowtimeUpdate) -> Result<(), Error>;

    /// Delete a showtime. Existing bookings are left in place.
    async fn delete(&self, id: ShowtimeId) -> Result<(), Error>;
}
