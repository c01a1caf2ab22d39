//! Port for showtime persistence.
//!
//! Adapters own the no-overlap invariant at write time: `insert` and `update`
//! re-run the overlap check inside the same atomic unit as the write.

use async_trait::async_trait;

use crate::domain::{
    ScreeningWindow, Showtime, ShowtimeDraft, ShowtimeId, ShowtimeUpdate, ShowtimeValidationError,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by showtime repository adapters.
    pub enum ShowtimeRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "showtime repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "showtime repository query failed: {message}",
        /// The write would overlap another showtime in the same theater.
        Overlap { theater: String } =>
            "showtime overlaps another showtime in theater {theater}",
        /// The update no longer validates against the stored row.
        Invalid { reason: ShowtimeValidationError } =>
            "showtime update rejected: {reason}",
    }
}

/// Port for reading and writing showtimes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShowtimeRepository: Send + Sync {
    /// Look up a showtime by identifier.
    async fn find_by_id(&self, id: ShowtimeId)
    -> Result<Option<Showtime>, ShowtimeRepositoryError>;

    /// Showtimes in `theater` whose windows intersect `window`, skipping
    /// `exclude` when given.
    async fn find_overlapping(
        &self,
        theater: &str,
        window: &ScreeningWindow,
        exclude: Option<ShowtimeId>,
    ) -> Result<Vec<Showtime>, ShowtimeRepositoryError>;

    /// Insert a validated draft, failing with
    /// [`ShowtimeRepositoryError::Overlap`] on collision.
    async fn insert(&self, draft: &ShowtimeDraft) -> Result<Showtime, ShowtimeRepositoryError>;

    /// Merge `update` into the stored row and write the result.
    ///
    /// The read, merge, overlap re-check and write form one atomic unit, so
    /// concurrent partial updates of the same row never drop each other's
    /// fields. Returns `None` when the row no longer exists.
    async fn update(
        &self,
        id: ShowtimeId,
        update: &ShowtimeUpdate,
    ) -> Result<Option<Showtime>, ShowtimeRepositoryError>;

    /// Delete a showtime, returning `false` when it was already gone.
    async fn delete(&self, id: ShowtimeId) -> Result<bool, ShowtimeRepositoryError>;
}
