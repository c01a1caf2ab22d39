//! Driving port for the booking ledger.

use async_trait::async_trait;

use crate::domain::{Booking, BookingDraft, Error};

/// Ledger use cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingLedger: Send + Sync {
    /// Claim a seat on an existing showtime.
    ///
    /// Fails with `InvalidRequest`, `NotFound` (unknown showtime) or
    /// `Conflict` when the seat is already taken.
    async fn create(&self, draft: BookingDraft) -> Result<Booking, Error>;
}
