//! Seat bookings against a showtime.
//!
//! Bookings are immutable once written. Seat numbers are opaque positive
//! integers; a seat may be claimed once per showtime.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{Error, ShowtimeId};

/// Globally unique booking identifier (UUID v4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct BookingId(Uuid);

impl BookingId {
    /// Generate a fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reasons a booking payload is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingValidationError {
    #[error("seat number must be at least 1")]
    SeatNumberTooSmall,
    #[error("user id must not be empty")]
    EmptyUserId,
}

impl BookingValidationError {
    /// Wire name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::SeatNumberTooSmall => "seatNumber",
            Self::EmptyUserId => "userId",
        }
    }

    /// Stable reason code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::SeatNumberTooSmall => "too_small",
            Self::EmptyUserId => "empty",
        }
    }
}

impl From<BookingValidationError> for Error {
    fn from(err: BookingValidationError) -> Self {
        Error::invalid_field(err.field(), err.code(), err.to_string())
    }
}

/// Seat number, always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, ToSchema)]
#[serde(transparent)]
pub struct SeatNumber(i32);

impl SeatNumber {
    /// Validate a raw seat number.
    pub fn new(raw: i32) -> Result<Self, BookingValidationError> {
        if raw < 1 {
            return Err(BookingValidationError::SeatNumberTooSmall);
        }
        Ok(Self(raw))
    }

    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for SeatNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque identifier of the customer holding a booking.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(transparent)]
pub struct CustomerId(String);

impl CustomerId {
    /// Validate a raw user identifier.
    pub fn new(raw: impl Into<String>) -> Result<Self, BookingValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(BookingValidationError::EmptyUserId);
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Unvalidated input for a new booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingDraft {
    pub showtime_id: ShowtimeId,
    pub seat_number: i32,
    pub user_id: String,
}

/// A persisted booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[schema(value_type = String, format = Uuid)]
    id: BookingId,
    #[schema(value_type = i64)]
    showtime_id: ShowtimeId,
    #[schema(value_type = i32, minimum = 1)]
    seat_number: SeatNumber,
    #[schema(value_type = String)]
    user_id: CustomerId,
}

impl Booking {
    /// Validate `draft` and assign it `id`.
    ///
    /// # Examples
    /// ```
    /// use cinema_backend::domain::{Booking, BookingDraft, BookingId, ShowtimeId};
    ///
    /// let draft = BookingDraft {
    ///     showtime_id: ShowtimeId::new(1),
    ///     seat_number: 5,
    ///     user_id: "84438967-f68f-4fa0-b620-0f08217e76af".into(),
    /// };
    /// let booking = Booking::new(BookingId::random(), draft).expect("valid booking");
    /// assert_eq!(booking.seat_number().get(), 5);
    /// ```
    pub fn new(id: BookingId, draft: BookingDraft) -> Result<Self, BookingValidationError> {
        let seat_number = SeatNumber::new(draft.seat_number)?;
        let user_id = CustomerId::new(draft.user_id)?;
        Ok(Self {
            id,
            showtime_id: draft.showtime_id,
            seat_number,
            user_id,
        })
    }

    pub fn id(&self) -> BookingId {
        self.id
    }

    pub fn showtime_id(&self) -> ShowtimeId {
        self.showtime_id
    }

    pub fn seat_number(&self) -> SeatNumber {
        self.seat_number
    }

    pub fn user_id(&self) -> &CustomerId {
        &self.user_id
    }
}
