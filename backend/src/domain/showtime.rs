//! Showtimes: a movie screened in a named theater over a closed time window.
//!
//! Two showtimes in the same theater may never overlap. Windows are closed
//! intervals, so a screening ending at 12:00 collides with one starting at
//! 12:00.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Error, MovieId};

/// Store-assigned showtime identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct ShowtimeId(i64);

impl ShowtimeId {
    /// Wrap a raw identifier.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw identifier value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ShowtimeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reasons a showtime payload is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShowtimeValidationError {
    #[error("theater must not be empty")]
    EmptyTheater,
    #[error("end time must be after start time")]
    EndNotAfterStart,
    #[error("price must be a non-negative number")]
    InvalidPrice,
}

impl ShowtimeValidationError {
    /// Wire name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyTheater => "theater",
            Self::EndNotAfterStart => "endTime",
            Self::InvalidPrice => "price",
        }
    }

    /// Stable reason code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyTheater => "empty",
            Self::EndNotAfterStart => "end_not_after_start",
            Self::InvalidPrice => "out_of_range",
        }
    }
}

impl From<ShowtimeValidationError> for Error {
    fn from(err: ShowtimeValidationError) -> Self {
        Error::invalid_field(err.field(), err.code(), err.to_string())
    }
}

/// Closed time interval `[start, end]` with `start < end`.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use cinema_backend::domain::ScreeningWindow;
///
/// let at = |h| Utc.with_ymd_and_hms(2024, 5, 1, h, 0, 0).unwrap();
/// let morning = ScreeningWindow::try_new(at(10), at(12)).expect("valid window");
/// let noon = ScreeningWindow::try_new(at(12), at(13)).expect("valid window");
/// assert!(morning.overlaps(&noon));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreeningWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl ScreeningWindow {
    /// Construct a window, rejecting empty or inverted ranges.
    pub fn try_new(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Self, ShowtimeValidationError> {
        if start >= end {
            return Err(ShowtimeValidationError::EndNotAfterStart);
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Closed-interval intersection test; shared endpoints count.
    pub fn overlaps(&self, other: &ScreeningWindow) -> bool {
        self.start <= other.end && self.end >= other.start
    }
}

/// Unvalidated input for a new showtime.
#[derive(Debug, Clone, PartialEq)]
pub struct ShowtimeDraft {
    pub movie_id: MovieId,
    pub theater: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub price: f64,
}

impl ShowtimeDraft {
    /// Check every field and return the screening window on success.
    pub fn validate(&self) -> Result<ScreeningWindow, ShowtimeValidationError> {
        validate_theater(&self.theater)?;
        let window = ScreeningWindow::try_new(self.start_time, self.end_time)?;
        validate_price(self.price)?;
        Ok(window)
    }
}

/// Partial showtime update; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShowtimeUpdate {
    pub movie_id: Option<MovieId>,
    pub theater: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub price: Option<f64>,
}

impl ShowtimeUpdate {
    /// True when the update moves the showtime in space or time.
    pub fn touches_schedule(&self) -> bool {
        self.theater.is_some() || self.start_time.is_some() || self.end_time.is_some()
    }
}

/// A persisted showtime.
///
/// Serialises as `{id, movieId, theater, startTime, endTime, price}` with
/// RFC 3339 timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Showtime {
    #[schema(value_type = i64, example = 1)]
    id: ShowtimeId,
    #[schema(value_type = i64, example = 1)]
    movie_id: MovieId,
    #[schema(example = "Theater 1")]
    theater: String,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    #[schema(example = 12.5)]
    price: f64,
}

impl Showtime {
    /// Build a showtime from an identifier and a draft, validating the draft.
    pub fn new(id: ShowtimeId, draft: ShowtimeDraft) -> Result<Self, ShowtimeValidationError> {
        draft.validate()?;
        let ShowtimeDraft {
            movie_id,
            theater,
            start_time,
            end_time,
            price,
        } = draft;
        Ok(Self {
            id,
            movie_id,
            theater,
            start_time,
            end_time,
            price,
        })
    }

    /// Return a copy with the provided fields of `update` applied.
    ///
    /// The effective window is re-validated, so moving only the start past
    /// the existing end is rejected.
    pub fn apply(&self, update: &ShowtimeUpdate) -> Result<Self, ShowtimeValidationError> {
        let draft = ShowtimeDraft {
            movie_id: update.movie_id.unwrap_or(self.movie_id),
            theater: update
                .theater
                .clone()
                .unwrap_or_else(|| self.theater.clone()),
            start_time: update.start_time.unwrap_or(self.start_time),
            end_time: update.end_time.unwrap_or(self.end_time),
            price: update.price.unwrap_or(self.price),
        };
        Self::new(self.id, draft)
    }

    pub fn id(&self) -> ShowtimeId {
        self.id
    }

    pub fn movie_id(&self) -> MovieId {
        self.movie_id
    }

    pub fn theater(&self) -> &str {
        self.theater.as_str()
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.end_time
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    /// Screening window of this showtime.
    pub fn window(&self) -> ScreeningWindow {
        ScreeningWindow {
            start: self.start_time,
            end: self.end_time,
        }
    }
}

fn validate_theater(theater: &str) -> Result<(), ShowtimeValidationError> {
    if theater.trim().is_empty() {
        return Err(ShowtimeValidationError::EmptyTheater);
    }
    Ok(())
}

fn validate_price(price: f64) -> Result<(), ShowtimeValidationError> {
    if !price.is_finite() || price < 0.0 {
        return Err(ShowtimeValidationError::InvalidPrice);
    }
    Ok(())
}
