//! Movie catalog entries.
//!
//! A movie is keyed for humans by its title, which is unique and compared
//! case-sensitively. The numeric identifier is opaque and assigned by the
//! store on insert.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::Error;

/// Shortest accepted running time in minutes.
pub const MIN_DURATION_MINUTES: i32 = 1;
/// Lowest accepted rating.
pub const MIN_RATING: f64 = 0.0;
/// Highest accepted rating.
pub const MAX_RATING: f64 = 10.0;
/// Earliest accepted release year.
pub const MIN_RELEASE_YEAR: i32 = 1900;

/// Store-assigned movie identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct MovieId(i64);

impl MovieId {
    /// Wrap a raw identifier.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw identifier value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reasons a movie payload is rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MovieValidationError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("genre must not be empty")]
    EmptyGenre,
    #[error("duration must be at least {min} minute")]
    DurationTooShort { min: i32 },
    #[error("rating must be a number between {min} and {max}")]
    RatingOutOfRange { min: f64, max: f64 },
    #[error("release year must be {min} or later")]
    ReleaseYearTooEarly { min: i32 },
}

impl MovieValidationError {
    /// Wire name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyTitle => "title",
            Self::EmptyGenre => "genre",
            Self::DurationTooShort { .. } => "duration",
            Self::RatingOutOfRange { .. } => "rating",
            Self::ReleaseYearTooEarly { .. } => "releaseYear",
        }
    }

    /// Stable reason code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyTitle | Self::EmptyGenre => "empty",
            Self::DurationTooShort { .. } | Self::ReleaseYearTooEarly { .. } => "too_small",
            Self::RatingOutOfRange { .. } => "out_of_range",
        }
    }
}

impl From<MovieValidationError> for Error {
    fn from(err: MovieValidationError) -> Self {
        Error::invalid_field(err.field(), err.code(), err.to_string())
    }
}

/// Unvalidated input for a new movie.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieDraft {
    pub title: String,
    pub genre: String,
    pub duration_minutes: i32,
    pub rating: f64,
    pub release_year: i32,
}

impl MovieDraft {
    /// Check every field, reporting the first failure in declaration order.
    pub fn validate(&self) -> Result<(), MovieValidationError> {
        validate_title(&self.title)?;
        validate_genre(&self.genre)?;
        validate_duration(self.duration_minutes)?;
        validate_rating(self.rating)?;
        validate_release_year(self.release_year)
    }
}

/// Partial movie update; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieUpdate {
    pub title: Option<String>,
    pub genre: Option<String>,
    pub duration_minutes: Option<i32>,
    pub rating: Option<f64>,
    pub release_year: Option<i32>,
}

impl MovieUpdate {
    /// True when no field is provided.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.genre.is_none()
            && self.duration_minutes.is_none()
            && self.rating.is_none()
            && self.release_year.is_none()
    }

    /// Check the provided fields only.
    pub fn validate(&self) -> Result<(), MovieValidationError> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(genre) = &self.genre {
            validate_genre(genre)?;
        }
        if let Some(duration) = self.duration_minutes {
            validate_duration(duration)?;
        }
        if let Some(rating) = self.rating {
            validate_rating(rating)?;
        }
        if let Some(year) = self.release_year {
            validate_release_year(year)?;
        }
        Ok(())
    }
}

/// A persisted movie.
///
/// Serialises as `{id, title, genre, duration, rating, releaseYear}`.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    #[schema(value_type = i64, example = 1)]
    id: MovieId,
    #[schema(example = "Inception")]
    title: String,
    #[schema(example = "Sci-Fi")]
    genre: String,
    #[serde(rename = "duration")]
    #[schema(example = 148)]
    duration_minutes: i32,
    #[schema(example = 8.8)]
    rating: f64,
    #[schema(example = 2010)]
    release_year: i32,
}

impl Movie {
    /// Build a movie from an identifier and a draft, validating the draft.
    ///
    /// # Examples
    /// ```
    /// use cinema_backend::domain::{Movie, MovieDraft, MovieId};
    ///
    /// let movie = Movie::new(
    ///     MovieId::new(1),
    ///     MovieDraft {
    ///         title: "Inception".into(),
    ///         genre: "Sci-Fi".into(),
    ///         duration_minutes: 148,
    ///         rating: 8.8,
    ///         release_year: 2010,
    ///     },
    /// )
    /// .expect("valid movie");
    /// assert_eq!(movie.title(), "Inception");
    /// ```
    pub fn new(id: MovieId, draft: MovieDraft) -> Result<Self, MovieValidationError> {
        draft.validate()?;
        let MovieDraft {
            title,
            genre,
            duration_minutes,
            rating,
            release_year,
        } = draft;
        Ok(Self {
            id,
            title,
            genre,
            duration_minutes,
            rating,
            release_year,
        })
    }

    /// Return a copy with the provided fields of `update` applied.
    pub fn apply(&self, update: &MovieUpdate) -> Result<Self, MovieValidationError> {
        update.validate()?;
        let mut next = self.clone();
        if let Some(title) = &update.title {
            next.title.clone_from(title);
        }
        if let Some(genre) = &update.genre {
            next.genre.clone_from(genre);
        }
        if let Some(duration) = update.duration_minutes {
            next.duration_minutes = duration;
        }
        if let Some(rating) = update.rating {
            next.rating = rating;
        }
        if let Some(year) = update.release_year {
            next.release_year = year;
        }
        Ok(next)
    }

    pub fn id(&self) -> MovieId {
        self.id
    }

    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    pub fn genre(&self) -> &str {
        self.genre.as_str()
    }

    pub fn duration_minutes(&self) -> i32 {
        self.duration_minutes
    }

    pub fn rating(&self) -> f64 {
        self.rating
    }

    pub fn release_year(&self) -> i32 {
        self.release_year
    }
}

fn validate_title(title: &str) -> Result<(), MovieValidationError> {
    if title.trim().is_empty() {
        return Err(MovieValidationError::EmptyTitle);
    }
    Ok(())
}

fn validate_genre(genre: &str) -> Result<(), MovieValidationError> {
    if genre.trim().is_empty() {
        return Err(MovieValidationError::EmptyGenre);
    }
    Ok(())
}

fn validate_duration(duration: i32) -> Result<(), MovieValidationError> {
    if duration < MIN_DURATION_MINUTES {
        return Err(MovieValidationError::DurationTooShort {
            min: MIN_DURATION_MINUTES,
        });
    }
    Ok(())
}

fn validate_rating(rating: f64) -> Result<(), MovieValidationError> {
    if !rating.is_finite() || !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(MovieValidationError::RatingOutOfRange {
            min: MIN_RATING,
            max: MAX_RATING,
        });
    }
    Ok(())
}

fn validate_release_year(year: i32) -> Result<(), MovieValidationError> {
    if year < MIN_RELEASE_YEAR {
        return Err(MovieValidationError::ReleaseYearTooEarly {
            min: MIN_RELEASE_YEAR,
        });
    }
    Ok(())
}
