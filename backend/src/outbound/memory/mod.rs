//! In-memory adapters for the repository ports.
//!
//! All three tables sit behind one mutex, so every check-and-write runs under
//! a single lock acquisition. Used when no database URL is configured and by
//! the integration tests.
//!
//! Not durable: state is lost when the process exits.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    BookingRepository, BookingRepositoryError, MovieRepository, MovieRepositoryError,
    ShowtimeRepository, ShowtimeRepositoryError, StorageHealth, StorageHealthError,
};
use crate::domain::{
    Booking, Movie, MovieDraft, MovieId, MovieUpdate, ScreeningWindow, SeatNumber, Showtime,
    ShowtimeDraft, ShowtimeId, ShowtimeUpdate,
};

#[derive(Debug, Default)]
struct Tables {
    movies: BTreeMap<MovieId, Movie>,
    showtimes: BTreeMap<ShowtimeId, Showtime>,
    bookings: BTreeMap<(ShowtimeId, SeatNumber), Booking>,
    last_movie_id: i64,
    last_showtime_id: i64,
}

impl Tables {
    fn title_taken(&self, title: &str, except: Option<MovieId>) -> bool {
        self.movies
            .values()
            .any(|movie| movie.title() == title && Some(movie.id()) != except)
    }

    fn overlapping(
        &self,
        theater: &str,
        window: &ScreeningWindow,
        exclude: Option<ShowtimeId>,
    ) -> Vec<Showtime> {
        self.showtimes
            .values()
            .filter(|showtime| Some(showtime.id()) != exclude)
            .filter(|showtime| showtime.theater() == theater)
            .filter(|showtime| showtime.window().overlaps(window))
            .cloned()
            .collect()
    }
}

/// Point-in-time copy of every table, ordered by key.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSnapshot {
    pub movies: Vec<Movie>,
    pub showtimes: Vec<Showtime>,
    pub bookings: Vec<Booking>,
}

/// Shared in-memory store handing out repository handles.
///
/// # Examples
/// ```
/// use cinema_backend::outbound::memory::InMemoryStore;
///
/// let store = InMemoryStore::new();
/// let movies = store.movies();
/// let snapshot = store.snapshot().expect("store lock");
/// assert!(snapshot.movies.is_empty());
/// # drop(movies);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
}

/// The store mutex was poisoned by a panicking writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("in-memory store lock poisoned")]
pub struct PoisonedStore;

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Movie repository sharing this store.
    pub fn movies(&self) -> InMemoryMovieRepository {
        InMemoryMovieRepository {
            store: self.clone(),
        }
    }

    /// Showtime repository sharing this store.
    pub fn showtimes(&self) -> InMemoryShowtimeRepository {
        InMemoryShowtimeRepository {
            store: self.clone(),
        }
    }

    /// Booking repository sharing this store.
    pub fn bookings(&self) -> InMemoryBookingRepository {
        InMemoryBookingRepository {
            store: self.clone(),
        }
    }

    /// Copy the current contents of every table.
    pub fn snapshot(&self) -> Result<StoreSnapshot, PoisonedStore> {
        let tables = self.lock()?;
        Ok(StoreSnapshot {
            movies: tables.movies.values().cloned().collect(),
            showtimes: tables.showtimes.values().cloned().collect(),
            bookings: tables.bookings.values().cloned().collect(),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, PoisonedStore> {
        self.tables.lock().map_err(|_| PoisonedStore)
    }
}

#[async_trait]
impl StorageHealth for InMemoryStore {
    async fn ping(&self) -> Result<(), StorageHealthError> {
        self.lock()
            .map(drop)
            .map_err(|err| StorageHealthError::unavailable(err.to_string()))
    }
}

/// [`MovieRepository`] over an [`InMemoryStore`].
#[derive(Debug, Clone)]
pub struct InMemoryMovieRepository {
    store: InMemoryStore,
}

impl InMemoryMovieRepository {
    fn lock(&self) -> Result<MutexGuard<'_, Tables>, MovieRepositoryError> {
        self.store
            .lock()
            .map_err(|err| MovieRepositoryError::query(err.to_string()))
    }
}

#[async_trait]
impl MovieRepository for InMemoryMovieRepository {
    async fn insert(&self, draft: &MovieDraft) -> Result<Movie, MovieRepositoryError> {
        let mut tables = self.lock()?;
        if tables.title_taken(&draft.title, None) {
            return Err(MovieRepositoryError::duplicate_title(draft.title.as_str()));
        }
        let id = MovieId::new(tables.last_movie_id + 1);
        let movie = Movie::new(id, draft.clone())
            .map_err(|err| MovieRepositoryError::query(err.to_string()))?;
        tables.last_movie_id = id.get();
        tables.movies.insert(id, movie.clone());
        Ok(movie)
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<Movie>, MovieRepositoryError> {
        let tables = self.lock()?;
        Ok(tables
            .movies
            .values()
            .find(|movie| movie.title() == title)
            .cloned())
    }

    async fn find_by_id(&self, id: MovieId) -> Result<Option<Movie>, MovieRepositoryError> {
        Ok(self.lock()?.movies.get(&id).cloned())
    }

    async fn update(
        &self,
        id: MovieId,
        update: &MovieUpdate,
    ) -> Result<Option<Movie>, MovieRepositoryError> {
        let mut tables = self.lock()?;
        let Some(current) = tables.movies.get(&id) else {
            return Ok(None);
        };
        let next = current
            .apply(update)
            .map_err(|err| MovieRepositoryError::query(err.to_string()))?;
        if tables.title_taken(next.title(), Some(id)) {
            return Err(MovieRepositoryError::duplicate_title(next.title()));
        }
        tables.movies.insert(id, next.clone());
        Ok(Some(next))
    }

    async fn delete(&self, id: MovieId) -> Result<bool, MovieRepositoryError> {
        Ok(self.lock()?.movies.remove(&id).is_some())
    }

    async fn list(&self) -> Result<Vec<Movie>, MovieRepositoryError> {
        Ok(self.lock()?.movies.values().cloned().collect())
    }
}

/// [`ShowtimeRepository`] over an [`InMemoryStore`].
#[derive(Debug, Clone)]
pub struct InMemoryShowtimeRepository {
    store: InMemoryStore,
}

impl InMemoryShowtimeRepository {
    fn lock(&self) -> Result<MutexGuard<'_, Tables>, ShowtimeRepositoryError> {
        self.store
            .lock()
            .map_err(|err| ShowtimeRepositoryError::query(err.to_string()))
    }
}

#[async_trait]
impl ShowtimeRepository for InMemoryShowtimeRepository {
    async fn find_by_id(
        &self,
        id: ShowtimeId,
    ) -> Result<Option<Showtime>, ShowtimeRepositoryError> {
        Ok(self.lock()?.showtimes.get(&id).cloned())
    }

    async fn find_overlapping(
        &self,
        theater: &str,
        window: &ScreeningWindow,
        exclude: Option<ShowtimeId>,
    ) -> Result<Vec<Showtime>, ShowtimeRepositoryError> {
        Ok(self.lock()?.overlapping(theater, window, exclude))
    }

    async fn insert(&self, draft: &ShowtimeDraft) -> Result<Showtime, ShowtimeRepositoryError> {
        let window = draft
            .validate()
            .map_err(|err| ShowtimeRepositoryError::query(err.to_string()))?;
        let mut tables = self.lock()?;
        if !tables.overlapping(&draft.theater, &window, None).is_empty() {
            return Err(ShowtimeRepositoryError::overlap(draft.theater.as_str()));
        }
        let id = ShowtimeId::new(tables.last_showtime_id + 1);
        let showtime = Showtime::new(id, draft.clone())
            .map_err(|err| ShowtimeRepositoryError::query(err.to_string()))?;
        tables.last_showtime_id = id.get();
        tables.showtimes.insert(id, showtime.clone());
        Ok(showtime)
    }

    async fn update(
        &self,
        id: ShowtimeId,
        update: &ShowtimeUpdate,
    ) -> Result<Option<Showtime>, ShowtimeRepositoryError> {
        let mut tables = self.lock()?;
        let Some(current) = tables.showtimes.get(&id) else {
            return Ok(None);
        };
        let next = current.apply(update).map_err(ShowtimeRepositoryError::invalid)?;
        if update.touches_schedule()
            && !tables
                .overlapping(next.theater(), &next.window(), Some(id))
                .is_empty()
        {
            return Err(ShowtimeRepositoryError::overlap(next.theater()));
        }
        tables.showtimes.insert(id, next.clone());
        Ok(Some(next))
    }

    async fn delete(&self, id: ShowtimeId) -> Result<bool, ShowtimeRepositoryError> {
        Ok(self.lock()?.showtimes.remove(&id).is_some())
    }
}

/// [`BookingRepository`] over an [`InMemoryStore`].
#[derive(Debug, Clone)]
pub struct InMemoryBookingRepository {
    store: InMemoryStore,
}

impl InMemoryBookingRepository {
    fn lock(&self) -> Result<MutexGuard<'_, Tables>, BookingRepositoryError> {
        self.store
            .lock()
            .map_err(|err| BookingRepositoryError::query(err.to_string()))
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn find_by_seat(
        &self,
        showtime_id: ShowtimeId,
        seat: SeatNumber,
    ) -> Result<Option<Booking>, BookingRepositoryError> {
        Ok(self.lock()?.bookings.get(&(showtime_id, seat)).cloned())
    }

    async fn insert(&self, booking: &Booking) -> Result<(), BookingRepositoryError> {
        let mut tables = self.lock()?;
        let key = (booking.showtime_id(), booking.seat_number());
        if tables.bookings.contains_key(&key) {
            return Err(BookingRepositoryError::seat_taken(booking.seat_number().get()));
        }
        tables.bookings.insert(key, booking.clone());
        Ok(())
    }
}
