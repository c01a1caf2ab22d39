//! Shared helpers for the cinema integration tests.
//!
//! Each file under `backend/tests/` compiles as its own crate and uses a
//! subset of these helpers.
#![allow(dead_code, reason = "each test crate uses a subset of the helpers")]

use std::sync::Arc;

use actix_web::{App, web};
use chrono::{DateTime, TimeZone, Utc};

use cinema_backend::Trace;
use cinema_backend::domain::ports::{BookingRepository, MovieRepository, ShowtimeRepository};
use cinema_backend::domain::{
    BookingDraft, BookingLedgerService, CatalogService, MovieDraft, MovieId, OperationDeadline,
    ShowtimeDraft, ShowtimeId, ShowtimeSchedulerService,
};
use cinema_backend::inbound::http::{self, state::HttpState};
use cinema_backend::outbound::memory::InMemoryStore;

/// Environment variable naming a disposable PostgreSQL database.
pub const TEST_DATABASE_URL_VAR: &str = "CINEMA_TEST_DATABASE_URL";

/// Compose the three services over the given repositories.
pub fn wire<M, S, B>(movies: M, showtimes: S, bookings: B) -> HttpState
where
    M: MovieRepository + 'static,
    S: ShowtimeRepository + 'static,
    B: BookingRepository + 'static,
{
    let deadline = OperationDeadline::unbounded();
    let catalog = Arc::new(CatalogService::new(Arc::new(movies)).with_deadline(deadline));
    let schedule = Arc::new(
        ShowtimeSchedulerService::new(Arc::new(showtimes), catalog.clone())
            .with_deadline(deadline),
    );
    let ledger = Arc::new(
        BookingLedgerService::new(Arc::new(bookings), schedule.clone()).with_deadline(deadline),
    );
    HttpState::new(catalog, schedule, ledger)
}

/// Services backed by `store`.
pub fn memory_state(store: &InMemoryStore) -> HttpState {
    wire(store.movies(), store.showtimes(), store.bookings())
}

/// Full Actix application over `state`, as the server mounts it.
pub fn app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(Trace)
        .configure(http::configure)
}

/// 2025-02-14 at `hour:minute` UTC.
pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 2, 14, hour, minute, 0)
        .single()
        .expect("valid timestamp")
}

pub fn movie_draft(title: &str) -> MovieDraft {
    MovieDraft {
        title: title.to_owned(),
        genre: "Sci-Fi".to_owned(),
        duration_minutes: 148,
        rating: 8.8,
        release_year: 2010,
    }
}

pub fn showtime_draft(
    movie_id: MovieId,
    theater: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> ShowtimeDraft {
    ShowtimeDraft {
        movie_id,
        theater: theater.to_owned(),
        start_time: start,
        end_time: end,
        price: 12.5,
    }
}

pub fn booking_draft(showtime_id: ShowtimeId, seat_number: i32, user_id: &str) -> BookingDraft {
    BookingDraft {
        showtime_id,
        seat_number,
        user_id: user_id.to_owned(),
    }
}

/// Database URL for the PostgreSQL suite, or `None` with a skip marker.
pub fn test_database_url() -> Option<String> {
    match std::env::var(TEST_DATABASE_URL_VAR) {
        Ok(url) if !url.trim().is_empty() => Some(url),
        _ => {
            eprintln!("SKIP-POSTGRES: {TEST_DATABASE_URL_VAR} is not set");
            None
        }
    }
}
