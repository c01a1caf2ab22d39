//! Builders wiring repositories into the domain services behind
//! [`HttpState`].

use std::sync::Arc;

use cinema_backend::domain::ports::{
    BookingRepository, MovieRepository, ShowtimeRepository, StorageHealth,
};
use cinema_backend::domain::{
    BookingLedgerService, CatalogService, OperationDeadline, ShowtimeSchedulerService,
};
use cinema_backend::inbound::http::state::HttpState;
use cinema_backend::outbound::memory::InMemoryStore;
use cinema_backend::outbound::persistence::{
    DbPool, DieselBookingRepository, DieselMovieRepository, DieselShowtimeRepository,
};

use super::ServerConfig;

/// Compose the three services over the given repositories.
///
/// The scheduler validates movie ids through the catalog and the ledger
/// validates showtime ids through the scheduler, each via its driving port.
fn wire_services<M, S, B>(
    movies: M,
    showtimes: S,
    bookings: B,
    deadline: OperationDeadline,
) -> HttpState
where
    M: MovieRepository + 'static,
    S: ShowtimeRepository + 'static,
    B: BookingRepository + 'static,
{
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

fn diesel_state(pool: &DbPool, deadline: OperationDeadline) -> HttpState {
    wire_services(
        DieselMovieRepository::new(pool.clone()),
        DieselShowtimeRepository::new(pool.clone()),
        DieselBookingRepository::new(pool.clone()),
        deadline,
    )
}

fn memory_state(store: &InMemoryStore, deadline: OperationDeadline) -> HttpState {
    wire_services(store.movies(), store.showtimes(), store.bookings(), deadline)
}

/// Services plus the store handle the readiness check pings.
pub(crate) struct Wiring {
    pub(crate) http: HttpState,
    pub(crate) storage: Arc<dyn StorageHealth>,
}

/// Wire from configuration: PostgreSQL repositories when a pool is
/// configured, otherwise a fresh in-memory store.
pub(crate) fn build_wiring(config: &ServerConfig) -> Wiring {
    match &config.db_pool {
        Some(pool) => Wiring {
            http: diesel_state(pool, config.deadline),
            storage: Arc::new(pool.clone()),
        },
        None => {
            let store = InMemoryStore::new();
            Wiring {
                http: memory_state(&store, config.deadline),
                storage: Arc::new(store),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use rstest::rstest;

    use super::*;
    use cinema_backend::domain::{BookingDraft, ErrorCode, MovieDraft, ShowtimeDraft};

    #[rstest]
    #[tokio::test]
    async fn memory_wiring_threads_lookups_through_each_layer() {
        let store = InMemoryStore::new();
        let state = memory_state(&store, OperationDeadline::unbounded());

        let movie = state
            .catalog
            .create(MovieDraft {
                title: "Heat".to_owned(),
                genre: "Crime".to_owned(),
                duration_minutes: 170,
                rating: 8.3,
                release_year: 1995,
            })
            .await
            .expect("movie created");
        let start = Utc
            .with_ymd_and_hms(2024, 5, 1, 18, 0, 0)
            .single()
            .expect("valid timestamp");
        let showtime = state
            .schedule
            .create(ShowtimeDraft {
                movie_id: movie.id(),
                theater: "A".to_owned(),
                start_time: start,
                end_time: start + Duration::hours(3),
                price: 12.0,
            })
            .await
            .expect("showtime created");
        state
            .ledger
            .create(BookingDraft {
                showtime_id: showtime.id(),
                seat_number: 1,
                user_id: "u1".to_owned(),
            })
            .await
            .expect("booking created");

        let snapshot = store.snapshot().expect("store lock");
        assert_eq!(snapshot.bookings.len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn memory_wiring_reports_healthy_storage() {
        let config = ServerConfig::new(
            "127.0.0.1:0".parse().expect("valid address"),
            OperationDeadline::unbounded(),
        );

        let wiring = build_wiring(&config);

        assert!(wiring.storage.ping().await.is_ok());
        assert!(wiring.http.catalog.list().await.expect("list").is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn booking_against_unknown_showtime_is_not_found() {
        let state = memory_state(&InMemoryStore::new(), OperationDeadline::unbounded());
        let err = state
            .ledger
            .create(BookingDraft {
                showtime_id: cinema_backend::domain::ShowtimeId::new(42),
                seat_number: 1,
                user_id: "u1".to_owned(),
            })
            .await
            .expect_err("unknown showtime");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
