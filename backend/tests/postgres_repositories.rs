//! PostgreSQL adapter tests.
//!
//! Runs against the database named by `CINEMA_TEST_DATABASE_URL` and skips
//! when it is unset. The database is migrated and truncated first, so point
//! it at a disposable instance.

mod support;

use diesel::{Connection, PgConnection, RunQueryDsl};
use futures::future::join_all;

use cinema_backend::domain::ports::StorageHealth;
use cinema_backend::domain::{ErrorCode, MovieUpdate, ShowtimeUpdate};
use cinema_backend::inbound::http::state::HttpState;
use cinema_backend::outbound::persistence::{
    DbPool, DieselBookingRepository, DieselMovieRepository, DieselShowtimeRepository, PoolConfig,
    run_pending_migrations,
};
use support::{at, booking_draft, movie_draft, showtime_draft, test_database_url, wire};

fn reset_database(url: &str) {
    run_pending_migrations(url).expect("migrations apply");
    let mut conn = PgConnection::establish(url).expect("connect for reset");
    diesel::sql_query("TRUNCATE bookings, showtimes, movies RESTART IDENTITY")
        .execute(&mut conn)
        .expect("truncate tables");
}

async fn diesel_state(url: &str) -> (DbPool, HttpState) {
    let pool = DbPool::new(PoolConfig::new(url).with_max_size(8))
        .await
        .expect("pool builds");
    let state = wire(
        DieselMovieRepository::new(pool.clone()),
        DieselShowtimeRepository::new(pool.clone()),
        DieselBookingRepository::new(pool.clone()),
    );
    (pool, state)
}

async fn catalog_rules(state: &HttpState) {
    state
        .catalog
        .create(movie_draft("Inception"))
        .await
        .expect("movie");
    let err = state
        .catalog
        .create(movie_draft("Inception"))
        .await
        .expect_err("duplicate");
    assert_eq!(err.code(), ErrorCode::Conflict);

    state
        .catalog
        .create(movie_draft("Heat"))
        .await
        .expect("movie");
    let err = state
        .catalog
        .update(
            "Heat",
            MovieUpdate {
                title: Some("Inception".to_owned()),
                ..MovieUpdate::default()
            },
        )
        .await
        .expect_err("rename clash");
    assert_eq!(err.code(), ErrorCode::Conflict);

    state.catalog.remove("Heat").await.expect("removed");
    let titles: Vec<_> = state
        .catalog
        .list()
        .await
        .expect("list")
        .iter()
        .map(|movie| movie.title().to_owned())
        .collect();
    assert_eq!(titles, ["Inception"]);
}

async fn schedule_rules(state: &HttpState) {
    let movie = state
        .catalog
        .find_by_title("Inception")
        .await
        .expect("movie");
    let first = state
        .schedule
        .create(showtime_draft(movie.id(), "A", at(10, 0), at(12, 0)))
        .await
        .expect("first showtime");
    let err = state
        .schedule
        .create(showtime_draft(movie.id(), "A", at(12, 0), at(13, 0)))
        .await
        .expect_err("touching boundary");
    assert_eq!(err.code(), ErrorCode::Overlap);

    let second = state
        .schedule
        .create(showtime_draft(movie.id(), "A", at(14, 0), at(16, 0)))
        .await
        .expect("second showtime");
    let err = state
        .schedule
        .update(
            first.id(),
            ShowtimeUpdate {
                start_time: Some(at(13, 0)),
                end_time: Some(at(15, 0)),
                ..ShowtimeUpdate::default()
            },
        )
        .await
        .expect_err("moves into second");
    assert_eq!(err.code(), ErrorCode::Overlap);

    state
        .schedule
        .update(
            first.id(),
            ShowtimeUpdate {
                price: Some(20.0),
                ..ShowtimeUpdate::default()
            },
        )
        .await
        .expect("price-only update");
    let stored = state.schedule.find_one(first.id()).await.expect("stored");
    assert_eq!(stored.price(), 20.0);
    assert_eq!(stored.window(), first.window());

    let (repriced, moved) = tokio::join!(
        state.schedule.update(
            first.id(),
            ShowtimeUpdate {
                price: Some(25.0),
                ..ShowtimeUpdate::default()
            },
        ),
        state.schedule.update(
            first.id(),
            ShowtimeUpdate {
                theater: Some("D".to_owned()),
                ..ShowtimeUpdate::default()
            },
        ),
    );
    repriced.expect("price update");
    moved.expect("theater update");
    let stored = state.schedule.find_one(first.id()).await.expect("stored");
    assert_eq!(stored.price(), 25.0);
    assert_eq!(stored.theater(), "D");

    let racers = (0..8).map(|n| {
        let schedule = state.schedule.clone();
        let draft = showtime_draft(movie.id(), "B", at(18, n), at(20, n));
        tokio::spawn(async move { schedule.create(draft).await })
    });
    let winners = join_all(racers)
        .await
        .into_iter()
        .map(|joined| joined.expect("task completes"))
        .filter(Result::is_ok)
        .count();
    assert_eq!(winners, 1);

    state.schedule.delete(second.id()).await.expect("deleted");
    let err = state
        .schedule
        .find_one(second.id())
        .await
        .expect_err("gone");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

async fn ledger_rules(state: &HttpState) {
    let movie = state
        .catalog
        .find_by_title("Inception")
        .await
        .expect("movie");
    let showtime = state
        .schedule
        .create(showtime_draft(movie.id(), "C", at(9, 0), at(11, 0)))
        .await
        .expect("showtime");

    let racers = (0..8).map(|n| {
        let ledger = state.ledger.clone();
        let draft = booking_draft(showtime.id(), 5, &format!("user-{n}"));
        tokio::spawn(async move { ledger.create(draft).await })
    });
    let results: Vec<_> = join_all(racers)
        .await
        .into_iter()
        .map(|joined| joined.expect("task completes"))
        .collect();
    assert_eq!(results.iter().filter(|result| result.is_ok()).count(), 1);
    assert!(
        results
            .iter()
            .filter_map(|result| result.as_ref().err())
            .all(|err| err.code() == ErrorCode::Conflict)
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn postgres_adapters_enforce_cinema_rules() {
    let Some(url) = test_database_url() else {
        return;
    };
    let reset_url = url.clone();
    tokio::task::spawn_blocking(move || reset_database(&reset_url))
        .await
        .expect("reset task completes");
    let (pool, state) = diesel_state(&url).await;
    pool.ping().await.expect("database answers");

    catalog_rules(&state).await;
    schedule_rules(&state).await;
    ledger_rules(&state).await;
}
