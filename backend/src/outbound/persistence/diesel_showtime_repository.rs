//! PostgreSQL-backed `ShowtimeRepository` implementation using Diesel ORM.
//!
//! Writes run in one transaction per call:
//!
//! 1. Updates lock the target row with `SELECT ... FOR UPDATE` and merge the
//!    partial update into what is stored.
//! 2. `pg_advisory_xact_lock(hashtext(theater))` serialises writers per
//!    theater.
//! 3. The closed-interval overlap query is re-run.
//! 4. The row is inserted or updated.
//!
//! The `showtimes_no_overlap` exclusion constraint backs this up, and its
//! violations are reported as `Overlap` too.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_types::Text;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{ShowtimeRepository, ShowtimeRepositoryError};
use crate::domain::{
    MovieId, ScreeningWindow, Showtime, ShowtimeDraft, ShowtimeId, ShowtimeUpdate,
};

use super::diesel_error_mapping::StoreFailure;
use super::models::{NewShowtimeRow, ShowtimeChangeset, ShowtimeRow};
use super::pool::DbPool;
use super::schema::showtimes;

/// Diesel-backed implementation of the showtime repository port.
#[derive(Clone)]
pub struct DieselShowtimeRepository {
    pool: DbPool,
}

impl DieselShowtimeRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Failure inside a write transaction.
#[derive(Debug)]
enum WriteError {
    Overlap,
    Rejected(ShowtimeRepositoryError),
    Diesel(diesel::result::Error),
}

impl From<diesel::result::Error> for WriteError {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

fn map_failure(failure: impl Into<StoreFailure>, theater: &str) -> ShowtimeRepositoryError {
    match failure.into() {
        StoreFailure::Connection(message) => ShowtimeRepositoryError::connection(message),
        StoreFailure::OverlapViolation => ShowtimeRepositoryError::overlap(theater),
        StoreFailure::UniqueViolation { constraint } => ShowtimeRepositoryError::query(format!(
            "unexpected unique violation on {}",
            constraint.as_deref().unwrap_or("showtimes")
        )),
        StoreFailure::Query(message) => ShowtimeRepositoryError::query(message),
    }
}

fn map_write_error(error: WriteError, theater: &str) -> ShowtimeRepositoryError {
    match error {
        WriteError::Overlap => ShowtimeRepositoryError::overlap(theater),
        WriteError::Rejected(err) => err,
        WriteError::Diesel(err) => map_failure(err, theater),
    }
}

fn row_to_showtime(row: ShowtimeRow) -> Result<Showtime, ShowtimeRepositoryError> {
    let ShowtimeRow {
        id,
        movie_id,
        theater,
        start_time,
        end_time,
        price,
    } = row;
    Showtime::new(
        ShowtimeId::new(id),
        ShowtimeDraft {
            movie_id: MovieId::new(movie_id),
            theater,
            start_time,
            end_time,
            price,
        },
    )
    .map_err(|err| ShowtimeRepositoryError::query(format!("invalid showtime row {id}: {err}")))
}

async fn lock_theater(
    conn: &mut AsyncPgConnection,
    theater: &str,
) -> Result<(), diesel::result::Error> {
    diesel::sql_query("SELECT pg_advisory_xact_lock(hashtext($1))")
        .bind::<Text, _>(theater)
        .execute(conn)
        .await?;
    Ok(())
}

async fn load_overlapping(
    conn: &mut AsyncPgConnection,
    theater: &str,
    window: &ScreeningWindow,
    exclude: Option<ShowtimeId>,
) -> Result<Vec<ShowtimeRow>, diesel::result::Error> {
    let mut query = showtimes::table
        .filter(showtimes::theater.eq(theater))
        .filter(showtimes::start_time.le(window.end()))
        .filter(showtimes::end_time.ge(window.start()))
        .select(ShowtimeRow::as_select())
        .into_boxed();
    if let Some(id) = exclude {
        query = query.filter(showtimes::id.ne(id.get()));
    }
    query.order(showtimes::id.asc()).load(conn).await
}

#[async_trait]
impl ShowtimeRepository for DieselShowtimeRepository {
    async fn find_by_id(
        &self,
        id: ShowtimeId,
    ) -> Result<Option<Showtime>, ShowtimeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(|err| map_failure(err, ""))?;
        let row = showtimes::table
            .find(id.get())
            .select(ShowtimeRow::as_select())
            .first::<ShowtimeRow>(&mut conn)
            .await
            .optional()
            .map_err(|err| map_failure(err, ""))?;
        row.map(row_to_showtime).transpose()
    }

    async fn find_overlapping(
        &self,
        theater: &str,
        window: &ScreeningWindow,
        exclude: Option<ShowtimeId>,
    ) -> Result<Vec<Showtime>, ShowtimeRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_failure(err, theater))?;
        let rows = load_overlapping(&mut conn, theater, window, exclude)
            .await
            .map_err(|err| map_failure(err, theater))?;
        rows.into_iter().map(row_to_showtime).collect()
    }

    async fn insert(&self, draft: &ShowtimeDraft) -> Result<Showtime, ShowtimeRepositoryError> {
        let window = draft
            .validate()
            .map_err(|err| ShowtimeRepositoryError::query(err.to_string()))?;
        let theater = draft.theater.as_str();
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_failure(err, theater))?;
        let new_row = NewShowtimeRow {
            movie_id: draft.movie_id.get(),
            theater,
            start_time: draft.start_time,
            end_time: draft.end_time,
            price: draft.price,
        };

        let row = conn
            .transaction(|conn| {
                async move {
                    lock_theater(conn, theater).await?;
                    if !load_overlapping(conn, theater, &window, None)
                        .await?
                        .is_empty()
                    {
                        return Err(WriteError::Overlap);
                    }
                    let row = diesel::insert_into(showtimes::table)
                        .values(&new_row)
                        .returning(ShowtimeRow::as_returning())
                        .get_result(conn)
                        .await?;
                    Ok::<_, WriteError>(row)
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| map_write_error(err, theater))?;
        row_to_showtime(row)
    }

    async fn update(
        &self,
        id: ShowtimeId,
        update: &ShowtimeUpdate,
    ) -> Result<Option<Showtime>, ShowtimeRepositoryError> {
        let theater_hint = update.theater.as_deref().unwrap_or_default();
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_failure(err, theater_hint))?;

        conn.transaction(|conn| {
            async move {
                let Some(row) = showtimes::table
                    .find(id.get())
                    .select(ShowtimeRow::as_select())
                    .for_update()
                    .first::<ShowtimeRow>(conn)
                    .await
                    .optional()?
                else {
                    return Ok(None);
                };
                let current = row_to_showtime(row).map_err(WriteError::Rejected)?;
                let next = current.apply(update).map_err(|reason| {
                    WriteError::Rejected(ShowtimeRepositoryError::invalid(reason))
                })?;

                if update.touches_schedule() {
                    lock_theater(conn, next.theater()).await?;
                    if !load_overlapping(conn, next.theater(), &next.window(), Some(id))
                        .await?
                        .is_empty()
                    {
                        return Err(WriteError::Rejected(ShowtimeRepositoryError::overlap(
                            next.theater(),
                        )));
                    }
                }

                let changes = ShowtimeChangeset {
                    movie_id: next.movie_id().get(),
                    theater: next.theater(),
                    start_time: next.start_time(),
                    end_time: next.end_time(),
                    price: next.price(),
                };
                diesel::update(showtimes::table.find(id.get()))
                    .set(&changes)
                    .execute(conn)
                    .await?;
                Ok::<_, WriteError>(Some(next))
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| map_write_error(err, theater_hint))
    }

    async fn delete(&self, id: ShowtimeId) -> Result<bool, ShowtimeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(|err| map_failure(err, ""))?;
        let affected = diesel::delete(showtimes::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(|err| map_failure(err, ""))?;
        Ok(affected > 0)
    }
}
