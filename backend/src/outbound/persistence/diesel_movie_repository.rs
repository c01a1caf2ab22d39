//! PostgreSQL-backed `MovieRepository` implementation using Diesel ORM.
//!
//! Title uniqueness is enforced by the `movies_title_key` constraint, so a
//! racing insert or rename surfaces as `DuplicateTitle`. Updates set only the
//! provided columns in a single statement, so concurrent partial updates of
//! different fields both survive.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{MovieRepository, MovieRepositoryError};
use crate::domain::{Movie, MovieDraft, MovieId, MovieUpdate};

use super::diesel_error_mapping::StoreFailure;
use super::models::{MovieChangeset, MovieRow, NewMovieRow};
use super::pool::DbPool;
use super::schema::movies;

/// Diesel-backed implementation of the movie repository port.
#[derive(Clone)]
pub struct DieselMovieRepository {
    pool: DbPool,
}

impl DieselMovieRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: impl Into<StoreFailure>, title: &str) -> MovieRepositoryError {
    match failure.into() {
        StoreFailure::Connection(message) => MovieRepositoryError::connection(message),
        StoreFailure::UniqueViolation { .. } => MovieRepositoryError::duplicate_title(title),
        StoreFailure::OverlapViolation => {
            MovieRepositoryError::query("unexpected exclusion violation on movies")
        }
        StoreFailure::Query(message) => MovieRepositoryError::query(message),
    }
}

fn map_read_failure(failure: impl Into<StoreFailure>) -> MovieRepositoryError {
    map_failure(failure, "")
}

fn row_to_movie(row: MovieRow) -> Result<Movie, MovieRepositoryError> {
    let MovieRow {
        id,
        title,
        genre,
        duration_minutes,
        rating,
        release_year,
    } = row;
    Movie::new(
        MovieId::new(id),
        MovieDraft {
            title,
            genre,
            duration_minutes,
            rating,
            release_year,
        },
    )
    .map_err(|err| MovieRepositoryError::query(format!("invalid movie row {id}: {err}")))
}

#[async_trait]
impl MovieRepository for DieselMovieRepository {
    async fn insert(&self, draft: &MovieDraft) -> Result<Movie, MovieRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_read_failure)?;
        let new_row = NewMovieRow {
            title: draft.title.as_str(),
            genre: draft.genre.as_str(),
            duration_minutes: draft.duration_minutes,
            rating: draft.rating,
            release_year: draft.release_year,
        };

        let row: MovieRow = diesel::insert_into(movies::table)
            .values(&new_row)
            .returning(MovieRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_failure(err, &draft.title))?;
        row_to_movie(row)
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<Movie>, MovieRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_read_failure)?;
        let row = movies::table
            .filter(movies::title.eq(title))
            .select(MovieRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read_failure)?;
        row.map(row_to_movie).transpose()
    }

    async fn find_by_id(&self, id: MovieId) -> Result<Option<Movie>, MovieRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_read_failure)?;
        let row = movies::table
            .find(id.get())
            .select(MovieRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read_failure)?;
        row.map(row_to_movie).transpose()
    }

    async fn update(
        &self,
        id: MovieId,
        update: &MovieUpdate,
    ) -> Result<Option<Movie>, MovieRepositoryError> {
        if update.is_empty() {
            return self.find_by_id(id).await;
        }
        update
            .validate()
            .map_err(|err| MovieRepositoryError::query(err.to_string()))?;
        let title = update.title.as_deref().unwrap_or_default();
        let mut conn = self.pool.get().await.map_err(map_read_failure)?;
        let changes = MovieChangeset {
            title: update.title.as_deref(),
            genre: update.genre.as_deref(),
            duration_minutes: update.duration_minutes,
            rating: update.rating,
            release_year: update.release_year,
        };

        let row = diesel::update(movies::table.find(id.get()))
            .set(&changes)
            .returning(MovieRow::as_returning())
            .get_result::<MovieRow>(&mut conn)
            .await
            .optional()
            .map_err(|err| map_failure(err, title))?;
        row.map(row_to_movie).transpose()
    }

    async fn delete(&self, id: MovieId) -> Result<bool, MovieRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_read_failure)?;
        let affected = diesel::delete(movies::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_read_failure)?;
        Ok(affected > 0)
    }

    async fn list(&self) -> Result<Vec<Movie>, MovieRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_read_failure)?;
        let rows: Vec<MovieRow> = movies::table
            .order(movies::id.asc())
            .select(MovieRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_read_failure)?;
        rows.into_iter().map(row_to_movie).collect()
    }
}
