//! Movie catalog service.
//!
//! Implements [`MovieCatalog`] over a [`MovieRepository`]. Title uniqueness is
//! pre-checked here for a friendly error and enforced again by the adapter.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ports::{MovieCatalog, MovieRepository, MovieRepositoryError};
use crate::domain::{Error, Movie, MovieDraft, MovieId, MovieUpdate, OperationDeadline};

fn map_repository_error(error: MovieRepositoryError) -> Error {
    match error {
        MovieRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("movie repository unavailable: {message}"))
        }
        MovieRepositoryError::Query { message } => {
            Error::internal(format!("movie repository error: {message}"))
        }
        MovieRepositoryError::DuplicateTitle { title } => duplicate_title(&title),
    }
}

fn duplicate_title(title: &str) -> Error {
    Error::conflict(format!("Movie with title {title} already exists"))
}

fn title_not_found(title: &str) -> Error {
    Error::not_found(format!("Movie with title {title} not found"))
}

/// Catalog service backed by a movie repository.
#[derive(Clone)]
pub struct CatalogService<R> {
    movie_repo: Arc<R>,
    deadline: OperationDeadline,
}

impl<R> CatalogService<R> {
    /// Create a catalog service without an operation deadline.
    pub fn new(movie_repo: Arc<R>) -> Self {
        Self {
            movie_repo,
            deadline: OperationDeadline::unbounded(),
        }
    }

    /// Bound every operation by `deadline`.
    pub fn with_deadline(mut self, deadline: OperationDeadline) -> Self {
        self.deadline = deadline;
        self
    }
}

impl<R> CatalogService<R>
where
    R: MovieRepository,
{
    async fn require_by_title(&self, title: &str) -> Result<Movie, Error> {
        self.movie_repo
            .find_by_title(title)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| title_not_found(title))
    }

    async fn create_movie(&self, draft: MovieDraft) -> Result<Movie, Error> {
        draft.validate()?;

        let existing = self
            .movie_repo
            .find_by_title(&draft.title)
            .await
            .map_err(map_repository_error)?;
        if existing.is_some() {
            warn!(title = %draft.title, "rejected duplicate movie title");
            return Err(duplicate_title(&draft.title));
        }

        let movie = self
            .movie_repo
            .insert(&draft)
            .await
            .map_err(map_repository_error)?;
        info!(movie_id = %movie.id(), title = movie.title(), "movie created");
        Ok(movie)
    }

    async fn update_movie(&self, title: &str, update: MovieUpdate) -> Result<(), Error> {
        let current = self.require_by_title(title).await?;
        if update.is_empty() {
            return Ok(());
        }
        let next = current.apply(&update)?;

        if next.title() != current.title() {
            let clash = self
                .movie_repo
                .find_by_title(next.title())
                .await
                .map_err(map_repository_error)?;
            if clash.is_some_and(|other| other.id() != current.id()) {
                warn!(title, new_title = next.title(), "rejected rename onto taken title");
                return Err(duplicate_title(next.title()));
            }
        }

        let stored = self
            .movie_repo
            .update(current.id(), &update)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| title_not_found(title))?;
        info!(movie_id = %stored.id(), title = stored.title(), "movie updated");
        Ok(())
    }

    async fn remove_movie(&self, title: &str) -> Result<(), Error> {
        let movie = self.require_by_title(title).await?;
        let deleted = self
            .movie_repo
            .delete(movie.id())
            .await
            .map_err(map_repository_error)?;
        if !deleted {
            return Err(title_not_found(title));
        }
        info!(movie_id = %movie.id(), title, "movie removed");
        Ok(())
    }
}

#[async_trait]
impl<R> MovieCatalog for CatalogService<R>
where
    R: MovieRepository,
{
    async fn create(&self, draft: MovieDraft) -> Result<Movie, Error> {
        self.deadline
            .run("create movie", self.create_movie(draft))
            .await
    }

    async fn find_by_title(&self, title: &str) -> Result<Movie, Error> {
        self.deadline
            .run("find movie", self.require_by_title(title))
            .await
    }

    async fn find_by_id(&self, id: MovieId) -> Result<Movie, Error> {
        self.deadline
            .run("find movie", async {
                self.movie_repo
                    .find_by_id(id)
                    .await
                    .map_err(map_repository_error)?
                    .ok_or_else(|| Error::not_found(format!("Movie with ID {id} not found")))
            })
            .await
    }

    async fn update(&self, title: &str, update: MovieUpdate) -> Result<(), Error> {
        self.deadline
            .run("update movie", self.update_movie(title, update))
            .await
    }

    async fn remove(&self, title: &str) -> Result<(), Error> {
        self.deadline
            .run("remove movie", self.remove_movie(title))
            .await
    }

    async fn list(&self) -> Result<Vec<Movie>, Error> {
        self.deadline
            .run("list movies", async {
                self.movie_repo.list().await.map_err(map_repository_error)
            })
            .await
    }
}

#[cfg(test)]
#[path = "catalog_service_tests.rs"]
mod tests;
