//! Driving port for the movie catalog.

use async_trait::async_trait;

use crate::domain::{Error, Movie, MovieDraft, MovieId, MovieUpdate};

/// Catalog use cases: movie records keyed by unique title.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MovieCatalog: Send + Sync {
    /// Validate and insert a new movie; `Conflict` when the title is taken.
    async fn create(&self, draft: MovieDraft) -> Result<Movie, Error>;

    /// Resolve a movie by exact title; `NotFound` when absent.
    async fn find_by_title(&self, title: &str) -> Result<Movie, Error>;

    /// Resolve a movie by identifier; `NotFound` when absent.
    async fn find_by_id(&self, id: MovieId) -> Result<Movie, Error>;

    /// Apply the provided fields to the movie titled `title`.
    async fn update(&self, title: &str, update: MovieUpdate) -> Result<(), Error>;

    /// Delete the movie titled `title`.
    async fn remove(&self, title: &str) -> Result<(), Error>;

    /// Every movie in the catalog.
    async fn list(&self) -> Result<Vec<Movie>, Error>;
}
