//! Port for movie persistence.

use async_trait::async_trait;

use crate::domain::{Movie, MovieDraft, MovieId, MovieUpdate};

use super::define_port_error;

define_port_error! {
    /// Errors raised by movie repository adapters.
    pub enum MovieRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "movie repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "movie repository query failed: {message}",
        /// Another movie already uses the title.
        DuplicateTitle { title: String } =>
            "movie title already exists: {title}",
    }
}

/// Port for reading and writing movie records.
///
/// Implementations enforce title uniqueness atomically, so a concurrent
/// insert or rename onto a taken title fails with
/// [`MovieRepositoryError::DuplicateTitle`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MovieRepository: Send + Sync {
    /// Insert a validated draft and return the stored record.
    async fn insert(&self, draft: &MovieDraft) -> Result<Movie, MovieRepositoryError>;

    /// Look up a movie by exact title.
    async fn find_by_title(&self, title: &str) -> Result<Option<Movie>, MovieRepositoryError>;

    /// Look up a movie by identifier.
    async fn find_by_id(&self, id: MovieId) -> Result<Option<Movie>, MovieRepositoryError>;

    /// Write only the fields present in `update` and return the stored
    /// record.
    ///
    /// Fields absent from `update` keep whatever value the row holds at
    /// write time. Returns `None` when the row no longer exists.
    async fn update(
        &self,
        id: MovieId,
        update: &MovieUpdate,
    ) -> Result<Option<Movie>, MovieRepositoryError>;

    /// Delete a movie, returning `false` when it was already gone.
    async fn delete(&self, id: MovieId) -> Result<bool, MovieRepositoryError>;

    /// Every movie in identifier order.
    async fn list(&self) -> Result<Vec<Movie>, MovieRepositoryError>;
}
