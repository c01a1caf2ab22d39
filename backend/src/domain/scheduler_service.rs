//! Showtime scheduler service.
//!
//! Implements [`ShowtimeSchedule`]. Movie references are resolved through a
//! [`MovieCatalog`] handle rather than the movie table, and the overlap check
//! runs twice: once here for an early rejection and once inside the adapter's
//! write transaction.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ports::{
    MovieCatalog, ShowtimeRepository, ShowtimeRepositoryError, ShowtimeSchedule,
};
use crate::domain::{
    Error, OperationDeadline, ScreeningWindow, Showtime, ShowtimeDraft, ShowtimeId,
    ShowtimeUpdate,
};

const OVERLAP_MESSAGE: &str = "Show time overlaps with another show time";

fn map_repository_error(error: ShowtimeRepositoryError) -> Error {
    match error {
        ShowtimeRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("showtime repository unavailable: {message}"))
        }
        ShowtimeRepositoryError::Query { message } => {
            Error::internal(format!("showtime repository error: {message}"))
        }
        ShowtimeRepositoryError::Overlap { .. } => Error::overlap(OVERLAP_MESSAGE),
        ShowtimeRepositoryError::Invalid { reason } => reason.into(),
    }
}

fn showtime_not_found(id: ShowtimeId) -> Error {
    Error::not_found(format!("Showtime with ID {id} not found"))
}

/// Scheduler service backed by a showtime repository and the movie catalog.
pub struct ShowtimeSchedulerService<R, C: ?Sized> {
    showtime_repo: Arc<R>,
    catalog: Arc<C>,
    deadline: OperationDeadline,
}

impl<R, C: ?Sized> Clone for ShowtimeSchedulerService<R, C> {
    fn clone(&self) -> Self {
        Self {
            showtime_repo: Arc::clone(&self.showtime_repo),
            catalog: Arc::clone(&self.catalog),
            deadline: self.deadline,
        }
    }
}

impl<R, C: ?Sized> ShowtimeSchedulerService<R, C> {
    /// Create a scheduler without an operation deadline.
    pub fn new(showtime_repo: Arc<R>, catalog: Arc<C>) -> Self {
        Self {
            showtime_repo,
            catalog,
            deadline: OperationDeadline::unbounded(),
        }
    }

    /// Bound every operation by `deadline`.
    pub fn with_deadline(mut self, deadline: OperationDeadline) -> Self {
        self.deadline = deadline;
        self
    }
}

impl<R, C> ShowtimeSchedulerService<R, C>
where
    R: ShowtimeRepository,
    C: MovieCatalog + ?Sized,
{
    async fn ensure_free(
        &self,
        theater: &str,
        window: &ScreeningWindow,
        exclude: Option<ShowtimeId>,
    ) -> Result<(), Error> {
        let clashes = self
            .showtime_repo
            .find_overlapping(theater, window, exclude)
            .await
            .map_err(map_repository_error)?;
        if let Some(clash) = clashes.first() {
            warn!(theater, conflicting_id = %clash.id(), "rejected overlapping showtime");
            return Err(Error::overlap(OVERLAP_MESSAGE));
        }
        Ok(())
    }

    async fn require(&self, id: ShowtimeId) -> Result<Showtime, Error> {
        self.showtime_repo
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| showtime_not_found(id))
    }

    async fn create_showtime(&self, draft: ShowtimeDraft) -> Result<Showtime, Error> {
        let window = draft.validate()?;
        self.catalog.find_by_id(draft.movie_id).await?;
        self.ensure_free(&draft.theater, &window, None).await?;

        let showtime = self
            .showtime_repo
            .insert(&draft)
            .await
            .map_err(map_repository_error)?;
        info!(
            showtime_id = %showtime.id(),
            theater = showtime.theater(),
            "showtime scheduled"
        );
        Ok(showtime)
    }

    async fn update_showtime(&self, id: ShowtimeId, update: ShowtimeUpdate) -> Result<(), Error> {
        let current = self.require(id).await?;
        if let Some(movie_id) = update.movie_id {
            self.catalog.find_by_id(movie_id).await?;
        }

        let next = current.apply(&update)?;
        if update.touches_schedule() {
            self.ensure_free(next.theater(), &next.window(), Some(id))
                .await?;
        }

        let stored = self
            .showtime_repo
            .update(id, &update)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| showtime_not_found(id))?;
        info!(
            showtime_id = %id,
            theater = stored.theater(),
            "showtime updated"
        );
        Ok(())
    }

    async fn delete_showtime(&self, id: ShowtimeId) -> Result<(), Error> {
        self.require(id).await?;
        let deleted = self
            .showtime_repo
            .delete(id)
            .await
            .map_err(map_repository_error)?;
        if !deleted {
            return Err(showtime_not_found(id));
        }
        info!(showtime_id = %id, "showtime deleted");
        Ok(())
    }
}

#[async_trait]
impl<R, C> ShowtimeSchedule for ShowtimeSchedulerService<R, C>
where
    R: ShowtimeRepository,
    C: MovieCatalog + ?Sized,
{
    async fn create(&self, draft: ShowtimeDraft) -> Result<Showtime, Error> {
        self.deadline
            .run("create showtime", self.create_showtime(draft))
            .await
    }

    async fn find_one(&self, id: ShowtimeId) -> Result<Showtime, Error> {
        self.deadline.run("find showtime", self.require(id)).await
    }

    async fn update(&self, id: ShowtimeId, update: ShowtimeUpdate) -> Result<(), Error> {
        self.deadline
            .run("update showtime", self.update_showtime(id, update))
            .await
    }

    async fn delete(&self, id: ShowtimeId) -> Result<(), Error> {
        self.deadline
            .run("delete showtime", self.delete_showtime(id))
            .await
    }
}

#[cfg(test)]
#[path = "scheduler_service_tests.rs"]
mod tests;
