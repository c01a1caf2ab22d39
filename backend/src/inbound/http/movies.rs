//! Movie catalog HTTP handlers.
//!
//! ```text
//! GET    /movies/all
//! POST   /movies
//! POST   /movies/update/{movieTitle}
//! DELETE /movies/{movieTitle}
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, Movie, MovieDraft, MovieUpdate};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Request payload for adding a movie to the catalog.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateMovieRequest {
    #[schema(example = "Inception")]
    pub title: String,
    #[schema(example = "Sci-Fi")]
    pub genre: String,
    /// Running time in minutes.
    #[schema(example = 148)]
    pub duration: i32,
    #[schema(example = 8.8)]
    pub rating: f64,
    #[schema(example = 2010)]
    pub release_year: i32,
}

impl From<CreateMovieRequest> for MovieDraft {
    fn from(value: CreateMovieRequest) -> Self {
        Self {
            title: value.title,
            genre: value.genre,
            duration_minutes: value.duration,
            rating: value.rating,
            release_year: value.release_year,
        }
    }
}

/// Partial movie update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateMovieRequest {
    pub title: Option<String>,
    pub genre: Option<String>,
    pub duration: Option<i32>,
    pub rating: Option<f64>,
    pub release_year: Option<i32>,
}

impl From<UpdateMovieRequest> for MovieUpdate {
    fn from(value: UpdateMovieRequest) -> Self {
        Self {
            title: value.title,
            genre: value.genre,
            duration_minutes: value.duration,
            rating: value.rating,
            release_year: value.release_year,
        }
    }
}

/// List every movie in the catalog.
#[utoipa::path(
    get,
    path = "/movies/all",
    responses(
        (status = 200, description = "All movies", body = [Movie]),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["movies"],
    operation_id = "listMovies"
)]
#[get("/movies/all")]
pub async fn list_movies(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Movie>>> {
    let movies = state.catalog.list().await?;
    Ok(web::Json(movies))
}

/// Add a movie to the catalog.
///
/// # Examples
/// ```no_run
/// use actix_web::web;
/// use cinema_backend::inbound::http::ApiResult;
/// use cinema_backend::inbound::http::movies::{CreateMovieRequest, create_movie};
/// use cinema_backend::inbound::http::state::HttpState;
///
/// async fn call_handler(state: web::Data<HttpState>) -> ApiResult<()> {
///     let payload = web::Json(CreateMovieRequest {
///         title: "Inception".to_owned(),
///         genre: "Sci-Fi".to_owned(),
///         duration: 148,
///         rating: 8.8,
///         release_year: 2010,
///     });
///     let movie = create_movie(state, payload).await?;
///     assert_eq!(movie.title(), "Inception");
///     Ok(())
/// }
/// ```
#[utoipa::path(
    post,
    path = "/movies",
    request_body = CreateMovieRequest,
    responses(
        (status = 200, description = "Movie created", body = Movie),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Title already exists", body = Error)
    ),
    tags = ["movies"],
    operation_id = "createMovie"
)]
#[post("/movies")]
pub async fn create_movie(
    state: web::Data<HttpState>,
    payload: web::Json<CreateMovieRequest>,
) -> ApiResult<web::Json<Movie>> {
    let movie = state.catalog.create(payload.into_inner().into()).await?;
    Ok(web::Json(movie))
}

/// Apply a partial update to the movie with the given title.
#[utoipa::path(
    post,
    path = "/movies/update/{movieTitle}",
    params(("movieTitle" = String, Path, description = "Current title of the movie")),
    request_body = UpdateMovieRequest,
    responses(
        (status = 200, description = "Movie updated"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Movie not found", body = Error),
        (status = 409, description = "New title already exists", body = Error)
    ),
    tags = ["movies"],
    operation_id = "updateMovie"
)]
#[post("/movies/update/{movieTitle}")]
pub async fn update_movie(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateMovieRequest>,
) -> ApiResult<HttpResponse> {
    let title = path.into_inner();
    state
        .catalog
        .update(&title, payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Ok().finish())
}

/// Remove the movie with the given title.
#[utoipa::path(
    delete,
    path = "/movies/{movieTitle}",
    params(("movieTitle" = String, Path, description = "Title of the movie")),
    responses(
        (status = 200, description = "Movie removed"),
        (status = 404, description = "Movie not found", body = Error)
    ),
    tags = ["movies"],
    operation_id = "deleteMovie"
)]
#[delete("/movies/{movieTitle}")]
pub async fn delete_movie(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    state.catalog.remove(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().finish())
}

#[cfg(test)]
#[path = "movies_tests.rs"]
mod tests;
