//! Showtime scheduling HTTP handlers.
//!
//! ```text
//! GET    /showtimes/{showtimeId}
//! POST   /showtimes
//! POST   /showtimes/update/{showtimeId}
//! DELETE /showtimes/{showtimeId}
//! ```
//!
//! Timestamps travel as RFC 3339 strings and are normalised to UTC before
//! they reach the scheduler.

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, MovieId, Showtime, ShowtimeDraft, ShowtimeId, ShowtimeUpdate};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_id, parse_optional_rfc3339_timestamp, parse_rfc3339_timestamp,
};

const SHOWTIME_ID: FieldName = FieldName::new("showtimeId");

/// Request payload for scheduling a showtime.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateShowtimeRequest {
    #[schema(example = 1)]
    pub movie_id: i64,
    #[schema(example = "Theater 1")]
    pub theater: String,
    #[schema(format = "date-time", example = "2025-02-14T11:47:46.089Z")]
    pub start_time: String,
    #[schema(format = "date-time", example = "2025-02-14T14:47:46.089Z")]
    pub end_time: String,
    #[schema(example = 50.2)]
    pub price: f64,
}

/// Partial showtime update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateShowtimeRequest {
    pub movie_id: Option<i64>,
    pub theater: Option<String>,
    #[schema(format = "date-time")]
    pub start_time: Option<String>,
    #[schema(format = "date-time")]
    pub end_time: Option<String>,
    pub price: Option<f64>,
}

fn parse_create_request(payload: CreateShowtimeRequest) -> Result<ShowtimeDraft, Error> {
    Ok(ShowtimeDraft {
        movie_id: MovieId::new(payload.movie_id),
        theater: payload.theater,
        start_time: parse_rfc3339_timestamp(payload.start_time, FieldName::new("startTime"))?,
        end_time: parse_rfc3339_timestamp(payload.end_time, FieldName::new("endTime"))?,
        price: payload.price,
    })
}

fn parse_update_request(payload: UpdateShowtimeRequest) -> Result<ShowtimeUpdate, Error> {
    Ok(ShowtimeUpdate {
        movie_id: payload.movie_id.map(MovieId::new),
        theater: payload.theater,
        start_time: parse_optional_rfc3339_timestamp(
            payload.start_time,
            FieldName::new("startTime"),
        )?,
        end_time: parse_optional_rfc3339_timestamp(payload.end_time, FieldName::new("endTime"))?,
        price: payload.price,
    })
}

fn showtime_id(raw: &str) -> Result<ShowtimeId, Error> {
    parse_id(raw, SHOWTIME_ID).map(ShowtimeId::new)
}

/// Fetch a single showtime.
#[utoipa::path(
    get,
    path = "/showtimes/{showtimeId}",
    params(("showtimeId" = i64, Path, description = "Showtime identifier")),
    responses(
        (status = 200, description = "Showtime", body = Showtime),
        (status = 400, description = "Invalid identifier", body = Error),
        (status = 404, description = "Showtime not found", body = Error)
    ),
    tags = ["showtimes"],
    operation_id = "getShowtime"
)]
#[get("/showtimes/{showtimeId}")]
pub async fn get_showtime(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Showtime>> {
    let id = showtime_id(&path.into_inner())?;
    let showtime = state.schedule.find_one(id).await?;
    Ok(web::Json(showtime))
}

/// Schedule a showtime for an existing movie.
///
/// Rejected with 400 when the theater already has a showtime whose closed
/// time range intersects the requested one.
#[utoipa::path(
    post,
    path = "/showtimes",
    request_body = CreateShowtimeRequest,
    responses(
        (status = 200, description = "Showtime scheduled", body = Showtime),
        (status = 400, description = "Invalid request or overlapping showtime", body = Error),
        (status = 404, description = "Movie not found", body = Error)
    ),
    tags = ["showtimes"],
    operation_id = "createShowtime"
)]
#[post("/showtimes")]
pub async fn create_showtime(
    state: web::Data<HttpState>,
    payload: web::Json<CreateShowtimeRequest>,
) -> ApiResult<web::Json<Showtime>> {
    let draft = parse_create_request(payload.into_inner())?;
    let showtime = state.schedule.create(draft).await?;
    Ok(web::Json(showtime))
}

/// Apply a partial update to a showtime.
#[utoipa::path(
    post,
    path = "/showtimes/update/{showtimeId}",
    params(("showtimeId" = i64, Path, description = "Showtime identifier")),
    request_body = UpdateShowtimeRequest,
    responses(
        (status = 200, description = "Showtime updated"),
        (status = 400, description = "Invalid request or overlapping showtime", body = Error),
        (status = 404, description = "Showtime or movie not found", body = Error)
    ),
    tags = ["showtimes"],
    operation_id = "updateShowtime"
)]
#[post("/showtimes/update/{showtimeId}")]
pub async fn update_showtime(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateShowtimeRequest>,
) -> ApiResult<HttpResponse> {
    let id = showtime_id(&path.into_inner())?;
    let update = parse_update_request(payload.into_inner())?;
    state.schedule.update(id, update).await?;
    Ok(HttpResponse::Ok().finish())
}

/// Delete a showtime. Bookings referencing it are left in place.
#[utoipa::path(
    delete,
    path = "/showtimes/{showtimeId}",
    params(("showtimeId" = i64, Path, description = "Showtime identifier")),
    responses(
        (status = 200, description = "Showtime deleted"),
        (status = 400, description = "Invalid identifier", body = Error),
        (status = 404, description = "Showtime not found", body = Error)
    ),
    tags = ["showtimes"],
    operation_id = "deleteShowtime"
)]
#[delete("/showtimes/{showtimeId}")]
pub async fn delete_showtime(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = showtime_id(&path.into_inner())?;
    state.schedule.delete(id).await?;
    Ok(HttpResponse::Ok().finish())
}

#[cfg(test)]
#[path = "showtimes_tests.rs"]
mod tests;
