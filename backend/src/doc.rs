//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every catalog, scheduling, booking and health
//! endpoint together with the domain schemas they exchange. The document
//! backs Swagger UI in debug builds.

use utoipa::OpenApi;

use crate::domain::{Booking, Error, ErrorCode, Movie, Showtime};
use crate::inbound::http::bookings::{CreateBookingRequest, CreateBookingResponse};
use crate::inbound::http::movies::{CreateMovieRequest, UpdateMovieRequest};
use crate::inbound::http::showtimes::{CreateShowtimeRequest, UpdateShowtimeRequest};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Cinema backend API",
        description = "Movie catalog, showtime scheduling and seat booking."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::movies::list_movies,
        crate::inbound::http::movies::create_movie,
        crate::inbound::http::movies::update_movie,
        crate::inbound::http::movies::delete_movie,
        crate::inbound::http::showtimes::get_showtime,
        crate::inbound::http::showtimes::create_showtime,
        crate::inbound::http::showtimes::update_showtime,
        crate::inbound::http::showtimes::delete_showtime,
        crate::inbound::http::bookings::create_booking,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Movie,
        Showtime,
        Booking,
        Error,
        ErrorCode,
        CreateMovieRequest,
        UpdateMovieRequest,
        CreateShowtimeRequest,
        UpdateShowtimeRequest,
        CreateBookingRequest,
        CreateBookingResponse,
    )),
    tags(
        (name = "movies", description = "Movie catalog keyed by title"),
        (name = "showtimes", description = "Showtimes with per-theater overlap checks"),
        (name = "bookings", description = "Seat reservations"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    use super::*;

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case("/movies/all")]
    #[case("/movies")]
    #[case("/movies/update/{movieTitle}")]
    #[case("/movies/{movieTitle}")]
    #[case("/showtimes")]
    #[case("/showtimes/{showtimeId}")]
    #[case("/showtimes/update/{showtimeId}")]
    #[case("/bookings")]
    #[case("/health/ready")]
    fn document_lists_every_route(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing path {path}");
    }

    #[rstest]
    #[case("Error", "code")]
    #[case("Error", "message")]
    #[case("Movie", "duration")]
    #[case("Movie", "releaseYear")]
    #[case("Showtime", "startTime")]
    fn schemas_use_wire_field_names(#[case] schema: &str, #[case] field: &str) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let found = schemas.get(schema).expect("schema registered");
        assert_object_schema_has_field(found, field);
    }
}
