//! HTTP inbound adapter exposing REST endpoints.

use actix_web::web;

pub mod bookings;
pub mod error;
pub mod health;
pub mod movies;
pub mod showtimes;
pub mod state;
pub mod validation;

pub use error::ApiResult;

/// Register the catalog, scheduling and booking routes together with the
/// shared JSON extractor configuration.
///
/// Callers provide `web::Data<HttpState>` as application data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(validation::json_config())
        .service(movies::list_movies)
        .service(movies::create_movie)
        .service(movies::update_movie)
        .service(movies::delete_movie)
        .service(showtimes::get_showtime)
        .service(showtimes::create_showtime)
        .service(showtimes::update_showtime)
        .service(showtimes::delete_showtime)
        .service(bookings::create_booking);
}
