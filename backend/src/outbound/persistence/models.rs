//! Diesel row structs for the cinema tables.
//!
//! Internal to the persistence layer; conversion into domain types goes
//! through the validating domain constructors.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{bookings, movies, showtimes};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = movies)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MovieRow {
    pub id: i64,
    pub title: String,
    pub genre: String,
    pub duration_minutes: i32,
    pub rating: f64,
    pub release_year: i32,
}

/// Insertable struct for new movies; the id comes from the sequence.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = movies)]
pub(crate) struct NewMovieRow<'a> {
    pub title: &'a str,
    pub genre: &'a str,
    pub duration_minutes: i32,
    pub rating: f64,
    pub release_year: i32,
}

/// Partial movie update; `None` columns are left out of the `SET` clause.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = movies)]
pub(crate) struct MovieChangeset<'a> {
    pub title: Option<&'a str>,
    pub genre: Option<&'a str>,
    pub duration_minutes: Option<i32>,
    pub rating: Option<f64>,
    pub release_year: Option<i32>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = showtimes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ShowtimeRow {
    pub id: i64,
    pub movie_id: i64,
    pub theater: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub price: f64,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = showtimes)]
pub(crate) struct NewShowtimeRow<'a> {
    pub movie_id: i64,
    pub theater: &'a str,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub price: f64,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = showtimes)]
pub(crate) struct ShowtimeChangeset<'a> {
    pub movie_id: i64,
    pub theater: &'a str,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub price: f64,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = bookings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BookingRow {
    pub id: Uuid,
    pub showtime_id: i64,
    pub seat_number: i32,
    pub user_id: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = bookings)]
pub(crate) struct NewBookingRow<'a> {
    pub id: Uuid,
    pub showtime_id: i64,
    pub seat_number: i32,
    pub user_id: &'a str,
}
