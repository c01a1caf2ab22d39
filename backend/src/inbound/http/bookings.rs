//! Seat booking HTTP handler.
//!
//! ```text
//! POST /bookings
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{BookingDraft, BookingId, Error, ShowtimeId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Request payload for booking a seat.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateBookingRequest {
    #[schema(example = 1)]
    pub showtime_id: i64,
    #[schema(example = 15, minimum = 1)]
    pub seat_number: i32,
    #[schema(example = "84438967-a5a0-4e4b-8f6e-2f2b0bd8e4b1")]
    pub user_id: String,
}

impl From<CreateBookingRequest> for BookingDraft {
    fn from(value: CreateBookingRequest) -> Self {
        Self {
            showtime_id: ShowtimeId::new(value.showtime_id),
            seat_number: value.seat_number,
            user_id: value.user_id,
        }
    }
}

/// Response payload for a confirmed booking.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingResponse {
    #[schema(value_type = String, format = Uuid)]
    pub booking_id: BookingId,
}

/// Reserve a seat for a showtime.
///
/// # Examples
/// ```no_run
/// use actix_web::web;
/// use cinema_backend::inbound::http::ApiResult;
/// use cinema_backend::inbound::http::bookings::{CreateBookingRequest, create_booking};
/// use cinema_backend::inbound::http::state::HttpState;
///
/// async fn call_handler(state: web::Data<HttpState>) -> ApiResult<()> {
///     let payload = web::Json(CreateBookingRequest {
///         showtime_id: 1,
///         seat_number: 15,
///         user_id: "84438967-a5a0-4e4b-8f6e-2f2b0bd8e4b1".to_owned(),
///     });
///     let response = create_booking(state, payload).await?;
///     println!("{}", response.booking_id);
///     Ok(())
/// }
/// ```
#[utoipa::path(
    post,
    path = "/bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 200, description = "Seat booked", body = CreateBookingResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Showtime not found", body = Error),
        (status = 409, description = "Seat already booked", body = Error)
    ),
    tags = ["bookings"],
    operation_id = "createBooking"
)]
#[post("/bookings")]
pub async fn create_booking(
    state: web::Data<HttpState>,
    payload: web::Json<CreateBookingRequest>,
) -> ApiResult<web::Json<CreateBookingResponse>> {
    let booking = state.ledger.create(payload.into_inner().into()).await?;
    Ok(web::Json(CreateBookingResponse {
        booking_id: booking.id(),
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use mockall::predicate::eq;
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::ports::{MockBookingLedger, MockMovieCatalog, MockShowtimeSchedule};
    use crate::domain::Booking;
    use crate::inbound::http::validation::json_config;

    fn state_with(ledger: MockBookingLedger) -> HttpState {
        HttpState::new(
            Arc::new(MockMovieCatalog::new()),
            Arc::new(MockShowtimeSchedule::new()),
            Arc::new(ledger),
        )
    }

    fn draft() -> BookingDraft {
        BookingDraft {
            showtime_id: ShowtimeId::new(1),
            seat_number: 15,
            user_id: "user-1".to_owned(),
        }
    }

    async fn post_booking(ledger: MockBookingLedger, body: Value) -> (StatusCode, Value) {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(ledger)))
                .app_data(json_config())
                .service(create_booking),
        )
        .await;
        let request = actix_test::TestRequest::post()
            .uri("/bookings")
            .set_json(body)
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        let status = response.status();
        (status, actix_test::read_body_json(response).await)
    }

    #[actix_web::test]
    async fn returns_the_new_booking_id() {
        let booking = Booking::new(BookingId::random(), draft()).expect("valid booking");
        let expected = booking.id().to_string();
        let mut ledger = MockBookingLedger::new();
        ledger
            .expect_create()
            .with(eq(draft()))
            .times(1)
            .return_once(move |_| Ok(booking));

        let (status, body) = post_booking(
            ledger,
            json!({"showtimeId": 1, "seatNumber": 15, "userId": "user-1"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"bookingId": expected}));
    }

    #[actix_web::test]
    async fn taken_seat_is_a_conflict() {
        let mut ledger = MockBookingLedger::new();
        ledger.expect_create().times(1).return_once(|_| {
            Err(Error::conflict(
                "Seat 15 is already booked for this showtime",
            ))
        });

        let (status, body) = post_booking(
            ledger,
            json!({"showtimeId": 1, "seatNumber": 15, "userId": "user-1"}),
        )
        .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "conflict");
    }

    #[actix_web::test]
    async fn unknown_fields_are_rejected_before_the_ledger() {
        let mut ledger = MockBookingLedger::new();
        ledger.expect_create().times(0);

        let (status, body) = post_booking(
            ledger,
            json!({"showtimeId": 1, "seatNumber": 15, "userId": "u", "vip": true}),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "invalid_request");
    }
}
