//! Tests for HTTP error mapping.

use super::*;
use crate::domain::Error;
use actix_web::ResponseError;
use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[fixture]
fn internal_error_case(expected_trace_id: String) -> Error {
    Error::internal("connection string postgres://secret")
        .with_trace_id(expected_trace_id)
        .with_details(json!({"secret": "x"}))
}

#[fixture]
fn invalid_request_case(expected_trace_id: String) -> Error {
    Error::invalid_request("title must not be empty")
        .with_trace_id(expected_trace_id)
        .with_details(json!({"field": "title", "code": "empty"}))
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::overlap("Show time overlaps with another show time"), StatusCode::BAD_REQUEST)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::conflict("taken"), StatusCode::CONFLICT)]
#[case(Error::service_unavailable("down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] err: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&err), status);
}

async fn assert_error_response(
    error: Error,
    expected_status: StatusCode,
    expected_trace_id: Option<&str>,
) -> Value {
    let response = ResponseError::error_response(&error);
    assert_eq!(response.status(), expected_status);

    let header = response.headers().get(TRACE_ID_HEADER);
    match expected_trace_id {
        Some(expected) => {
            let trace_id = header
                .expect("trace-id header is set by error_response")
                .to_str()
                .expect("trace-id is valid UTF-8");
            assert_eq!(trace_id, expected);
        }
        None => assert!(header.is_none(), "trace-id header should not be present"),
    }

    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    serde_json::from_slice(&bytes).expect("error body is JSON")
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted(
    #[from(internal_error_case)] internal_error: Error,
    expected_trace_id: String,
) {
    let body = assert_error_response(
        internal_error,
        StatusCode::INTERNAL_SERVER_ERROR,
        Some(expected_trace_id.as_str()),
    )
    .await;
    assert_eq!(
        body,
        json!({
            "code": "internal_error",
            "message": "Internal server error",
            "traceId": expected_trace_id,
        })
    );
}

#[rstest]
#[actix_web::test]
async fn client_errors_keep_message_and_details(
    #[from(invalid_request_case)] invalid_request: Error,
    expected_trace_id: String,
) {
    let body = assert_error_response(
        invalid_request,
        StatusCode::BAD_REQUEST,
        Some(expected_trace_id.as_str()),
    )
    .await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["message"], "title must not be empty");
    assert_eq!(body["details"], json!({"field": "title", "code": "empty"}));
}

#[rstest]
#[actix_web::test]
async fn error_without_trace_id_omits_trace_header() {
    let error = Error::not_found("Movie with title Heat not found");

    let body = assert_error_response(error, StatusCode::NOT_FOUND, None).await;
    assert_eq!(body["code"], "not_found");
    assert!(body.get("traceId").is_none());
    assert!(body.get("details").is_none());
}

#[rstest]
fn public_view_leaves_client_errors_untouched() {
    let error = Error::conflict("Movie with title Heat already exists").with_trace_id(TRACE_ID);
    assert_eq!(super::public_view(&error), error);
}

#[rstest]
#[case(Error::service_unavailable("operation deadline expired"), Some("1"))]
#[case(Error::internal("pool closed"), None)]
#[case(Error::conflict("seat taken"), None)]
fn retry_after_only_accompanies_unavailable(
    #[case] error: Error,
    #[case] expected: Option<&str>,
) {
    let response = ResponseError::error_response(&error);
    let retry_after = response
        .headers()
        .get(header::RETRY_AFTER)
        .and_then(|value| value.to_str().ok());
    assert_eq!(retry_after, expected);
}

#[rstest]
#[actix_web::test]
async fn request_trace_id_fills_in_for_unscoped_errors() {
    let trace_id: TraceId = TRACE_ID.parse().expect("valid UUID");
    let error = Error::not_found("Showtime 7 not found");
    assert!(error.trace_id().is_none());

    let body = TraceId::scope(trace_id, async move {
        assert_error_response(error, StatusCode::NOT_FOUND, Some(TRACE_ID)).await
    })
    .await;
    assert_eq!(body["traceId"], TRACE_ID);
}

#[rstest]
#[actix_web::test]
async fn error_trace_id_wins_over_request_scope() {
    let error = Error::conflict("seat taken").with_trace_id("from-the-error");

    let body = TraceId::scope(TraceId::generate(), async move {
        assert_error_response(error, StatusCode::CONFLICT, Some("from-the-error")).await
    })
    .await;
    assert_eq!(body["traceId"], "from-the-error");
}

#[test]
fn from_actix_error_is_redacted_internal_error() {
    use actix_web::error;

    let actix_err = error::ErrorBadRequest("boom");
    let err: Error = actix_err.into();

    assert_eq!(err.code(), ErrorCode::InternalError);
    assert_eq!(err.message(), "Internal server error");
    assert_eq!(err.trace_id(), None);
    assert_eq!(err.details(), None);
}
