//! Turns domain [`Error`]s into JSON responses.
//!
//! Schedule overlaps answer 400 with their own `overlap` code. Storage that
//! is unreachable or too slow answers 503 with a `Retry-After` hint. Internal
//! failures are logged in full and sent redacted. Every response carries the
//! request's trace id, even when the error was raised without one.

use actix_web::{
    HttpResponse, ResponseError,
    http::{StatusCode, header},
};
use tracing::{error, warn};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER, TraceId};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

/// Seconds a client should wait before retrying a 503.
const RETRY_AFTER_SECS: &str = "1";
const REDACTED_MESSAGE: &str = "Internal server error";

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        // Overlaps keep the 400 that existing clients already handle.
        ErrorCode::InvalidRequest | ErrorCode::Overlap => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// The error as clients see it: internal detail stripped and the trace id
/// taken from the request scope when the error lacks one.
fn public_view(error: &Error) -> Error {
    let public = match error.code() {
        ErrorCode::InternalError => Error::internal(REDACTED_MESSAGE),
        _ => error.clone(),
    };
    let trace_id = error
        .trace_id()
        .map(str::to_owned)
        .or_else(|| TraceId::current().map(|id| id.to_string()));
    match trace_id {
        Some(id) => public.with_trace_id(id),
        None => public,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let public = public_view(self);
        match self.code() {
            ErrorCode::InternalError => {
                error!(message = self.message(), trace_id = ?public.trace_id(), "internal error");
            }
            ErrorCode::ServiceUnavailable => {
                warn!(message = self.message(), trace_id = ?public.trace_id(), "storage unavailable");
            }
            _ => {}
        }

        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = public.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        if self.code() == ErrorCode::ServiceUnavailable {
            builder.insert_header((header::RETRY_AFTER, RETRY_AFTER_SECS));
        }
        builder.json(public)
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Error::internal(REDACTED_MESSAGE)
    }
}

#[cfg(test)]
mod tests;
