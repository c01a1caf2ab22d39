//! Shared validation helpers for inbound HTTP adapters.
//!
//! Domain validation owns field rules; this module only turns raw wire
//! values (path segments, timestamp strings, malformed JSON bodies) into
//! typed inputs or `InvalidRequest` errors with `{field, value, code}`
//! details.

use actix_web::error::JsonPayloadError;
use actix_web::{HttpRequest, web};
use chrono::{DateTime, Utc};
use serde_json::json;

use crate::domain::Error;

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidId,
    InvalidTimestamp,
    MalformedBody,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidId => "invalid_id",
            ErrorCode::InvalidTimestamp => "invalid_timestamp",
            ErrorCode::MalformedBody => "malformed_body",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

fn value_error(field: FieldName, message: String, code: ErrorCode, value: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

pub(crate) fn invalid_id_error(field: FieldName, value: &str) -> Error {
    let message = format!("{} must be a positive integer", field.as_str());
    value_error(field, message, ErrorCode::InvalidId, value)
}

/// Parse a numeric identifier taken from a path segment.
pub(crate) fn parse_id(value: &str, field: FieldName) -> Result<i64, Error> {
    value
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| invalid_id_error(field, value))
}

pub(crate) fn invalid_timestamp_error(field: FieldName, value: &str) -> Error {
    let message = format!("{} must be an RFC 3339 timestamp", field.as_str());
    value_error(field, message, ErrorCode::InvalidTimestamp, value)
}

pub(crate) fn parse_rfc3339_timestamp(
    value: String,
    field: FieldName,
) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(&value)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|_| invalid_timestamp_error(field, &value))
}

pub(crate) fn parse_optional_rfc3339_timestamp(
    value: Option<String>,
    field: FieldName,
) -> Result<Option<DateTime<Utc>>, Error> {
    value
        .map(|raw| parse_rfc3339_timestamp(raw, field))
        .transpose()
}

/// Translate a JSON extractor failure into an `InvalidRequest` error.
pub(crate) fn json_payload_error(err: &JsonPayloadError) -> Error {
    let reason = match err {
        JsonPayloadError::Deserialize(inner) => inner.to_string(),
        JsonPayloadError::ContentType => "expected an application/json body".to_owned(),
        other => other.to_string(),
    };
    Error::invalid_request(format!("malformed request body: {reason}")).with_details(json!({
        "code": ErrorCode::MalformedBody.as_str(),
    }))
}

/// JSON extractor configuration shared by every route.
///
/// Rejected bodies (unknown fields, wrong types, missing fields) surface as
/// the standard error payload instead of Actix's plain-text default.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req: &HttpRequest| json_payload_error(&err).into())
}
