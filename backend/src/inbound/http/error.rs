//! Actix rendering of domain errors, faults, and failures.
//!
//! Internal errors are redacted before serialisation; the dispatcher has
//! already logged the underlying fault. Every error response echoes the trace identifier.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;

use crate::domain::{Error, ErrorCode, Failure, TRACE_ID_HEADER};

/// Result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn client_view(error: &Error) -> Error {
    if error.code() != ErrorCode::InternalError {
        return error.clone();
    }
    let redacted = Error::internal(ErrorCode::InternalError.default_message());
    match error.trace_id() {
        Some(id) => redacted.with_trace_id(id),
        None => redacted,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            response.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        response.json(client_view(self))
    }
}

/// Business failure as a `400` payload listing any field violations.
pub fn failure_to_error(failure: &Failure) -> Error {
    let error = Error::invalid_request(failure.reason());
    match failure.violations() {
        Some(violations) => error.with_details(json!({ "violations": violations })),
        None => error,
    }
}

#[cfg(test)]
mod tests;
