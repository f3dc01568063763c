//! Tests for HTTP error rendering.

use super::*;
use crate::domain::ports::ProfileStoreError;
use crate::domain::{Fault, Outcome, ValidationViolation};
use actix_web::body::to_bytes;
use rstest::rstest;
use serde_json::Value;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

async fn body_json(error: &Error) -> (StatusCode, Option<String>, Value) {
    let response = ResponseError::error_response(error);
    let status = response.status();
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let bytes = to_bytes(response.into_body()).await.expect("read body");
    let value = serde_json::from_slice(&bytes).expect("json body");
    (status, header, value)
}

#[rstest]
#[case(Error::invalid_request("x"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("x"), StatusCode::UNAUTHORIZED)]
#[case(Error::forbidden("x"), StatusCode::FORBIDDEN)]
#[case(Error::not_found("x"), StatusCode::NOT_FOUND)]
#[case(Error::service_unavailable("x"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("x"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_matches_code(#[case] error: Error, #[case] expected: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), expected);
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted_but_keep_trace() {
    let error = Error::internal("password column missing")
        .with_trace_id(TRACE_ID)
        .with_details(serde_json::json!({ "sql": "select" }));

    let (status, header, body) = body_json(&error).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(header.as_deref(), Some(TRACE_ID));
    assert_eq!(body["message"], "Internal server error");
    assert_eq!(body["traceId"], TRACE_ID);
    assert!(body.get("details").is_none());
}

#[rstest]
#[actix_web::test]
async fn client_errors_keep_message_and_details() {
    let error = Error::not_found("no such profile").with_details(serde_json::json!({ "username": "x" }));

    let (status, header, body) = body_json(&error).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(header.is_none());
    assert_eq!(body["code"], "not_found");
    assert_eq!(body["message"], "no such profile");
    assert_eq!(body["details"]["username"], "x");
}

#[rstest]
fn validation_failure_lists_violations() {
    let outcome: Outcome<()> = Outcome::invalid(vec![ValidationViolation::new(
        "displayName",
        "'Display Name' must not be empty.",
    )]);
    let failure = outcome.as_failure().expect("failure variant");

    let error = failure_to_error(failure);

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    let details = error.details().expect("details present");
    assert_eq!(details["violations"][0]["field"], "displayName");
}

#[rstest]
fn plain_failure_has_no_details() {
    let outcome: Outcome<()> = Outcome::failure("Problem editing the profile");
    let error = failure_to_error(outcome.as_failure().expect("failure variant"));
    assert_eq!(error.message(), "Problem editing the profile");
    assert!(error.details().is_none());
}

#[rstest]
#[case(Fault::Cancelled, StatusCode::SERVICE_UNAVAILABLE)]
#[case(Fault::Store(ProfileStoreError::connection("down")), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Fault::integrity("missing"), StatusCode::INTERNAL_SERVER_ERROR)]
fn faults_render_as_server_errors(#[case] fault: Fault, #[case] expected: StatusCode) {
    assert_eq!(Error::from(fault).status_code(), expected);
}
