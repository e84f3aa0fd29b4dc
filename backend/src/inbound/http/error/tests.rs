//! Tests for HTTP error mapping.

use super::*;
use crate::domain::DomainError as Error;
use actix_web::ResponseError;
use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn internal_error_case() -> DomainError {
    DomainError::internal("pool exhausted: postgres://secret@db")
        .with_trace_id(TRACE_ID)
        .with_details(json!({"secret": "x"}))
}

#[rstest]
#[case(DomainError::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(DomainError::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(DomainError::conflict("exists"), StatusCode::CONFLICT)]
#[case(DomainError::pull_request_merged("merged"), StatusCode::CONFLICT)]
#[case(DomainError::reviewer_not_assigned("nope"), StatusCode::CONFLICT)]
#[case(DomainError::no_replacement_candidate("none"), StatusCode::CONFLICT)]
#[case(DomainError::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] err: DomainError, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&err), status);
}

async fn response_payload(error: &DomainError) -> (StatusCode, Option<String>, serde_json::Value) {
    let response = ResponseError::error_response(error);
    let status = response.status();
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    let body = serde_json::from_slice(&bytes).expect("error body is JSON");
    (status, header, body)
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted(internal_error_case: DomainError) {
    let (status, header, body) = response_payload(&internal_error_case).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(header.as_deref(), Some(TRACE_ID));
    assert_eq!(
        body,
        json!({
            "code": "INTERNAL_ERROR",
            "message": "Internal server error",
            "traceId": TRACE_ID,
        })
    );
}

#[rstest]
#[actix_web::test]
async fn guard_errors_keep_message_and_code() {
    let error = DomainError::no_replacement_candidate("no active replacement for r1");
    let (status, header, body) = response_payload(&error).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert!(header.is_none());
    assert_eq!(body["code"], "NO_CANDIDATE");
    assert_eq!(body["message"], "no active replacement for r1");
    assert!(body.get("traceId").is_none());
}

#[rstest]
#[actix_web::test]
async fn validation_details_reach_clients() {
    let error = DomainError::invalid_request("team_name must not be empty")
        .with_details(json!({"field": "team_name", "code": "empty"}));
    let (_, _, body) = response_payload(&error).await;

    assert_eq!(body["details"], json!({"field": "team_name", "code": "empty"}));
}

#[rstest]
fn actix_errors_become_redacted_internal_errors() {
    let err: Error = actix_web::error::ErrorBadRequest("boom").into();

    assert_eq!(err.code(), ErrorCode::InternalError);
    assert_eq!(err.message(), "Internal server error");
    assert_eq!(err.details(), None);
}
