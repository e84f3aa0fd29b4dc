//! Tests for domain error construction and serialisation.

use super::*;
use crate::domain::DomainError as Error;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
#[case(DomainError::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case(DomainError::not_found("missing"), ErrorCode::NotFound)]
#[case(DomainError::conflict("dup"), ErrorCode::Conflict)]
#[case(DomainError::pull_request_merged("merged"), ErrorCode::PullRequestMerged)]
#[case(DomainError::reviewer_not_assigned("nope"), ErrorCode::ReviewerNotAssigned)]
#[case(DomainError::no_replacement_candidate("none"), ErrorCode::NoReplacementCandidate)]
#[case(DomainError::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_code(#[case] error: DomainError, #[case] code: ErrorCode) {
    assert_eq!(error.code(), code);
}

#[rstest]
fn try_new_rejects_blank_messages() {
    let result = DomainError::try_new(ErrorCode::InvalidRequest, "   ");
    assert_eq!(result, Err(DomainErrorValidationError::EmptyMessage));
}

#[rstest]
fn new_substitutes_default_message_for_blank_input() {
    let error = DomainError::new(ErrorCode::NoReplacementCandidate, " ");
    assert_eq!(error.message(), "no active replacement candidate in team");
}

#[rstest]
fn try_with_trace_id_rejects_blank_values() {
    let result = DomainError::invalid_request("bad").try_with_trace_id("  ");
    assert_eq!(result, Err(DomainErrorValidationError::EmptyTraceId));
}

#[rstest]
fn trace_id_is_absent_out_of_scope() {
    assert!(DomainError::internal("boom").trace_id().is_none());
}

#[rstest]
#[tokio::test]
async fn constructors_capture_trace_id_in_scope(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id.parse().expect("fixture is a valid UUID");
    let error = TraceId::scope(trace_id, async { DomainError::conflict("dup") }).await;
    assert_eq!(error.trace_id(), Some(expected_trace_id.as_str()));
}

#[rstest]
#[case(ErrorCode::PullRequestMerged, "PR_MERGED")]
#[case(ErrorCode::ReviewerNotAssigned, "NOT_ASSIGNED")]
#[case(ErrorCode::NoReplacementCandidate, "NO_CANDIDATE")]
#[case(ErrorCode::InvalidRequest, "INVALID_REQUEST")]
#[case(ErrorCode::InternalError, "INTERNAL_ERROR")]
fn codes_use_wire_names(#[case] code: ErrorCode, #[case] wire: &str) {
    let encoded = serde_json::to_value(code).expect("code serialises");
    assert_eq!(encoded, json!(wire));
}

#[rstest]
fn serialises_camel_case_envelope(expected_trace_id: String) {
    let error = DomainError::invalid_request("bad")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({"field": "team_name"}));
    let value = serde_json::to_value(&error).expect("error serialises");
    assert_eq!(
        value,
        json!({
            "code": "INVALID_REQUEST",
            "message": "bad",
            "traceId": expected_trace_id,
            "details": {"field": "team_name"},
        })
    );
}

#[rstest]
fn omits_absent_optional_fields() {
    let value = serde_json::to_value(DomainError::not_found("missing")).expect("error serialises");
    assert!(value.get("traceId").is_none());
    assert!(value.get("details").is_none());
}

#[rstest]
#[tokio::test]
async fn deserialising_ignores_ambient_trace(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id.parse().expect("fixture is a valid UUID");
    let payload = json!({"code": "NOT_FOUND", "message": "missing"});
    let error: Error = TraceId::scope(trace_id, async move {
        serde_json::from_value(payload).expect("payload deserialises")
    })
    .await;
    assert!(error.trace_id().is_none());
}

#[rstest]
fn deserialising_rejects_blank_message() {
    let payload = json!({"code": "NOT_FOUND", "message": " "});
    assert!(serde_json::from_value::<DomainError>(payload).is_err());
}
