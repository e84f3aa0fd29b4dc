//! Shared request validation for the HTTP adapter.
//!
//! Every rejection is an `INVALID_REQUEST` error whose `details` name the
//! offending field and a machine-readable reason.

use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::{HttpRequest, web};
use serde_json::json;

use crate::domain::{DomainError, TextValidationError};

/// Machine-readable reason attached to validation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValidationCode {
    MissingField,
    Empty,
    SurroundingWhitespace,
    TooLong,
    MalformedBody,
    MalformedQuery,
}

impl ValidationCode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::Empty => "empty",
            Self::SurroundingWhitespace => "surrounding_whitespace",
            Self::TooLong => "too_long",
            Self::MalformedBody => "malformed_body",
            Self::MalformedQuery => "malformed_query",
        }
    }
}

/// Wire name of a request field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    const fn as_str(self) -> &'static str {
        self.0
    }
}

fn field_error(field: &str, message: String, code: ValidationCode) -> DomainError {
    DomainError::invalid_request(message).with_details(json!({
        "field": field,
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> DomainError {
    let field = field.as_str();
    field_error(
        field,
        format!("missing required field: {field}"),
        ValidationCode::MissingField,
    )
}

/// Map a newtype validation failure, reporting it under `field`.
pub(crate) fn text_error(field: FieldName, err: &TextValidationError) -> DomainError {
    let field = field.as_str();
    match err {
        TextValidationError::Empty { .. } => field_error(
            field,
            format!("{field} must not be empty"),
            ValidationCode::Empty,
        ),
        TextValidationError::SurroundingWhitespace { .. } => field_error(
            field,
            format!("{field} must not have leading or trailing whitespace"),
            ValidationCode::SurroundingWhitespace,
        ),
        TextValidationError::TooLong { max, .. } => DomainError::invalid_request(format!(
            "{field} must be at most {max} characters"
        ))
        .with_details(json!({
            "field": field,
            "code": ValidationCode::TooLong.as_str(),
            "max": max,
        })),
    }
}

/// Attach the position of the offending list element to a field error.
pub(crate) fn at_index(error: DomainError, index: usize) -> DomainError {
    let mut details = error.details().cloned().unwrap_or_else(|| json!({}));
    if let Some(object) = details.as_object_mut() {
        object.insert("index".to_owned(), json!(index));
    }
    error.with_details(details)
}

/// Require a field and parse it into a validated newtype.
pub(crate) fn parse_required<T>(
    value: Option<String>,
    field: FieldName,
    parse: impl FnOnce(String) -> Result<T, TextValidationError>,
) -> Result<T, DomainError> {
    let raw = value.ok_or_else(|| missing_field_error(field))?;
    parse(raw).map_err(|err| text_error(field, &err))
}

/// Require a boolean field.
pub(crate) fn require_flag(value: Option<bool>, field: FieldName) -> Result<bool, DomainError> {
    value.ok_or_else(|| missing_field_error(field))
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    DomainError::invalid_request(format!("malformed JSON body: {err}"))
        .with_details(json!({ "code": ValidationCode::MalformedBody.as_str() }))
        .into()
}

fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    DomainError::invalid_request(format!("malformed query string: {err}"))
        .with_details(json!({ "code": ValidationCode::MalformedQuery.as_str() }))
        .into()
}

/// JSON extractor configuration returning the shared error envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error_handler)
}

/// Query extractor configuration returning the shared error envelope.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(query_error_handler)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorCode, TeamName};
    use rstest::rstest;

    const TEAM_NAME: FieldName = FieldName::new("team_name");

    #[rstest]
    fn missing_value_reports_field() {
        let err = parse_required(None, TEAM_NAME, TeamName::new).expect_err("missing");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(
            err.details(),
            Some(&json!({"field": "team_name", "code": "missing_field"}))
        );
    }

    #[rstest]
    #[case("", "empty")]
    #[case("   ", "empty")]
    #[case(" core", "surrounding_whitespace")]
    fn invalid_text_reports_reason(#[case] raw: &str, #[case] code: &str) {
        let err = parse_required(Some(raw.to_owned()), TEAM_NAME, TeamName::new)
            .expect_err("invalid");
        assert_eq!(
            err.details().and_then(|d| d.get("code")),
            Some(&json!(code))
        );
    }

    #[rstest]
    fn too_long_reports_limit() {
        let raw = "x".repeat(TeamName::MAX_LEN + 1);
        let err = parse_required(Some(raw), TEAM_NAME, TeamName::new).expect_err("too long");
        assert_eq!(
            err.details().and_then(|d| d.get("max")),
            Some(&json!(TeamName::MAX_LEN))
        );
    }

    #[rstest]
    fn valid_text_parses() {
        let name = parse_required(Some("core".to_owned()), TEAM_NAME, TeamName::new)
            .expect("valid");
        assert_eq!(name.as_str(), "core");
    }

    #[rstest]
    fn index_is_added_to_details() {
        let err = at_index(missing_field_error(FieldName::new("user_id")), 2);
        assert_eq!(
            err.details(),
            Some(&json!({"field": "user_id", "code": "missing_field", "index": 2}))
        );
    }

    #[rstest]
    fn missing_flag_is_rejected() {
        let err = require_flag(None, FieldName::new("is_active")).expect_err("missing");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }
}
