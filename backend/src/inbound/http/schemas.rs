//! OpenAPI schema definitions for domain types.
//!
//! Domain types do not derive `ToSchema`; the wrappers here describe their
//! wire shape for the generated document.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "INVALID_REQUEST")]
    InvalidRequest,
    /// The team, user, or pull request does not exist.
    #[schema(rename = "NOT_FOUND")]
    NotFound,
    /// A uniqueness rule or concurrent update rejected the request.
    #[schema(rename = "CONFLICT")]
    Conflict,
    /// The pull request is merged and no longer accepts reviewer changes.
    #[schema(rename = "PR_MERGED")]
    PullRequestMerged,
    /// The user is not a reviewer of the pull request.
    #[schema(rename = "NOT_ASSIGNED")]
    ReviewerNotAssigned,
    /// No active team member can take over the review.
    #[schema(rename = "NO_CANDIDATE")]
    NoReplacementCandidate,
    /// The store is temporarily unreachable.
    /// An unexpected error occurred on the server.
    #[schema(rename = "INTERNAL_ERROR")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::DomainError`].
#[derive(ToSchema)]
#[schema(as = crate::domain::DomainError)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "NOT_FOUND")]
    code: ErrorCodeSchema,
    /// Human-readable message.
    #[schema(example = "pull request pr-1 not found")]
    message: String,
    /// Correlation identifier echoed in the `trace-id` header.
    #[schema(rename = "traceId", example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Field-level validation context.
    details: Option<serde_json::Value>,
}
