//! Pull request lifecycle endpoints.
//!
//! ```text
//! POST /pullRequest/create   {"pull_request_id","pull_request_name","author_id"}
//! POST /pullRequest/merge    {"pull_request_id"}
//! POST /pullRequest/reassign {"pull_request_id","old_user_id"}
//! ```

use actix_web::{HttpResponse, post, web};

use crate::domain::ports::CreatePullRequestRequest;
use crate::domain::{DomainError, PullRequestId, PullRequestName, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{
    CreatePullRequestBody, MergePullRequestBody, PullRequestEnvelope, PullRequestResponse,
    ReassignResponse, ReassignReviewerBody,
};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_required};

const PULL_REQUEST_ID: FieldName = FieldName::new("pull_request_id");
const PULL_REQUEST_NAME: FieldName = FieldName::new("pull_request_name");
const AUTHOR_ID: FieldName = FieldName::new("author_id");
const OLD_USER_ID: FieldName = FieldName::new("old_user_id");

fn parse_create(body: CreatePullRequestBody) -> Result<CreatePullRequestRequest, DomainError> {
    Ok(CreatePullRequestRequest {
        id: parse_required(body.pull_request_id, PULL_REQUEST_ID, PullRequestId::new)?,
        name: parse_required(body.pull_request_name, PULL_REQUEST_NAME, PullRequestName::new)?,
        author_id: parse_required(body.author_id, AUTHOR_ID, UserId::new)?,
    })
}

/// Open a pull request and assign up to two reviewers from the author's team.
#[utoipa::path(
    post,
    path = "/pullRequest/create",
    request_body = CreatePullRequestBody,
    responses(
        (status = 201, description = "Pull request created", body = PullRequestEnvelope),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Author not found", body = ErrorSchema),
        (status = 409, description = "Pull request already exists", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["pull-requests"],
    operation_id = "createPullRequest"
)]
#[post("/pullRequest/create")]
pub async fn create_pull_request(
    state: web::Data<HttpState>,
    payload: web::Json<CreatePullRequestBody>,
) -> ApiResult<HttpResponse> {
    let request = parse_create(payload.into_inner())?;
    let pull_request = state.pull_requests.create_pull_request(request).await?;
    Ok(HttpResponse::Created().json(PullRequestEnvelope {
        pr: PullRequestResponse::from(&pull_request),
    }))
}

/// Mark a pull request merged. Repeating the call returns the stored record.
#[utoipa::path(
    post,
    path = "/pullRequest/merge",
    request_body = MergePullRequestBody,
    responses(
        (status = 200, description = "Merged pull request", body = PullRequestEnvelope),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Pull request not found", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["pull-requests"],
    operation_id = "mergePullRequest"
)]
#[post("/pullRequest/merge")]
pub async fn merge_pull_request(
    state: web::Data<HttpState>,
    payload: web::Json<MergePullRequestBody>,
) -> ApiResult<web::Json<PullRequestEnvelope>> {
    let id = parse_required(
        payload.into_inner().pull_request_id,
        PULL_REQUEST_ID,
        PullRequestId::new,
    )?;
    let pull_request = state.pull_requests.merge_pull_request(&id).await?;
    Ok(web::Json(PullRequestEnvelope {
        pr: PullRequestResponse::from(&pull_request),
    }))
}

/// Swap a reviewer for another active member of the reviewer's team.
#[utoipa::path(
    post,
    path = "/pullRequest/reassign",
    request_body = ReassignReviewerBody,
    responses(
        (status = 200, description = "Reviewer replaced", body = ReassignResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Pull request or user not found", body = ErrorSchema),
        (
            status = 409,
            description = "Merged, reviewer not assigned, no candidate, or concurrent swap",
            body = ErrorSchema
        ),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["pull-requests"],
    operation_id = "reassignReviewer"
)]
#[post("/pullRequest/reassign")]
pub async fn reassign_reviewer(
    state: web::Data<HttpState>,
    payload: web::Json<ReassignReviewerBody>,
) -> ApiResult<web::Json<ReassignResponse>> {
    let ReassignReviewerBody {
        pull_request_id,
        old_user_id,
    } = payload.into_inner();
    let id = parse_required(pull_request_id, PULL_REQUEST_ID, PullRequestId::new)?;
    let old_reviewer = parse_required(old_user_id, OLD_USER_ID, UserId::new)?;
    let outcome = state
        .pull_requests
        .reassign_reviewer(&id, &old_reviewer)
        .await?;
    Ok(web::Json(ReassignResponse {
        pr: PullRequestResponse::from(&outcome.pull_request),
        replaced_by: outcome.replaced_by.to_string(),
    }))
}

#[cfg(test)]
#[path = "pull_requests_tests.rs"]
mod tests;
