//! Read-only statistics endpoints.

use actix_web::{get, web};

use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{
    PullRequestStatsResponse, ReviewerStatResponse, ReviewerStatsResponse,
};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Assignment counts per reviewer, busiest first.
#[utoipa::path(
    get,
    path = "/stats/reviewers",
    responses(
        (status = 200, description = "Reviewer workload", body = ReviewerStatsResponse),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["stats"],
    operation_id = "reviewerStats"
)]
#[get("/stats/reviewers")]
pub async fn reviewer_stats(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<ReviewerStatsResponse>> {
    let stats = state.stats.reviewer_stats().await?;
    Ok(web::Json(ReviewerStatsResponse {
        reviewers: stats.iter().map(ReviewerStatResponse::from).collect(),
    }))
}

/// Pull request totals and per-author counts.
#[utoipa::path(
    get,
    path = "/stats/pullRequests",
    responses(
        (status = 200, description = "Pull request totals", body = PullRequestStatsResponse),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["stats"],
    operation_id = "pullRequestStats"
)]
#[get("/stats/pullRequests")]
pub async fn pull_request_stats(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<PullRequestStatsResponse>> {
    let stats = state.stats.pull_request_stats().await?;
    Ok(web::Json(PullRequestStatsResponse::from(&stats)))
}
