//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every review endpoint, the health probes, the request
//! and response DTOs, and the shared error schemas. Swagger UI serves it in
//! debug builds and the `openapi-dump` binary exports it for tooling.

use crate::inbound::http::dto::{
    AddTeamRequest, AuthorStatResponse, CreatePullRequestBody, MergePullRequestBody,
    PullRequestEnvelope, PullRequestResponse, PullRequestShortResponse, PullRequestStatsResponse,
    ReassignResponse, ReassignReviewerBody, ReviewerStatResponse, ReviewerStatsResponse,
    SetActiveRequest, TeamEnvelope, TeamMemberRequest, TeamMemberResponse, TeamResponse,
    UserEnvelope, UserResponse, UserReviewsResponse,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Reviewchecker API",
        description = "Team sync, pull request reviewer assignment, and review statistics."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::teams::add_team,
        crate::inbound::http::teams::get_team,
        crate::inbound::http::users::set_is_active,
        crate::inbound::http::users::get_review,
        crate::inbound::http::pull_requests::create_pull_request,
        crate::inbound::http::pull_requests::merge_pull_request,
        crate::inbound::http::pull_requests::reassign_reviewer,
        crate::inbound::http::stats::reviewer_stats,
        crate::inbound::http::stats::pull_request_stats,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        AddTeamRequest,
        TeamMemberRequest,
        TeamMemberResponse,
        TeamResponse,
        TeamEnvelope,
        SetActiveRequest,
        UserResponse,
        UserEnvelope,
        PullRequestShortResponse,
        UserReviewsResponse,
        CreatePullRequestBody,
        MergePullRequestBody,
        ReassignReviewerBody,
        PullRequestResponse,
        PullRequestEnvelope,
        ReassignResponse,
        ReviewerStatResponse,
        ReviewerStatsResponse,
        AuthorStatResponse,
        PullRequestStatsResponse,
    )),
    tags(
        (name = "teams", description = "Team synchronisation and lookup"),
        (name = "users", description = "Reviewer activity and assignments"),
        (name = "pull-requests", description = "Pull request lifecycle and reviewer swaps"),
        (name = "stats", description = "Read-only review statistics"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
