//! Wire representations shared by the HTTP handlers.
//!
//! Requests carry optional fields so missing values surface as
//! `INVALID_REQUEST` with field details instead of a generic extractor error.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    AuthorStat, PullRequest, PullRequestStats, ReviewerStat, TeamRoster, User, UserId,
};

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// One member entry in a team sync request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct TeamMemberRequest {
    #[schema(example = "u1")]
    pub user_id: Option<String>,
    #[schema(example = "Alice")]
    pub username: Option<String>,
    #[schema(example = true)]
    pub is_active: Option<bool>,
}

/// Body of `POST /team/add`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct AddTeamRequest {
    #[schema(example = "backend")]
    pub team_name: Option<String>,
    pub members: Option<Vec<TeamMemberRequest>>,
}

/// Query of `GET /team/get`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct TeamNameQuery {
    pub team_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TeamMemberResponse {
    pub user_id: String,
    pub username: String,
    pub is_active: bool,
}

impl From<&User> for TeamMemberResponse {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id().to_string(),
            username: user.display_name().to_string(),
            is_active: user.is_active(),
        }
    }
}

/// A team with its members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TeamResponse {
    pub team_name: String,
    pub members: Vec<TeamMemberResponse>,
}

impl From<&TeamRoster> for TeamResponse {
    fn from(roster: &TeamRoster) -> Self {
        Self {
            team_name: roster.team.name().to_string(),
            members: roster.members.iter().map(TeamMemberResponse::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TeamEnvelope {
    pub team: TeamResponse,
}

/// Body of `POST /users/setIsActive`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct SetActiveRequest {
    #[schema(example = "u2")]
    pub user_id: Option<String>,
    #[schema(example = false)]
    pub is_active: Option<bool>,
}

/// Query carrying a user identifier.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UserIdQuery {
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub user_id: String,
    pub username: String,
    pub team_name: String,
    pub is_active: bool,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id().to_string(),
            username: user.display_name().to_string(),
            team_name: user.team_name().to_string(),
            is_active: user.is_active(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserEnvelope {
    pub user: UserResponse,
}

/// Short pull request form used in review listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PullRequestShortResponse {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
    #[schema(example = "OPEN")]
    pub status: String,
}

impl From<&PullRequest> for PullRequestShortResponse {
    fn from(pr: &PullRequest) -> Self {
        Self {
            pull_request_id: pr.id().to_string(),
            pull_request_name: pr.name().to_string(),
            author_id: pr.author_id().to_string(),
            status: pr.status().as_str().to_owned(),
        }
    }
}

/// Response of `GET /users/getReview`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserReviewsResponse {
    pub user_id: String,
    pub pull_requests: Vec<PullRequestShortResponse>,
}

/// Body of `POST /pullRequest/create`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CreatePullRequestBody {
    #[schema(example = "pr-1001")]
    pub pull_request_id: Option<String>,
    #[schema(example = "Add search")]
    pub pull_request_name: Option<String>,
    #[schema(example = "u1")]
    pub author_id: Option<String>,
}

/// Body of `POST /pullRequest/merge`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct MergePullRequestBody {
    pub pull_request_id: Option<String>,
}

/// Body of `POST /pullRequest/reassign`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ReassignReviewerBody {
    pub pull_request_id: Option<String>,
    #[schema(example = "u2")]
    pub old_user_id: Option<String>,
}

/// Full pull request representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PullRequestResponse {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
    #[schema(example = "OPEN")]
    pub status: String,
    pub assigned_reviewers: Vec<String>,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "mergedAt", default, skip_serializing_if = "Option::is_none")]
    pub merged_at: Option<String>,
}

impl From<&PullRequest> for PullRequestResponse {
    fn from(pr: &PullRequest) -> Self {
        Self {
            pull_request_id: pr.id().to_string(),
            pull_request_name: pr.name().to_string(),
            author_id: pr.author_id().to_string(),
            status: pr.status().as_str().to_owned(),
            assigned_reviewers: pr.reviewers().iter().map(UserId::to_string).collect(),
            created_at: timestamp(pr.created_at()),
            merged_at: pr.merged_at().map(timestamp),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PullRequestEnvelope {
    pub pr: PullRequestResponse,
}

/// Response of `POST /pullRequest/reassign`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ReassignResponse {
    pub pr: PullRequestResponse,
    pub replaced_by: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ReviewerStatResponse {
    pub user_id: String,
    pub username: String,
    pub team_name: String,
    pub total_assigned: u64,
    pub open_assigned: u64,
}

impl From<&ReviewerStat> for ReviewerStatResponse {
    fn from(stat: &ReviewerStat) -> Self {
        Self {
            user_id: stat.user_id.to_string(),
            username: stat.display_name.to_string(),
            team_name: stat.team_name.to_string(),
            total_assigned: stat.total_assigned,
            open_assigned: stat.open_assigned,
        }
    }
}

/// Response of `GET /stats/reviewers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ReviewerStatsResponse {
    pub reviewers: Vec<ReviewerStatResponse>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthorStatResponse {
    pub author_id: String,
    pub count: u64,
}

impl From<&AuthorStat> for AuthorStatResponse {
    fn from(stat: &AuthorStat) -> Self {
        Self {
            author_id: stat.author_id.to_string(),
            count: stat.count,
        }
    }
}

/// Response of `GET /stats/pullRequests`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PullRequestStatsResponse {
    pub total: u64,
    pub open: u64,
    pub merged: u64,
    #[schema(example = 1.5)]
    pub average_reviewers: f64,
    pub by_author: Vec<AuthorStatResponse>,
}

impl From<&PullRequestStats> for PullRequestStatsResponse {
    fn from(stats: &PullRequestStats) -> Self {
        Self {
            total: stats.total,
            open: stats.open,
            merged: stats.merged,
            average_reviewers: stats.average_reviewers,
            by_author: stats.by_author.iter().map(AuthorStatResponse::from).collect(),
        }
    }
}
