//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Varchar};
use uuid::Uuid;

use crate::domain::{
    DisplayName, PullRequest, PullRequestDraft, PullRequestId, PullRequestName, PullRequestStatus,
    TeamId, TeamName, User, UserDraft, UserId,
};

use super::schema::{pull_request_reviewers, pull_requests, teams, users};

/// Row struct for reading from the teams table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = teams)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TeamRow {
    pub id: Uuid,
    pub name: String,
}

/// Insertable struct for creating teams.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = teams)]
pub(crate) struct NewTeamRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
}

/// User joined with the owning team's name.
#[derive(Debug, Clone, Queryable)]
pub(crate) struct UserWithTeamRow {
    pub id: String,
    pub username: String,
    pub team_id: Uuid,
    pub is_active: bool,
    pub team_name: String,
}

/// Insertable struct for user upserts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: &'a str,
    pub username: &'a str,
    pub team_id: Uuid,
    pub is_active: bool,
}

/// Row struct for reading from the pull_requests table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = pull_requests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PullRequestRow {
    pub id: String,
    pub name: String,
    pub author_id: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub merged_at: Option<DateTime<Utc>>,
}

/// Insertable struct for creating pull requests.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = pull_requests)]
pub(crate) struct NewPullRequestRow<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub author_id: &'a str,
    pub status: &'a str,
    pub created_at: DateTime<Utc>,
    pub merged_at: Option<DateTime<Utc>>,
}

/// Row struct for reading reviewer slots.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = pull_request_reviewers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ReviewerSlotRow {
    pub pull_request_id: String,
    pub slot: i16,
    pub reviewer_id: String,
}

/// Insertable struct for reviewer slots.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = pull_request_reviewers)]
pub(crate) struct NewReviewerSlotRow<'a> {
    pub pull_request_id: &'a str,
    pub slot: i16,
    pub reviewer_id: &'a str,
}

/// Aggregated reviewer workload returned by raw SQL.
#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct ReviewerStatRow {
    #[diesel(sql_type = Varchar)]
    pub user_id: String,
    #[diesel(sql_type = Varchar)]
    pub username: String,
    #[diesel(sql_type = Varchar)]
    pub team_name: String,
    #[diesel(sql_type = BigInt)]
    pub total_assigned: i64,
    #[diesel(sql_type = BigInt)]
    pub open_assigned: i64,
}

/// Pull request counters returned by raw SQL.
#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct PullRequestTotalsRow {
    #[diesel(sql_type = BigInt)]
    pub total: i64,
    #[diesel(sql_type = BigInt)]
    pub open: i64,
    #[diesel(sql_type = BigInt)]
    pub merged: i64,
    #[diesel(sql_type = BigInt)]
    pub reviewer_assignments: i64,
}

/// Per-author pull request count returned by raw SQL.
#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct AuthorCountRow {
    #[diesel(sql_type = Varchar)]
    pub author_id: String,
    #[diesel(sql_type = BigInt)]
    pub count: i64,
}

impl UserWithTeamRow {
    /// Rebuild the domain user; fails when stored text no longer validates.
    pub(crate) fn into_user(self) -> Result<User, String> {
        Ok(User::new(UserDraft {
            id: UserId::new(self.id).map_err(|err| err.to_string())?,
            display_name: DisplayName::new(self.username).map_err(|err| err.to_string())?,
            team_id: TeamId::from_uuid(self.team_id),
            team_name: TeamName::new(self.team_name).map_err(|err| err.to_string())?,
            is_active: self.is_active,
        }))
    }
}

impl PullRequestRow {
    /// Combine with reviewer slots, which must already be in slot order.
    pub(crate) fn into_pull_request(
        self,
        slots: impl IntoIterator<Item = ReviewerSlotRow>,
    ) -> Result<PullRequest, String> {
        let reviewers = slots
            .into_iter()
            .map(|slot| UserId::new(slot.reviewer_id).map_err(|err| err.to_string()))
            .collect::<Result<Vec<_>, _>>()?;
        PullRequest::new(PullRequestDraft {
            id: PullRequestId::new(self.id).map_err(|err| err.to_string())?,
            name: PullRequestName::new(self.name).map_err(|err| err.to_string())?,
            author_id: UserId::new(self.author_id).map_err(|err| err.to_string())?,
            status: self
                .status
                .parse::<PullRequestStatus>()
                .map_err(|err| err.to_string())?,
            reviewers,
            created_at: self.created_at,
            merged_at: self.merged_at,
        })
        .map_err(|err| err.to_string())
    }
}
