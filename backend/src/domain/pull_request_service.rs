//! Pull request lifecycle: creation with initial reviewers, merging, and
//! reviewer reassignment.
//!
//! The service holds no state of its own. Atomicity of multi-row writes and
//! uniqueness of reviewer slots are delegated to the repositories.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info};

use crate::domain::ports::{
    CreatePullRequestRequest, PullRequestCommand, PullRequestRepository,
    PullRequestRepositoryError, Reassignment, TeamRepository, TeamRepositoryError, UserRepository,
    UserRepositoryError,
};
use crate::domain::{
    DomainError, PullRequest, PullRequestDraft, PullRequestId, PullRequestStatus, User, UserId,
    pick_replacement, select_initial_reviewers, sort_members,
};

fn map_pull_request_error(error: PullRequestRepositoryError) -> DomainError {
    match error {
        PullRequestRepositoryError::Connection { message } => {
            DomainError::internal(format!("pull request repository unavailable: {message}"))
        }
        PullRequestRepositoryError::Query { message } => {
            DomainError::internal(format!("pull request repository error: {message}"))
        }
        PullRequestRepositoryError::Duplicate { id } => {
            DomainError::conflict(format!("pull request {id} already exists"))
        }
        PullRequestRepositoryError::SlotConflict { message } => {
            DomainError::conflict(format!("reviewers changed concurrently: {message}"))
        }
    }
}

fn map_user_error(error: UserRepositoryError) -> DomainError {
    match error {
        UserRepositoryError::Connection { message } => {
            DomainError::internal(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            DomainError::internal(format!("user repository error: {message}"))
        }
    }
}

fn map_team_error(error: TeamRepositoryError) -> DomainError {
    match error {
        TeamRepositoryError::Connection { message } => {
            DomainError::internal(format!("team repository unavailable: {message}"))
        }
        other => DomainError::internal(format!("team repository error: {other}")),
    }
}

/// Pull request service implementing [`PullRequestCommand`].
#[derive(Clone)]
pub struct PullRequestService<P, U, T> {
    pull_requests: Arc<P>,
    users: Arc<U>,
    teams: Arc<T>,
    clock: Arc<dyn Clock>,
}

impl<P, U, T> PullRequestService<P, U, T> {
    /// Create the service over its repositories and a clock for timestamps.
    pub fn new(
        pull_requests: Arc<P>,
        users: Arc<U>,
        teams: Arc<T>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            pull_requests,
            users,
            teams,
            clock,
        }
    }
}

impl<P, U, T> PullRequestService<P, U, T>
where
    P: PullRequestRepository,
    U: UserRepository,
    T: TeamRepository,
{
    async fn require_user(&self, id: &UserId, role: &str) -> Result<User, DomainError> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| DomainError::not_found(format!("{role} {id} not found")))
    }

    async fn require_pull_request(&self, id: &PullRequestId) -> Result<PullRequest, DomainError> {
        self.pull_requests
            .find_by_id(id)
            .await
            .map_err(map_pull_request_error)?
            .ok_or_else(|| DomainError::not_found(format!("pull request {id} not found")))
    }

    async fn sorted_team_members(&self, user: &User) -> Result<Vec<User>, DomainError> {
        let mut members = self
            .teams
            .list_members(&user.team_id())
            .await
            .map_err(map_team_error)?;
        sort_members(&mut members);
        Ok(members)
    }
}

#[async_trait]
impl<P, U, T> PullRequestCommand for PullRequestService<P, U, T>
where
    P: PullRequestRepository,
    U: UserRepository,
    T: TeamRepository,
{
    async fn create_pull_request(
        &self,
        request: CreatePullRequestRequest,
    ) -> Result<PullRequest, DomainError> {
        let CreatePullRequestRequest {
            id,
            name,
            author_id,
        } = request;

        let author = self.require_user(&author_id, "author").await?;
        let members = self.sorted_team_members(&author).await?;
        let reviewers = select_initial_reviewers(&members, author.id());

        let pull_request = PullRequest::new(PullRequestDraft {
            id,
            name,
            author_id,
            status: PullRequestStatus::Open,
            reviewers,
            created_at: self.clock.utc(),
            merged_at: None,
        })
        .map_err(|err| DomainError::internal(format!("reviewer selection broke an invariant: {err}")))?;

        self.pull_requests
            .create(&pull_request)
            .await
            .map_err(map_pull_request_error)?;

        info!(
            pull_request_id = %pull_request.id(),
            author_id = %pull_request.author_id(),
            reviewers = pull_request.reviewers().len(),
            "pull request created"
        );
        Ok(pull_request)
    }

    async fn merge_pull_request(&self, id: &PullRequestId) -> Result<PullRequest, DomainError> {
        let current = self.require_pull_request(id).await?;
        if current.is_merged() {
            debug!(pull_request_id = %id, "pull request already merged");
            return Ok(current);
        }

        let merged = self
            .pull_requests
            .update_status(id, PullRequestStatus::Merged, Some(self.clock.utc()))
            .await
            .map_err(map_pull_request_error)?
            .ok_or_else(|| DomainError::not_found(format!("pull request {id} not found")))?;

        info!(pull_request_id = %id, "pull request merged");
        Ok(merged)
    }

    async fn reassign_reviewer(
        &self,
        id: &PullRequestId,
        old_reviewer: &UserId,
    ) -> Result<Reassignment, DomainError> {
        let pull_request = self.require_pull_request(id).await?;
        if pull_request.is_merged() {
            return Err(DomainError::pull_request_merged(format!(
                "pull request {id} is merged"
            )));
        }
        if !pull_request.has_reviewer(old_reviewer) {
            return Err(DomainError::reviewer_not_assigned(format!(
                "user {old_reviewer} is not a reviewer of pull request {id}"
            )));
        }

        let reviewer = self.require_user(old_reviewer, "reviewer").await?;
        let members = self.sorted_team_members(&reviewer).await?;
        let replacement =
            pick_replacement(&members, &pull_request, old_reviewer).ok_or_else(|| {
                DomainError::no_replacement_candidate(format!(
                    "no active replacement for {old_reviewer} in team {}",
                    reviewer.team_name()
                ))
            })?;

        let updated = self
            .pull_requests
            .replace_reviewer(id, old_reviewer, &replacement)
            .await
            .map_err(map_pull_request_error)?;

        info!(
            pull_request_id = %id,
            old_reviewer = %old_reviewer,
            new_reviewer = %replacement,
            "reviewer reassigned"
        );
        Ok(Reassignment {
            pull_request: updated,
            replaced_by: replacement,
        })
    }
}

#[cfg(test)]
#[path = "pull_request_service_tests.rs"]
mod tests;
