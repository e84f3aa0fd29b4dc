//! Driving port for pull request lifecycle operations.

use async_trait::async_trait;

use crate::domain::{DomainError, PullRequest, PullRequestId, PullRequestName, UserId};

/// Request to open a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePullRequestRequest {
    /// Caller-chosen identifier.
    pub id: PullRequestId,
    /// Title.
    pub name: PullRequestName,
    /// Author; must exist.
    pub author_id: UserId,
}

/// Outcome of a reviewer swap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reassignment {
    /// Pull request after the swap.
    pub pull_request: PullRequest,
    /// Reviewer who took the slot.
    pub replaced_by: UserId,
}

/// Driving port for pull request writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PullRequestCommand: Send + Sync {
    /// Open a pull request and assign up to two reviewers from the author's
    /// team.
    async fn create_pull_request(
        &self,
        request: CreatePullRequestRequest,
    ) -> Result<PullRequest, DomainError>;

    /// Mark a pull request merged. Merging twice returns the stored record.
    async fn merge_pull_request(&self, id: &PullRequestId) -> Result<PullRequest, DomainError>;

    /// Replace `old_reviewer` with the next eligible member of their team.
    async fn reassign_reviewer(
        &self,
        id: &PullRequestId,
        old_reviewer: &UserId,
    ) -> Result<Reassignment, DomainError>;
}
