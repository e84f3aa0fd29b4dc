//! Driven port for pull request persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{PullRequest, PullRequestId, PullRequestStatus, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by pull request repository adapters.
    pub enum PullRequestRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "pull request repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "pull request repository query failed: {message}",
        /// A pull request with this identifier already exists.
        Duplicate { id: String } => "pull request {id} already exists",
        /// The reviewer slot changed underneath the caller.
        SlotConflict { message: String } => "reviewer slot conflict: {message}",
    }
}

/// Pull request storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PullRequestRepository: Send + Sync {
    /// Insert a pull request and its reviewer slots atomically.
    ///
    /// Fails with [`PullRequestRepositoryError::Duplicate`] when the
    /// identifier is taken.
    async fn create(&self, pull_request: &PullRequest) -> Result<(), PullRequestRepositoryError>;

    /// Fetch a pull request with reviewers in slot order.
    async fn find_by_id(
        &self,
        id: &PullRequestId,
    ) -> Result<Option<PullRequest>, PullRequestRepositoryError>;

    /// Move a pull request to `status`, stamping `merged_at`, and return the
    /// stored record.
    ///
    /// A pull request already in `status` is left untouched so concurrent
    /// merges agree on one timestamp. `Ok(None)` when it does not exist.
    async fn update_status(
        &self,
        id: &PullRequestId,
        status: PullRequestStatus,
        merged_at: Option<DateTime<Utc>>,
    ) -> Result<Option<PullRequest>, PullRequestRepositoryError>;

    /// Pull requests on which `reviewer` holds a slot, oldest first.
    async fn list_by_reviewer(
        &self,
        reviewer: &UserId,
    ) -> Result<Vec<PullRequest>, PullRequestRepositoryError>;

    /// Swap `old` for `new` in the same slot and return the refreshed record.
    ///
    /// Fails with [`PullRequestRepositoryError::SlotConflict`] when `old` no
    /// longer holds a slot on an open pull request or `new` already does.
    async fn replace_reviewer(
        &self,
        id: &PullRequestId,
        old: &UserId,
        new: &UserId,
    ) -> Result<PullRequest, PullRequestRepositoryError>;
}
