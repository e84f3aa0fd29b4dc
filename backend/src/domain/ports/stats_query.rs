//! Driving port for review statistics.

use async_trait::async_trait;

use crate::domain::{DomainError, PullRequestStats, ReviewerStat};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatsQuery: Send + Sync {
    /// Reviewer workload, busiest first, ties by user id.
    async fn reviewer_stats(&self) -> Result<Vec<ReviewerStat>, DomainError>;

    /// Pull request totals with the mean reviewers per pull request.
    async fn pull_request_stats(&self) -> Result<PullRequestStats, DomainError>;
}
