//! Statistics aggregation over the review store.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{StatsQuery, StatsRepository, StatsRepositoryError};
use crate::domain::{DomainError, PullRequestStats, ReviewerStat, sort_reviewer_stats};

fn map_repository_error(error: StatsRepositoryError) -> DomainError {
    match error {
        StatsRepositoryError::Connection { message } => {
            DomainError::internal(format!("stats repository unavailable: {message}"))
        }
        StatsRepositoryError::Query { message } => {
            DomainError::internal(format!("stats repository error: {message}"))
        }
    }
}

/// Read-only service implementing [`StatsQuery`].
///
/// Each call is an independent snapshot; two calls may observe different
/// states of the store.
#[derive(Clone)]
pub struct StatsService<S> {
    stats: Arc<S>,
}

impl<S> StatsService<S> {
    /// Create the service over a statistics repository.
    pub const fn new(stats: Arc<S>) -> Self {
        Self { stats }
    }
}

#[async_trait]
impl<S> StatsQuery for StatsService<S>
where
    S: StatsRepository,
{
    async fn reviewer_stats(&self) -> Result<Vec<ReviewerStat>, DomainError> {
        let mut stats = self
            .stats
            .reviewer_stats()
            .await
            .map_err(map_repository_error)?;
        sort_reviewer_stats(&mut stats);
        Ok(stats)
    }

    async fn pull_request_stats(&self) -> Result<PullRequestStats, DomainError> {
        self.stats
            .pull_request_totals()
            .await
            .map(PullRequestStats::from)
            .map_err(map_repository_error)
    }
}
