//! Driven port for aggregate review counts.

use async_trait::async_trait;

use crate::domain::{PullRequestTotals, ReviewerStat};

use super::define_port_error;

define_port_error! {
    /// Errors raised by statistics adapters.
    pub enum StatsRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "stats repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "stats repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatsRepository: Send + Sync {
    /// Per-reviewer counts for every user who ever held a reviewer slot.
    async fn reviewer_stats(&self) -> Result<Vec<ReviewerStat>, StatsRepositoryError>;

    /// Raw pull request counts.
    async fn pull_request_totals(&self) -> Result<PullRequestTotals, StatsRepositoryError>;
}
