//! Derived review statistics.
//!
//! Adapters return raw counts; ordering and averages are computed here so
//! every store reports identical results.

use std::cmp::Reverse;

use super::team::TeamName;
use super::user::{DisplayName, UserId};

/// Review workload of a single user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewerStat {
    /// Reviewer.
    pub user_id: UserId,
    /// Reviewer display name.
    pub display_name: DisplayName,
    /// Reviewer's team.
    pub team_name: TeamName,
    /// Reviewer slots held across all pull requests.
    pub total_assigned: u64,
    /// Reviewer slots held on open pull requests.
    pub open_assigned: u64,
}

/// Number of pull requests opened by one author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorStat {
    /// Author.
    pub author_id: UserId,
    /// Pull requests authored.
    pub count: u64,
}

/// Raw pull request counts as reported by a store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullRequestTotals {
    /// All pull requests.
    pub total: u64,
    /// Open pull requests.
    pub open: u64,
    /// Merged pull requests.
    pub merged: u64,
    /// Reviewer slots across all pull requests.
    pub reviewer_assignments: u64,
    /// Per-author counts, unordered.
    pub by_author: Vec<AuthorStat>,
}

/// Pull request summary exposed to clients.
#[derive(Debug, Clone, PartialEq)]
pub struct PullRequestStats {
    /// All pull requests.
    pub total: u64,
    /// Open pull requests.
    pub open: u64,
    /// Merged pull requests.
    pub merged: u64,
    /// Mean reviewer slots per pull request; zero without pull requests.
    pub average_reviewers: f64,
    /// Per-author counts, busiest first.
    pub by_author: Vec<AuthorStat>,
}

impl From<PullRequestTotals> for PullRequestStats {
    fn from(totals: PullRequestTotals) -> Self {
        let PullRequestTotals {
            total,
            open,
            merged,
            reviewer_assignments,
            mut by_author,
        } = totals;
        by_author.sort_by(|left, right| {
            Reverse(left.count)
                .cmp(&Reverse(right.count))
                .then_with(|| left.author_id.cmp(&right.author_id))
        });
        Self {
            total,
            open,
            merged,
            average_reviewers: average(reviewer_assignments, total),
            by_author,
        }
    }
}

fn average(sum: u64, count: u64) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum as f64 / count as f64
    }
}

/// Order reviewer stats by total assignments descending, then user id.
pub fn sort_reviewer_stats(stats: &mut [ReviewerStat]) {
    stats.sort_by(|left, right| {
        Reverse(left.total_assigned)
            .cmp(&Reverse(right.total_assigned))
            .then_with(|| left.user_id.cmp(&right.user_id))
    });
}
