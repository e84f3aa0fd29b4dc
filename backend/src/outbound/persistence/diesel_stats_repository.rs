//! PostgreSQL-backed `StatsRepository` using aggregate SQL.
//!
//! Counts are computed in the database. Ordering and averages are left to
//! the domain.

use async_trait::async_trait;
use diesel::sql_query;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{StatsRepository, StatsRepositoryError};
use crate::domain::{AuthorStat, DisplayName, PullRequestTotals, ReviewerStat, TeamName, UserId};

use super::diesel_helpers::{collect_rows, count_to_u64, map_basic_diesel_error, map_pool_error};
use super::models::{AuthorCountRow, PullRequestTotalsRow, ReviewerStatRow};
use super::pool::DbPool;

const REVIEWER_STATS_SQL: &str = r"
SELECT u.id AS user_id,
       u.username AS username,
       t.name AS team_name,
       COUNT(*) AS total_assigned,
       COUNT(*) FILTER (WHERE pr.status = 'OPEN') AS open_assigned
FROM pull_request_reviewers r
JOIN users u ON u.id = r.reviewer_id
JOIN teams t ON t.id = u.team_id
JOIN pull_requests pr ON pr.id = r.pull_request_id
GROUP BY u.id, u.username, t.name
";

const PULL_REQUEST_TOTALS_SQL: &str = r"
SELECT COUNT(*) AS total,
       COUNT(*) FILTER (WHERE status = 'OPEN') AS open,
       COUNT(*) FILTER (WHERE status = 'MERGED') AS merged,
       (SELECT COUNT(*) FROM pull_request_reviewers) AS reviewer_assignments
FROM pull_requests
";

const AUTHOR_COUNTS_SQL: &str = r"
SELECT author_id, COUNT(*) AS count
FROM pull_requests
GROUP BY author_id
";

/// Diesel implementation of [`StatsRepository`].
#[derive(Clone)]
pub struct DieselStatsRepository {
    pool: DbPool,
}

impl DieselStatsRepository {
    /// Create a repository over the pool.
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> StatsRepositoryError {
    map_basic_diesel_error(
        error,
        "stats",
        StatsRepositoryError::query,
        StatsRepositoryError::connection,
    )
}

fn reviewer_stat_from_row(row: ReviewerStatRow) -> Result<ReviewerStat, String> {
    Ok(ReviewerStat {
        user_id: UserId::new(row.user_id).map_err(|err| err.to_string())?,
        display_name: DisplayName::new(row.username).map_err(|err| err.to_string())?,
        team_name: TeamName::new(row.team_name).map_err(|err| err.to_string())?,
        total_assigned: count_to_u64(row.total_assigned),
        open_assigned: count_to_u64(row.open_assigned),
    })
}

fn author_stat_from_row(row: AuthorCountRow) -> Result<AuthorStat, String> {
    Ok(AuthorStat {
        author_id: UserId::new(row.author_id).map_err(|err| err.to_string())?,
        count: count_to_u64(row.count),
    })
}

#[async_trait]
impl StatsRepository for DieselStatsRepository {
    async fn reviewer_stats(&self) -> Result<Vec<ReviewerStat>, StatsRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, StatsRepositoryError::connection))?;

        let rows: Vec<ReviewerStatRow> = sql_query(REVIEWER_STATS_SQL)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        collect_rows(
            rows.into_iter().map(reviewer_stat_from_row),
            StatsRepositoryError::query,
        )
    }

    async fn pull_request_totals(&self) -> Result<PullRequestTotals, StatsRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, StatsRepositoryError::connection))?;

        let totals: PullRequestTotalsRow = sql_query(PULL_REQUEST_TOTALS_SQL)
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let author_rows: Vec<AuthorCountRow> = sql_query(AUTHOR_COUNTS_SQL)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let by_author = collect_rows(
            author_rows.into_iter().map(author_stat_from_row),
            StatsRepositoryError::query,
        )?;

        Ok(PullRequestTotals {
            total: count_to_u64(totals.total),
            open: count_to_u64(totals.open),
            merged: count_to_u64(totals.merged),
            reviewer_assignments: count_to_u64(totals.reviewer_assignments),
            by_author,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn reviewer_row_converts_counts() {
        let stat = reviewer_stat_from_row(ReviewerStatRow {
            user_id: "u1".to_owned(),
            username: "Alice".to_owned(),
            team_name: "core".to_owned(),
            total_assigned: 3,
            open_assigned: 1,
        })
        .expect("valid row");
        assert_eq!(stat.user_id.as_str(), "u1");
        assert_eq!((stat.total_assigned, stat.open_assigned), (3, 1));
    }

    #[rstest]
    fn blank_author_row_is_rejected() {
        let result = author_stat_from_row(AuthorCountRow {
            author_id: String::new(),
            count: 1,
        });
        assert!(result.is_err());
    }
}
