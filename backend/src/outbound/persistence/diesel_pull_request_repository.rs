//! PostgreSQL-backed `PullRequestRepository`.
//!
//! Reviewer slots live in `pull_request_reviewers` keyed by
//! `(pull_request_id, slot)` with a unique `(pull_request_id, reviewer_id)`
//! constraint. Replacement rewrites the reviewer of an existing slot under a
//! row lock on the pull request, so concurrent reassignments of the same
//! reviewer cannot both succeed.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{PullRequestRepository, PullRequestRepositoryError};
use crate::domain::{PullRequest, PullRequestId, PullRequestStatus, UserId};

use super::diesel_helpers::{DieselFailure, classify_diesel_error, collect_rows, map_pool_error};
use super::models::{NewPullRequestRow, NewReviewerSlotRow, PullRequestRow, ReviewerSlotRow};
use super::pool::DbPool;
use super::schema::{pull_request_reviewers, pull_requests};

/// Diesel implementation of [`PullRequestRepository`].
#[derive(Clone)]
pub struct DieselPullRequestRepository {
    pool: DbPool,
}

impl DieselPullRequestRepository {
    /// Create a repository over the pool.
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> PullRequestRepositoryError {
    match classify_diesel_error(error, "pull_request") {
        DieselFailure::Connection(message) => PullRequestRepositoryError::connection(message),
        DieselFailure::UniqueViolation { constraint } => PullRequestRepositoryError::query(format!(
            "unexpected unique violation on {}",
            constraint.as_deref().unwrap_or("unknown constraint")
        )),
        DieselFailure::Query(message) => PullRequestRepositoryError::query(message),
    }
}

fn map_pool(error: super::pool::PoolError) -> PullRequestRepositoryError {
    map_pool_error(error, PullRequestRepositoryError::connection)
}

/// Failure inside the reviewer replacement transaction.
#[derive(Debug)]
enum ReplaceError {
    Diesel(diesel::result::Error),
    Conflict(String),
    InvalidRow(String),
}

impl From<diesel::result::Error> for ReplaceError {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

impl From<ReplaceError> for PullRequestRepositoryError {
    fn from(error: ReplaceError) -> Self {
        match error {
            ReplaceError::Conflict(message) => Self::slot_conflict(message),
            ReplaceError::InvalidRow(message) => Self::query(message),
            ReplaceError::Diesel(err) => match classify_diesel_error(err, "replace_reviewer") {
                DieselFailure::UniqueViolation { .. } => {
                    Self::slot_conflict("replacement is already a reviewer")
                }
                DieselFailure::Connection(message) => Self::connection(message),
                DieselFailure::Query(message) => Self::query(message),
            },
        }
    }
}

fn slot_index(position: usize) -> QueryResult<i16> {
    i16::try_from(position).map_err(|err| diesel::result::Error::SerializationError(Box::new(err)))
}

async fn load_slots(conn: &mut AsyncPgConnection, id: &str) -> QueryResult<Vec<ReviewerSlotRow>> {
    pull_request_reviewers::table
        .filter(pull_request_reviewers::pull_request_id.eq(id))
        .select(ReviewerSlotRow::as_select())
        .order_by(pull_request_reviewers::slot.asc())
        .load(conn)
        .await
}

async fn load_pull_request(
    conn: &mut AsyncPgConnection,
    id: &str,
) -> Result<Option<PullRequest>, PullRequestRepositoryError> {
    let row: Option<PullRequestRow> = pull_requests::table
        .filter(pull_requests::id.eq(id))
        .select(PullRequestRow::as_select())
        .first(conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;
    let Some(row) = row else {
        return Ok(None);
    };
    let slots = load_slots(conn, id).await.map_err(map_diesel_error)?;
    row.into_pull_request(slots)
        .map(Some)
        .map_err(PullRequestRepositoryError::query)
}

#[async_trait]
impl PullRequestRepository for DieselPullRequestRepository {
    async fn create(&self, pull_request: &PullRequest) -> Result<(), PullRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let id = pull_request.id().as_str();

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                diesel::insert_into(pull_requests::table)
                    .values(&NewPullRequestRow {
                        id,
                        name: pull_request.name().as_str(),
                        author_id: pull_request.author_id().as_str(),
                        status: pull_request.status().as_str(),
                        created_at: pull_request.created_at(),
                        merged_at: pull_request.merged_at(),
                    })
                    .execute(conn)
                    .await?;

                let slots = pull_request
                    .reviewers()
                    .iter()
                    .enumerate()
                    .map(|(position, reviewer)| {
                        slot_index(position).map(|slot| NewReviewerSlotRow {
                            pull_request_id: id,
                            slot,
                            reviewer_id: reviewer.as_str(),
                        })
                    })
                    .collect::<QueryResult<Vec<_>>>()?;
                if !slots.is_empty() {
                    diesel::insert_into(pull_request_reviewers::table)
                        .values(&slots)
                        .execute(conn)
                        .await?;
                }
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| match classify_diesel_error(err, "create_pull_request") {
            DieselFailure::UniqueViolation { .. } => PullRequestRepositoryError::duplicate(id),
            DieselFailure::Connection(message) => PullRequestRepositoryError::connection(message),
            DieselFailure::Query(message) => PullRequestRepositoryError::query(message),
        })
    }

    async fn find_by_id(
        &self,
        id: &PullRequestId,
    ) -> Result<Option<PullRequest>, PullRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        load_pull_request(&mut conn, id.as_str()).await
    }

    async fn update_status(
        &self,
        id: &PullRequestId,
        status: PullRequestStatus,
        merged_at: Option<DateTime<Utc>>,
    ) -> Result<Option<PullRequest>, PullRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        // The status guard makes a repeated transition a no-op that keeps the
        // first merge timestamp.
        diesel::update(
            pull_requests::table
                .filter(pull_requests::id.eq(id.as_str()))
                .filter(pull_requests::status.ne(status.as_str())),
        )
        .set((
            pull_requests::status.eq(status.as_str()),
            pull_requests::merged_at.eq(merged_at),
        ))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        load_pull_request(&mut conn, id.as_str()).await
    }

    async fn list_by_reviewer(
        &self,
        reviewer: &UserId,
    ) -> Result<Vec<PullRequest>, PullRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let assigned = pull_request_reviewers::table
            .filter(pull_request_reviewers::reviewer_id.eq(reviewer.as_str()))
            .select(pull_request_reviewers::pull_request_id);
        let rows: Vec<PullRequestRow> = pull_requests::table
            .filter(pull_requests::id.eq_any(assigned))
            .select(PullRequestRow::as_select())
            .order_by((pull_requests::created_at.asc(), pull_requests::id.asc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<&str> = rows.iter().map(|row| row.id.as_str()).collect();
        let slot_rows: Vec<ReviewerSlotRow> = pull_request_reviewers::table
            .filter(pull_request_reviewers::pull_request_id.eq_any(ids))
            .select(ReviewerSlotRow::as_select())
            .order_by((
                pull_request_reviewers::pull_request_id.asc(),
                pull_request_reviewers::slot.asc(),
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let mut slots: HashMap<String, Vec<ReviewerSlotRow>> = HashMap::new();
        for slot in slot_rows {
            slots
                .entry(slot.pull_request_id.clone())
                .or_default()
                .push(slot);
        }

        collect_rows(
            rows.into_iter().map(|row| {
                let own = slots.remove(&row.id).unwrap_or_default();
                row.into_pull_request(own)
            }),
            PullRequestRepositoryError::query,
        )
    }

    async fn replace_reviewer(
        &self,
        id: &PullRequestId,
        old: &UserId,
        new: &UserId,
    ) -> Result<PullRequest, PullRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let updated = conn
            .transaction::<_, ReplaceError, _>(|conn| {
                async move {
                    let row: Option<PullRequestRow> = pull_requests::table
                        .filter(pull_requests::id.eq(id.as_str()))
                        .select(PullRequestRow::as_select())
                        .for_update()
                        .get_result(conn)
                        .await
                        .optional()?;
                    let row = row.ok_or_else(|| {
                        ReplaceError::Conflict(format!("pull request {id} disappeared"))
                    })?;
                    if row.status != PullRequestStatus::Open.as_str() {
                        return Err(ReplaceError::Conflict(format!(
                            "pull request {id} was merged"
                        )));
                    }

                    let changed = diesel::update(
                        pull_request_reviewers::table
                            .filter(pull_request_reviewers::pull_request_id.eq(id.as_str()))
                            .filter(pull_request_reviewers::reviewer_id.eq(old.as_str())),
                    )
                    .set((
                        pull_request_reviewers::reviewer_id.eq(new.as_str()),
                        pull_request_reviewers::assigned_at.eq(diesel::dsl::now),
                    ))
                    .execute(conn)
                    .await?;
                    if changed == 0 {
                        return Err(ReplaceError::Conflict(format!(
                            "{old} is no longer assigned"
                        )));
                    }

                    let slots = load_slots(conn, id.as_str()).await?;
                    row.into_pull_request(slots).map_err(ReplaceError::InvalidRow)
                }
                .scope_boxed()
            })
            .await?;
        Ok(updated)
    }
}
