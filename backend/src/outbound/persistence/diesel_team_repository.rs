//! PostgreSQL-backed `TeamRepository`.
//!
//! Team creation and its member upserts run in one transaction so a failed
//! member write never leaves an empty team behind.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{TeamRepository, TeamRepositoryError};
use crate::domain::{Team, TeamId, TeamMember, TeamName, User};

use super::diesel_helpers::{DieselFailure, classify_diesel_error, collect_rows, map_pool_error};
use super::models::{NewTeamRow, NewUserRow, TeamRow, UserWithTeamRow};
use super::pool::DbPool;
use super::schema::{teams, users};

/// Diesel implementation of [`TeamRepository`].
#[derive(Clone)]
pub struct DieselTeamRepository {
    pool: DbPool,
}

impl DieselTeamRepository {
    /// Create a repository over the pool.
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_diesel_error(error: diesel::result::Error, name: &TeamName) -> TeamRepositoryError {
    match classify_diesel_error(error, "team") {
        DieselFailure::Connection(message) => TeamRepositoryError::connection(message),
        DieselFailure::UniqueViolation { .. } => TeamRepositoryError::duplicate(name.as_str()),
        DieselFailure::Query(message) => TeamRepositoryError::query(message),
    }
}

fn map_query_error(error: diesel::result::Error) -> TeamRepositoryError {
    match classify_diesel_error(error, "team") {
        DieselFailure::Connection(message) => TeamRepositoryError::connection(message),
        DieselFailure::UniqueViolation { constraint } => TeamRepositoryError::query(format!(
            "unexpected unique violation on {}",
            constraint.as_deref().unwrap_or("unknown constraint")
        )),
        DieselFailure::Query(message) => TeamRepositoryError::query(message),
    }
}

async fn upsert_member_rows(
    conn: &mut AsyncPgConnection,
    team_id: Uuid,
    members: &[TeamMember],
) -> QueryResult<()> {
    if members.is_empty() {
        return Ok(());
    }
    let rows: Vec<NewUserRow<'_>> = members
        .iter()
        .map(|member| NewUserRow {
            id: member.id.as_str(),
            username: member.display_name.as_str(),
            team_id,
            is_active: member.is_active,
        })
        .collect();

    diesel::insert_into(users::table)
        .values(&rows)
        .on_conflict(users::id)
        .do_update()
        .set((
            users::username.eq(excluded(users::username)),
            users::team_id.eq(excluded(users::team_id)),
            users::is_active.eq(excluded(users::is_active)),
            users::updated_at.eq(diesel::dsl::now),
        ))
        .execute(conn)
        .await?;
    Ok(())
}

#[async_trait]
impl TeamRepository for DieselTeamRepository {
    async fn find_by_name(&self, name: &TeamName) -> Result<Option<Team>, TeamRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, TeamRepositoryError::connection))?;

        let row: Option<TeamRow> = teams::table
            .filter(teams::name.eq(name.as_str()))
            .select(TeamRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_query_error)?;

        Ok(row.map(|row| Team::new(TeamId::from_uuid(row.id), name.clone())))
    }

    async fn create_with_members(
        &self,
        name: &TeamName,
        members: &[TeamMember],
    ) -> Result<Team, TeamRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, TeamRepositoryError::connection))?;
        let id = TeamId::random();
        let team_id = *id.as_uuid();

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                diesel::insert_into(teams::table)
                    .values(&NewTeamRow {
                        id: team_id,
                        name: name.as_str(),
                    })
                    .execute(conn)
                    .await?;
                upsert_member_rows(conn, team_id, members).await
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| map_diesel_error(err, name))?;

        Ok(Team::new(id, name.clone()))
    }

    async fn upsert_members(
        &self,
        team: &Team,
        members: &[TeamMember],
    ) -> Result<(), TeamRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, TeamRepositoryError::connection))?;

        upsert_member_rows(&mut conn, *team.id().as_uuid(), members)
            .await
            .map_err(map_query_error)
    }

    async fn list_members(&self, team_id: &TeamId) -> Result<Vec<User>, TeamRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, TeamRepositoryError::connection))?;

        let rows: Vec<UserWithTeamRow> = users::table
            .inner_join(teams::table)
            .filter(users::team_id.eq(team_id.as_uuid()))
            .select((
                users::id,
                users::username,
                users::team_id,
                users::is_active,
                teams::name,
            ))
            .order_by((users::username.asc(), users::id.asc()))
            .load(&mut conn)
            .await
            .map_err(map_query_error)?;

        collect_rows(
            rows.into_iter().map(UserWithTeamRow::into_user),
            TeamRepositoryError::query,
        )
    }
}
