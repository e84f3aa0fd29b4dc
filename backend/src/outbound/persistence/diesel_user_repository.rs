//! PostgreSQL-backed `UserRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{User, UserId};

use super::diesel_helpers::{map_basic_diesel_error, map_pool_error};
use super::models::UserWithTeamRow;
use super::pool::DbPool;
use super::schema::{teams, users};

/// Diesel implementation of [`UserRepository`].
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a repository over the pool.
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> UserRepositoryError {
    map_basic_diesel_error(
        error,
        "user",
        UserRepositoryError::query,
        UserRepositoryError::connection,
    )
}

async fn load_user(
    conn: &mut AsyncPgConnection,
    id: &UserId,
) -> Result<Option<User>, UserRepositoryError> {
    let row: Option<UserWithTeamRow> = users::table
        .inner_join(teams::table)
        .filter(users::id.eq(id.as_str()))
        .select((
            users::id,
            users::username,
            users::team_id,
            users::is_active,
            teams::name,
        ))
        .first(conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

    row.map(UserWithTeamRow::into_user)
        .transpose()
        .map_err(UserRepositoryError::query)
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserRepositoryError::connection))?;
        load_user(&mut conn, id).await
    }

    async fn set_activity(
        &self,
        id: &UserId,
        is_active: bool,
    ) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserRepositoryError::connection))?;

        let updated = diesel::update(users::table.filter(users::id.eq(id.as_str())))
            .set((
                users::is_active.eq(is_active),
                users::updated_at.eq(diesel::dsl::now),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if updated == 0 {
            return Ok(None);
        }
        load_user(&mut conn, id).await
    }
}
