//! Driven port for team persistence.

use async_trait::async_trait;

use crate::domain::{Team, TeamId, TeamMember, TeamName, User};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by team repository adapters.
    pub enum TeamRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "team repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "team repository query failed: {message}",
        /// A team with this name already exists.
        Duplicate { name: String } => "team {name} already exists",
    }
}

/// Team storage.
///
/// Multi-row writes are atomic: either every member row lands or none does.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TeamRepository: Send + Sync {
    /// Look a team up by its unique name.
    async fn find_by_name(&self, name: &TeamName) -> Result<Option<Team>, TeamRepositoryError>;

    /// Create a team and upsert its members in one transaction.
    ///
    /// Fails with [`TeamRepositoryError::Duplicate`] when the name is taken.
    async fn create_with_members(
        &self,
        name: &TeamName,
        members: &[TeamMember],
    ) -> Result<Team, TeamRepositoryError>;

    /// Insert or update members of an existing team, moving users from other
    /// teams when needed.
    async fn upsert_members(
        &self,
        team: &Team,
        members: &[TeamMember],
    ) -> Result<(), TeamRepositoryError>;

    /// All members of a team, in no particular order.
    async fn list_members(&self, team_id: &TeamId) -> Result<Vec<User>, TeamRepositoryError>;
}
