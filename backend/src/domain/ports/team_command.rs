//! Driving ports for team synchronisation and lookup.

use async_trait::async_trait;

use crate::domain::{DomainError, TeamMember, TeamName, TeamRoster};

/// Request to create or update a team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTeamRequest {
    /// Team to create when missing.
    pub team_name: TeamName,
    /// Members to upsert under the team.
    pub members: Vec<TeamMember>,
}

/// Driving port for team writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TeamCommand: Send + Sync {
    /// Create the team when absent and upsert every listed member.
    ///
    /// Returns the team with its full, sorted member list. Members not listed
    /// in the request stay on the team untouched.
    async fn update_team(&self, request: UpdateTeamRequest) -> Result<TeamRoster, DomainError>;
}

/// Driving port for team reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TeamQuery: Send + Sync {
    /// Fetch a team and its members ordered by display name.
    async fn get_team(&self, name: &TeamName) -> Result<TeamRoster, DomainError>;
}
