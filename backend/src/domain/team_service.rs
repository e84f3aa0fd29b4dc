//! Team synchronisation and lookup.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::ports::{
    TeamCommand, TeamQuery, TeamRepository, TeamRepositoryError, UpdateTeamRequest,
};
use crate::domain::{DomainError, Team, TeamName, TeamRoster, first_duplicate_member, sort_members};

fn map_repository_error(error: TeamRepositoryError) -> DomainError {
    match error {
        TeamRepositoryError::Connection { message } => {
            DomainError::internal(format!("team repository unavailable: {message}"))
        }
        TeamRepositoryError::Query { message } => {
            DomainError::internal(format!("team repository error: {message}"))
        }
        TeamRepositoryError::Duplicate { name } => {
            DomainError::conflict(format!("team {name} already exists"))
        }
    }
}

/// Team service implementing [`TeamCommand`] and [`TeamQuery`].
#[derive(Clone)]
pub struct TeamService<T> {
    teams: Arc<T>,
}

impl<T> TeamService<T> {
    /// Create the service over a team repository.
    pub const fn new(teams: Arc<T>) -> Self {
        Self { teams }
    }
}

impl<T> TeamService<T>
where
    T: TeamRepository,
{
    async fn roster(&self, team: Team) -> Result<TeamRoster, DomainError> {
        let mut members = self
            .teams
            .list_members(&team.id())
            .await
            .map_err(map_repository_error)?;
        sort_members(&mut members);
        Ok(TeamRoster { team, members })
    }

    async fn upsert_existing(&self, request: &UpdateTeamRequest) -> Result<Option<Team>, DomainError> {
        let Some(team) = self
            .teams
            .find_by_name(&request.team_name)
            .await
            .map_err(map_repository_error)?
        else {
            return Ok(None);
        };
        self.teams
            .upsert_members(&team, &request.members)
            .await
            .map_err(map_repository_error)?;
        Ok(Some(team))
    }
}

#[async_trait]
impl<T> TeamCommand for TeamService<T>
where
    T: TeamRepository,
{
    async fn update_team(&self, request: UpdateTeamRequest) -> Result<TeamRoster, DomainError> {
        if let Some(duplicate) = first_duplicate_member(&request.members) {
            return Err(
                DomainError::invalid_request(format!("member {duplicate} is listed more than once"))
                    .with_details(json!({
                        "field": "members",
                        "value": duplicate.as_str(),
                        "code": "duplicate_member",
                    })),
            );
        }

        let team = match self.upsert_existing(&request).await? {
            Some(team) => team,
            None => match self
                .teams
                .create_with_members(&request.team_name, &request.members)
                .await
            {
                Ok(team) => team,
                // Lost a creation race; the winner's team now exists.
                Err(TeamRepositoryError::Duplicate { name }) => {
                    debug!(team = %name, "team created concurrently, upserting members");
                    self.upsert_existing(&request).await?.ok_or_else(|| {
                        DomainError::conflict(format!("team {name} changed concurrently"))
                    })?
                }
                Err(other) => return Err(map_repository_error(other)),
            },
        };

        info!(
            team = %team.name(),
            members = request.members.len(),
            "team synchronised"
        );
        self.roster(team).await
    }
}

#[async_trait]
impl<T> TeamQuery for TeamService<T>
where
    T: TeamRepository,
{
    async fn get_team(&self, name: &TeamName) -> Result<TeamRoster, DomainError> {
        let team = self
            .teams
            .find_by_name(name)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| DomainError::not_found(format!("team {name} not found")))?;
        self.roster(team).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockTeamRepository;
    use crate::domain::{
        DisplayName, ErrorCode, TeamId, TeamMember, User, UserDraft, UserId,
    };
    use rstest::{fixture, rstest};

    fn team_name() -> TeamName {
        TeamName::new("core").expect("valid team name")
    }

    fn team() -> Team {
        Team::new(TeamId::from_uuid(uuid::Uuid::nil()), team_name())
    }

    fn member(id: &str, name: &str) -> TeamMember {
        TeamMember {
            id: UserId::new(id).expect("valid id"),
            display_name: DisplayName::new(name).expect("valid name"),
            is_active: true,
        }
    }

    fn user(id: &str, name: &str) -> User {
        User::new(UserDraft {
            id: UserId::new(id).expect("valid id"),
            display_name: DisplayName::new(name).expect("valid name"),
            team_id: team().id(),
            team_name: team_name(),
            is_active: true,
        })
    }

    #[fixture]
    fn request() -> UpdateTeamRequest {
        UpdateTeamRequest {
            team_name: team_name(),
            members: vec![member("u2", "Bob"), member("u1", "Alice")],
        }
    }

    #[rstest]
    #[tokio::test]
    async fn creates_missing_team_with_members(request: UpdateTeamRequest) {
        let mut repo = MockTeamRepository::new();
        repo.expect_find_by_name().times(1).return_once(|_| Ok(None));
        repo.expect_create_with_members()
            .withf(|_, members| members.len() == 2)
            .times(1)
            .return_once(|_, _| Ok(team()));
        repo.expect_upsert_members().times(0);
        repo.expect_list_members()
            .times(1)
            .return_once(|_| Ok(vec![user("u2", "Bob"), user("u1", "Alice")]));

        let service = TeamService::new(Arc::new(repo));
        let roster = service.update_team(request).await.expect("team created");

        let names: Vec<&str> = roster
            .members
            .iter()
            .map(|m| m.display_name().as_str())
            .collect();
        assert_eq!(names, ["Alice", "Bob"]);
    }

    #[rstest]
    #[tokio::test]
    async fn upserts_members_of_existing_team(request: UpdateTeamRequest) {
        let mut repo = MockTeamRepository::new();
        repo.expect_find_by_name()
            .times(1)
            .return_once(|_| Ok(Some(team())));
        repo.expect_create_with_members().times(0);
        repo.expect_upsert_members().times(1).return_once(|_, _| Ok(()));
        repo.expect_list_members().times(1).return_once(|_| Ok(vec![]));

        let service = TeamService::new(Arc::new(repo));
        let roster = service.update_team(request).await.expect("team updated");
        assert_eq!(roster.team, team());
    }

    #[rstest]
    #[tokio::test]
    async fn recovers_from_concurrent_creation(request: UpdateTeamRequest) {
        let mut repo = MockTeamRepository::new();
        let mut lookups = vec![Some(team()), None];
        repo.expect_find_by_name()
            .times(2)
            .returning(move |_| Ok(lookups.pop().flatten()));
        repo.expect_create_with_members()
            .times(1)
            .return_once(|_, _| Err(TeamRepositoryError::duplicate("core")));
        repo.expect_upsert_members().times(1).return_once(|_, _| Ok(()));
        repo.expect_list_members().times(1).return_once(|_| Ok(vec![]));

        let service = TeamService::new(Arc::new(repo));
        service.update_team(request).await.expect("race resolved");
    }

    #[rstest]
    #[tokio::test]
    async fn rejects_duplicate_members_before_touching_storage() {
        let mut repo = MockTeamRepository::new();
        repo.expect_find_by_name().times(0);

        let service = TeamService::new(Arc::new(repo));
        let err = service
            .update_team(UpdateTeamRequest {
                team_name: team_name(),
                members: vec![member("u1", "Alice"), member("u1", "Alias")],
            })
            .await
            .expect_err("duplicate rejected");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[case(TeamRepositoryError::connection("refused"), ErrorCode::InternalError)]
    #[case(TeamRepositoryError::query("syntax"), ErrorCode::InternalError)]
    #[tokio::test]
    async fn maps_lookup_failures(
        request: UpdateTeamRequest,
        #[case] failure: TeamRepositoryError,
        #[case] code: ErrorCode,
    ) {
        let mut repo = MockTeamRepository::new();
        repo.expect_find_by_name()
            .times(1)
            .return_once(move |_| Err(failure));

        let service = TeamService::new(Arc::new(repo));
        let err = service.update_team(request).await.expect_err("lookup fails");
        assert_eq!(err.code(), code);
    }

    #[rstest]
    #[tokio::test]
    async fn get_team_sorts_members() {
        let mut repo = MockTeamRepository::new();
        repo.expect_find_by_name()
            .times(1)
            .return_once(|_| Ok(Some(team())));
        repo.expect_list_members().times(1).return_once(|_| {
            Ok(vec![user("u3", "Carol"), user("u1", "Alice"), user("u2", "Bob")])
        });

        let service = TeamService::new(Arc::new(repo));
        let roster = service.get_team(&team_name()).await.expect("team found");
        let ids: Vec<&str> = roster.members.iter().map(|m| m.id().as_str()).collect();
        assert_eq!(ids, ["u1", "u2", "u3"]);
    }

    #[rstest]
    #[tokio::test]
    async fn get_team_reports_missing_team() {
        let mut repo = MockTeamRepository::new();
        repo.expect_find_by_name().times(1).return_once(|_| Ok(None));

        let service = TeamService::new(Arc::new(repo));
        let err = service
            .get_team(&team_name())
            .await
            .expect_err("team missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
