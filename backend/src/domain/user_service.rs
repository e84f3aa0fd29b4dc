//! User activity toggling and per-reviewer listings.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{
    PullRequestRepository, PullRequestRepositoryError, ReviewQuery, UserCommand, UserRepository,
    UserRepositoryError,
};
use crate::domain::{DomainError, PullRequest, User, UserId};

fn map_user_error(error: UserRepositoryError) -> DomainError {
    match error {
        UserRepositoryError::Connection { message } => {
            DomainError::internal(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            DomainError::internal(format!("user repository error: {message}"))
        }
    }
}

fn map_pull_request_error(error: PullRequestRepositoryError) -> DomainError {
    match error {
        PullRequestRepositoryError::Connection { message } => {
            DomainError::internal(format!("pull request repository unavailable: {message}"))
        }
        other => DomainError::internal(format!("pull request repository error: {other}")),
    }
}

/// User service implementing [`UserCommand`] and [`ReviewQuery`].
#[derive(Clone)]
pub struct UserService<U, P> {
    users: Arc<U>,
    pull_requests: Arc<P>,
}

impl<U, P> UserService<U, P> {
    /// Create the service over user and pull request repositories.
    pub const fn new(users: Arc<U>, pull_requests: Arc<P>) -> Self {
        Self {
            users,
            pull_requests,
        }
    }
}

#[async_trait]
impl<U, P> UserCommand for UserService<U, P>
where
    U: UserRepository,
    P: PullRequestRepository,
{
    async fn set_user_active(&self, id: &UserId, is_active: bool) -> Result<User, DomainError> {
        let user = self
            .users
            .set_activity(id, is_active)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| DomainError::not_found(format!("user {id} not found")))?;
        info!(user_id = %id, is_active, "user activity changed");
        Ok(user)
    }
}

#[async_trait]
impl<U, P> ReviewQuery for UserService<U, P>
where
    U: UserRepository,
    P: PullRequestRepository,
{
    async fn list_reviews(&self, reviewer: &UserId) -> Result<Vec<PullRequest>, DomainError> {
        self.pull_requests
            .list_by_reviewer(reviewer)
            .await
            .map_err(map_pull_request_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockPullRequestRepository, MockUserRepository};
    use crate::domain::{DisplayName, ErrorCode, TeamId, TeamName, UserDraft};
    use rstest::rstest;

    fn uid(raw: &str) -> UserId {
        UserId::new(raw).expect("valid user id")
    }

    fn stored_user(is_active: bool) -> User {
        User::new(UserDraft {
            id: uid("u1"),
            display_name: DisplayName::new("Alice").expect("valid name"),
            team_id: TeamId::random(),
            team_name: TeamName::new("core").expect("valid team"),
            is_active,
        })
    }

    #[rstest]
    #[case(true)]
    #[case(false)]
    #[tokio::test]
    async fn set_user_active_returns_updated_user(#[case] flag: bool) {
        let mut users = MockUserRepository::new();
        users
            .expect_set_activity()
            .withf(move |id, active| id.as_str() == "u1" && *active == flag)
            .times(1)
            .return_once(move |_, _| Ok(Some(stored_user(flag))));

        let service = UserService::new(Arc::new(users), Arc::new(MockPullRequestRepository::new()));
        let user = service
            .set_user_active(&uid("u1"), flag)
            .await
            .expect("user updated");
        assert_eq!(user.is_active(), flag);
    }

    #[rstest]
    #[tokio::test]
    async fn set_user_active_reports_missing_user() {
        let mut users = MockUserRepository::new();
        users
            .expect_set_activity()
            .times(1)
            .return_once(|_, _| Ok(None));

        let service = UserService::new(Arc::new(users), Arc::new(MockPullRequestRepository::new()));
        let err = service
            .set_user_active(&uid("ghost"), false)
            .await
            .expect_err("missing user");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn list_reviews_maps_connection_failure() {
        let mut pull_requests = MockPullRequestRepository::new();
        pull_requests
            .expect_list_by_reviewer()
            .times(1)
            .return_once(|_| Err(PullRequestRepositoryError::connection("refused")));

        let service = UserService::new(Arc::new(MockUserRepository::new()), Arc::new(pull_requests));
        let err = service
            .list_reviews(&uid("u1"))
            .await
            .expect_err("store down");
        assert_eq!(err.code(), ErrorCode::InternalError);
    }

    #[rstest]
    #[tokio::test]
    async fn list_reviews_returns_empty_for_unknown_user() {
        let mut pull_requests = MockPullRequestRepository::new();
        pull_requests
            .expect_list_by_reviewer()
            .times(1)
            .return_once(|_| Ok(vec![]));

        let service = UserService::new(Arc::new(MockUserRepository::new()), Arc::new(pull_requests));
        let reviews = service
            .list_reviews(&uid("nobody"))
            .await
            .expect("listing succeeds");
        assert!(reviews.is_empty());
    }
}
