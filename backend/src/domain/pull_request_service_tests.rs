//! Tests for the pull request service.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{MockPullRequestRepository, MockTeamRepository, MockUserRepository};
use crate::domain::{
    DisplayName, ErrorCode, PullRequestName, TeamId, TeamName, UserDraft,
};

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 11, 14, 12, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_timestamp(),
    })
}

fn uid(raw: &str) -> UserId {
    UserId::new(raw).expect("valid user id")
}

fn pr_id() -> PullRequestId {
    PullRequestId::new("pr1").expect("valid pull request id")
}

fn team_id() -> TeamId {
    TeamId::from_uuid(uuid::Uuid::nil())
}

fn member(id: &str, name: &str, is_active: bool) -> User {
    User::new(UserDraft {
        id: uid(id),
        display_name: DisplayName::new(name).expect("valid name"),
        team_id: team_id(),
        team_name: TeamName::new("core").expect("valid team"),
        is_active,
    })
}

fn open_pull_request(reviewers: &[&str]) -> PullRequest {
    PullRequest::new(PullRequestDraft {
        id: pr_id(),
        name: PullRequestName::new("feat").expect("valid name"),
        author_id: uid("a"),
        status: PullRequestStatus::Open,
        reviewers: reviewers.iter().map(|raw| uid(raw)).collect(),
        created_at: fixture_timestamp(),
        merged_at: None,
    })
    .expect("valid pull request")
}

/// Team "core": author A plus R1..R3, returned in scrambled order.
#[fixture]
fn core_team() -> Vec<User> {
    vec![
        member("r3", "R3", true),
        member("a", "A", true),
        member("r2", "R2", true),
        member("r1", "R1", true),
    ]
}

struct Mocks {
    pull_requests: MockPullRequestRepository,
    users: MockUserRepository,
    teams: MockTeamRepository,
}

#[fixture]
fn mocks() -> Mocks {
    Mocks {
        pull_requests: MockPullRequestRepository::new(),
        users: MockUserRepository::new(),
        teams: MockTeamRepository::new(),
    }
}

fn service(
    mocks: Mocks,
) -> PullRequestService<MockPullRequestRepository, MockUserRepository, MockTeamRepository> {
    PullRequestService::new(
        Arc::new(mocks.pull_requests),
        Arc::new(mocks.users),
        Arc::new(mocks.teams),
        fixture_clock(),
    )
}

fn create_request() -> CreatePullRequestRequest {
    CreatePullRequestRequest {
        id: pr_id(),
        name: PullRequestName::new("feat").expect("valid name"),
        author_id: uid("a"),
    }
}

#[rstest]
#[tokio::test]
async fn create_assigns_first_two_active_teammates(mut mocks: Mocks, core_team: Vec<User>) {
    mocks
        .users
        .expect_find_by_id()
        .times(1)
        .return_once(|_| Ok(Some(member("a", "A", true))));
    mocks
        .teams
        .expect_list_members()
        .times(1)
        .return_once(move |_| Ok(core_team));
    mocks
        .pull_requests
        .expect_create()
        .withf(|pr| pr.reviewers() == [uid("r1"), uid("r2")])
        .times(1)
        .return_once(|_| Ok(()));

    let pr = service(mocks)
        .create_pull_request(create_request())
        .await
        .expect("pull request created");

    assert_eq!(pr.status(), PullRequestStatus::Open);
    assert_eq!(pr.created_at(), fixture_timestamp());
    assert!(pr.merged_at().is_none());
    assert!(!pr.has_reviewer(&uid("a")));
}

#[rstest]
#[tokio::test]
async fn create_with_lone_author_assigns_nobody(mut mocks: Mocks) {
    mocks
        .users
        .expect_find_by_id()
        .return_once(|_| Ok(Some(member("a", "A", true))));
    mocks
        .teams
        .expect_list_members()
        .return_once(|_| Ok(vec![member("a", "A", true), member("r1", "R1", false)]));
    mocks
        .pull_requests
        .expect_create()
        .times(1)
        .return_once(|_| Ok(()));

    let pr = service(mocks)
        .create_pull_request(create_request())
        .await
        .expect("pull request created");
    assert!(pr.reviewers().is_empty());
}

#[rstest]
#[tokio::test]
async fn create_with_unknown_author_is_not_found(mut mocks: Mocks) {
    mocks.users.expect_find_by_id().return_once(|_| Ok(None));
    mocks.teams.expect_list_members().times(0);
    mocks.pull_requests.expect_create().times(0);

    let err = service(mocks)
        .create_pull_request(create_request())
        .await
        .expect_err("author missing");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn create_with_duplicate_id_conflicts(mut mocks: Mocks, core_team: Vec<User>) {
    mocks
        .users
        .expect_find_by_id()
        .return_once(|_| Ok(Some(member("a", "A", true))));
    mocks
        .teams
        .expect_list_members()
        .return_once(move |_| Ok(core_team));
    mocks
        .pull_requests
        .expect_create()
        .return_once(|_| Err(PullRequestRepositoryError::duplicate("pr1")));

    let err = service(mocks)
        .create_pull_request(create_request())
        .await
        .expect_err("duplicate id");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn merge_stamps_clock_time(mut mocks: Mocks) {
    mocks
        .pull_requests
        .expect_find_by_id()
        .return_once(|_| Ok(Some(open_pull_request(&["r1"]))));
    mocks
        .pull_requests
        .expect_update_status()
        .withf(|_, status, merged_at| {
            *status == PullRequestStatus::Merged && *merged_at == Some(fixture_timestamp())
        })
        .times(1)
        .return_once(|_, _, at| {
            Ok(Some(
                open_pull_request(&["r1"]).merge(at.expect("merge time supplied")),
            ))
        });

    let pr = service(mocks)
        .merge_pull_request(&pr_id())
        .await
        .expect("merge succeeds");
    assert!(pr.is_merged());
    assert_eq!(pr.merged_at(), Some(fixture_timestamp()));
}

#[rstest]
#[tokio::test]
async fn merge_of_merged_pull_request_is_a_no_op(mut mocks: Mocks) {
    let merged = open_pull_request(&["r1"]).merge(fixture_timestamp());
    let expected = merged.clone();
    mocks
        .pull_requests
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(merged)));
    mocks.pull_requests.expect_update_status().times(0);

    let pr = service(mocks)
        .merge_pull_request(&pr_id())
        .await
        .expect("merge is idempotent");
    assert_eq!(pr, expected);
}

#[rstest]
#[tokio::test]
async fn merge_of_missing_pull_request_is_not_found(mut mocks: Mocks) {
    mocks.pull_requests.expect_find_by_id().return_once(|_| Ok(None));

    let err = service(mocks)
        .merge_pull_request(&pr_id())
        .await
        .expect_err("missing pull request");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn reassign_picks_next_free_teammate(mut mocks: Mocks, core_team: Vec<User>) {
    mocks
        .pull_requests
        .expect_find_by_id()
        .return_once(|_| Ok(Some(open_pull_request(&["r1", "r2"]))));
    mocks
        .users
        .expect_find_by_id()
        .return_once(|_| Ok(Some(member("r1", "R1", true))));
    mocks
        .teams
        .expect_list_members()
        .return_once(move |_| Ok(core_team));
    mocks
        .pull_requests
        .expect_replace_reviewer()
        .withf(|_, old, new| old.as_str() == "r1" && new.as_str() == "r3")
        .times(1)
        .return_once(|_, _, _| Ok(open_pull_request(&["r3", "r2"])));

    let outcome = service(mocks)
        .reassign_reviewer(&pr_id(), &uid("r1"))
        .await
        .expect("reassignment succeeds");
    assert_eq!(outcome.replaced_by, uid("r3"));
    assert_eq!(outcome.pull_request.reviewers(), [uid("r3"), uid("r2")]);
}

#[rstest]
#[tokio::test]
async fn reassign_on_merged_pull_request_fails_before_membership_check(mut mocks: Mocks) {
    mocks.pull_requests.expect_find_by_id().return_once(|_| {
        Ok(Some(
            open_pull_request(&["r1"]).merge(fixture_timestamp()),
        ))
    });
    mocks.users.expect_find_by_id().times(0);

    // "zz" is not a reviewer either; the merged guard must win.
    let err = service(mocks)
        .reassign_reviewer(&pr_id(), &uid("zz"))
        .await
        .expect_err("merged pull request");
    assert_eq!(err.code(), ErrorCode::PullRequestMerged);
}

#[rstest]
#[tokio::test]
async fn reassign_of_unassigned_user_fails(mut mocks: Mocks) {
    mocks
        .pull_requests
        .expect_find_by_id()
        .return_once(|_| Ok(Some(open_pull_request(&["r1"]))));
    mocks.users.expect_find_by_id().times(0);

    let err = service(mocks)
        .reassign_reviewer(&pr_id(), &uid("r2"))
        .await
        .expect_err("r2 not assigned");
    assert_eq!(err.code(), ErrorCode::ReviewerNotAssigned);
}

#[rstest]
#[tokio::test]
async fn reassign_with_missing_reviewer_record_is_not_found(mut mocks: Mocks) {
    mocks
        .pull_requests
        .expect_find_by_id()
        .return_once(|_| Ok(Some(open_pull_request(&["r1"]))));
    mocks.users.expect_find_by_id().return_once(|_| Ok(None));

    let err = service(mocks)
        .reassign_reviewer(&pr_id(), &uid("r1"))
        .await
        .expect_err("reviewer record missing");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn reassign_without_candidates_fails(mut mocks: Mocks) {
    mocks
        .pull_requests
        .expect_find_by_id()
        .return_once(|_| Ok(Some(open_pull_request(&["r1"]))));
    mocks
        .users
        .expect_find_by_id()
        .return_once(|_| Ok(Some(member("r1", "R1", true))));
    mocks
        .teams
        .expect_list_members()
        .return_once(|_| Ok(vec![member("a", "A", true), member("r1", "R1", true)]));
    mocks.pull_requests.expect_replace_reviewer().times(0);

    let err = service(mocks)
        .reassign_reviewer(&pr_id(), &uid("r1"))
        .await
        .expect_err("no candidate");
    assert_eq!(err.code(), ErrorCode::NoReplacementCandidate);
}

#[rstest]
#[tokio::test]
async fn reassign_race_surfaces_as_conflict(mut mocks: Mocks, core_team: Vec<User>) {
    mocks
        .pull_requests
        .expect_find_by_id()
        .return_once(|_| Ok(Some(open_pull_request(&["r1", "r2"]))));
    mocks
        .users
        .expect_find_by_id()
        .return_once(|_| Ok(Some(member("r1", "R1", true))));
    mocks
        .teams
        .expect_list_members()
        .return_once(move |_| Ok(core_team));
    mocks
        .pull_requests
        .expect_replace_reviewer()
        .return_once(|_, _, _| Err(PullRequestRepositoryError::slot_conflict("r3 taken")));

    let err = service(mocks)
        .reassign_reviewer(&pr_id(), &uid("r1"))
        .await
        .expect_err("slot raced");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn connection_failures_map_to_internal_error(mut mocks: Mocks) {
    mocks
        .pull_requests
        .expect_find_by_id()
        .return_once(|_| Err(PullRequestRepositoryError::connection("refused")));

    let err = service(mocks)
        .merge_pull_request(&pr_id())
        .await
        .expect_err("store down");
    assert_eq!(err.code(), ErrorCode::InternalError);
}
