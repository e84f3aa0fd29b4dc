//! Shared fixtures for HTTP handler tests.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use chrono::{TimeZone, Utc};
use serde_json::Value;

use crate::domain::ports::{
    MockPullRequestCommand, MockReviewQuery, MockStatsQuery, MockTeamCommand, MockTeamQuery,
    MockUserCommand,
};
use crate::domain::{
    DisplayName, PullRequest, PullRequestDraft, PullRequestId, PullRequestName,
    PullRequestStatus, TeamId, TeamName, User, UserDraft, UserId,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::inbound::http::{pull_requests, stats, teams, users, validation};

/// Mock driving ports; unused mocks panic if a handler calls them.
#[derive(Default)]
pub(crate) struct MockPorts {
    pub teams: MockTeamCommand,
    pub teams_query: MockTeamQuery,
    pub users: MockUserCommand,
    pub reviews: MockReviewQuery,
    pub pull_requests: MockPullRequestCommand,
    pub stats: MockStatsQuery,
}

impl MockPorts {
    pub(crate) fn into_state(self) -> HttpState {
        HttpState::new(HttpStatePorts {
            teams: Arc::new(self.teams),
            teams_query: Arc::new(self.teams_query),
            users: Arc::new(self.users),
            reviews: Arc::new(self.reviews),
            pull_requests: Arc::new(self.pull_requests),
            stats: Arc::new(self.stats),
        })
    }
}

/// App with every review endpoint mounted over `ports`.
pub(crate) fn test_app(
    ports: MockPorts,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(ports.into_state()))
        .app_data(validation::json_config())
        .app_data(validation::query_config())
        .service(teams::add_team)
        .service(teams::get_team)
        .service(users::set_is_active)
        .service(users::get_review)
        .service(pull_requests::create_pull_request)
        .service(pull_requests::merge_pull_request)
        .service(pull_requests::reassign_reviewer)
        .service(stats::reviewer_stats)
        .service(stats::pull_request_stats)
}

/// Send `request` through a fresh app and decode the JSON body.
///
/// Empty or non-JSON bodies decode as `Value::Null`.
pub(crate) async fn send(
    ports: MockPorts,
    request: actix_test::TestRequest,
) -> (StatusCode, Value) {
    let app = actix_test::init_service(test_app(ports)).await;
    let response = actix_test::call_service(&app, request.to_request()).await;
    let status = response.status();
    let body = actix_test::read_body(response).await;
    let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, value)
}

pub(crate) fn user_id(raw: &str) -> UserId {
    UserId::new(raw).expect("valid user id")
}

pub(crate) fn member(id: &str, name: &str, team: &str, is_active: bool) -> User {
    User::new(UserDraft {
        id: user_id(id),
        display_name: DisplayName::new(name).expect("valid display name"),
        team_id: TeamId::random(),
        team_name: TeamName::new(team).expect("valid team name"),
        is_active,
    })
}

pub(crate) fn open_pull_request(id: &str, author: &str, reviewers: &[&str]) -> PullRequest {
    PullRequest::new(PullRequestDraft {
        id: PullRequestId::new(id).expect("valid pull request id"),
        name: PullRequestName::new(format!("Change {id}")).expect("valid name"),
        author_id: user_id(author),
        status: PullRequestStatus::Open,
        reviewers: reviewers.iter().map(|raw| user_id(raw)).collect(),
        created_at: Utc
            .with_ymd_and_hms(2025, 3, 1, 9, 0, 0)
            .single()
            .expect("valid timestamp"),
        merged_at: None,
    })
    .expect("valid pull request")
}
