//! Builders wiring repositories into the domain services behind [`HttpState`].

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::info;

use crate::domain::ports::{PullRequestRepository, StatsRepository, TeamRepository, UserRepository};
use crate::domain::{PullRequestService, StatsService, TeamService, UserService};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::InMemoryReviewStore;
use crate::outbound::persistence::{
    DieselPullRequestRepository, DieselStatsRepository, DieselTeamRepository, DieselUserRepository,
};

use super::ServerConfig;

/// Driven adapters backing one [`HttpState`].
pub struct Repositories<T, U, P, S> {
    pub teams: Arc<T>,
    pub users: Arc<U>,
    pub pull_requests: Arc<P>,
    pub stats: Arc<S>,
}

impl
    Repositories<InMemoryReviewStore, InMemoryReviewStore, InMemoryReviewStore, InMemoryReviewStore>
{
    /// Every port served by one shared in-memory store.
    pub fn in_memory(store: Arc<InMemoryReviewStore>) -> Self {
        Self {
            teams: Arc::clone(&store),
            users: Arc::clone(&store),
            pull_requests: Arc::clone(&store),
            stats: store,
        }
    }
}

/// Compose the domain services over `repos` and expose them as driving ports.
pub fn build_services<T, U, P, S>(
    repos: Repositories<T, U, P, S>,
    clock: Arc<dyn Clock>,
) -> HttpState
where
    T: TeamRepository + 'static,
    U: UserRepository + 'static,
    P: PullRequestRepository + 'static,
    S: StatsRepository + 'static,
{
    let Repositories {
        teams,
        users,
        pull_requests,
        stats,
    } = repos;
    let team_service = Arc::new(TeamService::new(Arc::clone(&teams)));
    let user_service = Arc::new(UserService::new(
        Arc::clone(&users),
        Arc::clone(&pull_requests),
    ));
    let pull_request_service = Arc::new(PullRequestService::new(
        pull_requests,
        users,
        teams,
        clock,
    ));
    HttpState::new(HttpStatePorts {
        teams: team_service.clone(),
        teams_query: team_service,
        users: user_service.clone(),
        reviews: user_service,
        pull_requests: pull_request_service,
        stats: Arc::new(StatsService::new(stats)),
    })
}

/// Build the HTTP state from configuration.
///
/// Uses the Diesel adapters when a pool is configured, otherwise a fresh
/// in-memory store.
pub fn build_http_state(config: &ServerConfig) -> HttpState {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    match &config.db_pool {
        Some(pool) => {
            info!("serving from PostgreSQL");
            build_services(
                Repositories {
                    teams: Arc::new(DieselTeamRepository::new(pool.clone())),
                    users: Arc::new(DieselUserRepository::new(pool.clone())),
                    pull_requests: Arc::new(DieselPullRequestRepository::new(pool.clone())),
                    stats: Arc::new(DieselStatsRepository::new(pool.clone())),
                },
                clock,
            )
        }
        None => {
            info!("no database configured; serving from the in-memory store");
            build_services(
                Repositories::in_memory(Arc::new(InMemoryReviewStore::new())),
                clock,
            )
        }
    }
}
