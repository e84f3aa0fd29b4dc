//! Shared HTTP adapter state.
//!
//! Handlers receive this via `actix_web::web::Data` and depend only on the
//! driving ports, so they can be exercised with mocks and no I/O.

use std::sync::Arc;

use crate::domain::ports::{
    PullRequestCommand, ReviewQuery, StatsQuery, TeamCommand, TeamQuery, UserCommand,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub teams: Arc<dyn TeamCommand>,
    pub teams_query: Arc<dyn TeamQuery>,
    pub users: Arc<dyn UserCommand>,
    pub reviews: Arc<dyn ReviewQuery>,
    pub pull_requests: Arc<dyn PullRequestCommand>,
    pub stats: Arc<dyn StatsQuery>,
}

/// Parameter object for [`HttpState::new`].
#[derive(Clone)]
pub struct HttpStatePorts {
    pub teams: Arc<dyn TeamCommand>,
    pub teams_query: Arc<dyn TeamQuery>,
    pub users: Arc<dyn UserCommand>,
    pub reviews: Arc<dyn ReviewQuery>,
    pub pull_requests: Arc<dyn PullRequestCommand>,
    pub stats: Arc<dyn StatsQuery>,
}

impl HttpState {
    /// Bundle the driving ports.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            teams,
            teams_query,
            users,
            reviews,
            pull_requests,
            stats,
        } = ports;
        Self {
            teams,
            teams_query,
            users,
            reviews,
            pull_requests,
            stats,
        }
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}
