//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) are implemented by outbound adapters; driving
//! ports (`*Command`, `*Query`) are implemented by domain services and called
//! by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod pull_request_command;
mod pull_request_repository;
mod stats_query;
mod stats_repository;
mod team_command;
mod team_repository;
mod user_command;
mod user_repository;

#[cfg(test)]
pub use pull_request_command::MockPullRequestCommand;
pub use pull_request_command::{CreatePullRequestRequest, PullRequestCommand, Reassignment};
#[cfg(test)]
pub use pull_request_repository::MockPullRequestRepository;
pub use pull_request_repository::{PullRequestRepository, PullRequestRepositoryError};
#[cfg(test)]
pub use stats_query::MockStatsQuery;
pub use stats_query::StatsQuery;
#[cfg(test)]
pub use stats_repository::MockStatsRepository;
pub use stats_repository::{StatsRepository, StatsRepositoryError};
#[cfg(test)]
pub use team_command::{MockTeamCommand, MockTeamQuery};
pub use team_command::{TeamCommand, TeamQuery, UpdateTeamRequest};
#[cfg(test)]
pub use team_repository::MockTeamRepository;
pub use team_repository::{TeamRepository, TeamRepositoryError};
#[cfg(test)]
pub use user_command::{MockReviewQuery, MockUserCommand};
pub use user_command::{ReviewQuery, UserCommand};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
