//! PostgreSQL persistence adapters using Diesel.
//!
//! Repositories are thin translators between Diesel rows and domain types.
//! Row structs (`models.rs`) and table definitions (`schema.rs`) never leave
//! this module. Connections come from a `bb8` pool managed by `diesel-async`.
//!
//! # Example
//!
//! ```ignore
//! use reviewchecker::outbound::persistence::{DbPool, DieselTeamRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/reviews")).await?;
//! let teams = DieselTeamRepository::new(pool);
//! ```

pub(crate) mod diesel_helpers;
mod diesel_pull_request_repository;
mod diesel_stats_repository;
mod diesel_team_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_pull_request_repository::DieselPullRequestRepository;
pub use diesel_stats_repository::DieselStatsRepository;
pub use diesel_team_repository::DieselTeamRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
