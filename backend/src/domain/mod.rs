//! Domain primitives, services, and ports.
//!
//! Purpose: hold the reviewer assignment rules independent of HTTP and
//! storage. Public surface:
//! - Entities: `Team`, `User`, `PullRequest` and their validated identifiers.
//! - Policy: `select_initial_reviewers`, `pick_replacement`.
//! - Statistics: `ReviewerStat`, `PullRequestStats`.
//! - Services implementing the driving ports in [`ports`].
//! - `DomainError` / `ErrorCode`: transport-agnostic failures.
//! - `TraceId`: request correlation identifier.

pub mod error;
pub mod ports;
pub mod pull_request;
mod pull_request_service;
pub mod reviewer_selection;
pub mod stats;
mod stats_service;
pub mod team;
mod team_service;
pub(crate) mod text;
pub mod trace_id;
pub mod user;
mod user_service;

pub use self::error::{DomainError, ErrorCode, DomainErrorValidationError};
pub use self::pull_request::{
    MAX_REVIEWERS, PullRequest, PullRequestDraft, PullRequestId, PullRequestName, PullRequestStatus,
    PullRequestValidationError, UnknownStatusError,
};
pub use self::pull_request_service::PullRequestService;
pub use self::reviewer_selection::{
    MAX_INITIAL_REVIEWERS, pick_replacement, replacement_candidates, select_initial_reviewers,
};
pub use self::stats::{
    AuthorStat, PullRequestStats, PullRequestTotals, ReviewerStat, sort_reviewer_stats,
};
pub use self::stats_service::StatsService;
pub use self::team::{Team, TeamId, TeamMember, TeamName, TeamRoster, first_duplicate_member};
pub use self::team_service::TeamService;
pub use self::text::TextValidationError;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{DisplayName, User, UserDraft, UserId, sort_members};
pub use self::user_service::UserService;
