//! Driving ports for user activity and review listings.

use async_trait::async_trait;

use crate::domain::{DomainError, PullRequest, User, UserId};

/// Driving port for user writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserCommand: Send + Sync {
    /// Toggle whether the user may be picked as a reviewer.
    async fn set_user_active(&self, id: &UserId, is_active: bool) -> Result<User, DomainError>;
}

/// Driving port listing a reviewer's assignments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewQuery: Send + Sync {
    /// Pull requests on which `reviewer` currently holds a slot.
    async fn list_reviews(&self, reviewer: &UserId) -> Result<Vec<PullRequest>, DomainError>;
}
