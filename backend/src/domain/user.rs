//! Users and their team membership.

use super::team::{TeamId, TeamName};
use super::text::bounded_text;

bounded_text! {
    /// Opaque user identifier supplied by the source-control system.
    UserId, field = "user_id", max = 64
}

bounded_text! {
    /// Human-readable user name; members are ordered by it.
    DisplayName, field = "username", max = 255
}

/// A user together with the team they belong to.
///
/// The activity flag only gates reviewer eligibility; inactive users remain
/// visible everywhere else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    display_name: DisplayName,
    team_id: TeamId,
    team_name: TeamName,
    is_active: bool,
}

/// Field bundle for [`User::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDraft {
    /// Stable identifier.
    pub id: UserId,
    /// Display name.
    pub display_name: DisplayName,
    /// Owning team.
    pub team_id: TeamId,
    /// Owning team's name.
    pub team_name: TeamName,
    /// Whether the user may be picked as a reviewer.
    pub is_active: bool,
}

impl User {
    /// Assemble a user from validated parts.
    #[must_use]
    pub fn new(draft: UserDraft) -> Self {
        let UserDraft {
            id,
            display_name,
            team_id,
            team_name,
            is_active,
        } = draft;
        Self {
            id,
            display_name,
            team_id,
            team_name,
            is_active,
        }
    }

    /// Stable identifier.
    #[must_use]
    pub const fn id(&self) -> &UserId {
        &self.id
    }

    /// Display name.
    #[must_use]
    pub const fn display_name(&self) -> &DisplayName {
        &self.display_name
    }

    /// Owning team identifier.
    #[must_use]
    pub const fn team_id(&self) -> TeamId {
        self.team_id
    }

    /// Owning team name.
    #[must_use]
    pub const fn team_name(&self) -> &TeamName {
        &self.team_name
    }

    /// Whether the user is eligible for review assignment.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.is_active
    }

    /// Copy of this user with a different activity flag.
    #[must_use]
    pub fn with_activity(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }
}

/// Sort members by display name, breaking ties by identifier.
pub fn sort_members(members: &mut [User]) {
    members.sort_by(|left, right| {
        left.display_name
            .cmp(&right.display_name)
            .then_with(|| left.id.cmp(&right.id))
    });
}
