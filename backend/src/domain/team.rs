//! Teams and roster entries.

use std::collections::HashSet;

use uuid::Uuid;

use super::text::bounded_text;
use super::user::{DisplayName, User, UserId};

bounded_text! {
    /// Unique team name.
    TeamName, field = "team_name", max = 255
}

/// Storage identity of a team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TeamId(Uuid);

impl TeamId {
    /// Generate a new random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Borrow the inner UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A team's identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    id: TeamId,
    name: TeamName,
}

impl Team {
    /// Assemble a team.
    #[must_use]
    pub const fn new(id: TeamId, name: TeamName) -> Self {
        Self { id, name }
    }

    /// Storage identity.
    #[must_use]
    pub const fn id(&self) -> TeamId {
        self.id
    }

    /// Unique name.
    #[must_use]
    pub const fn name(&self) -> &TeamName {
        &self.name
    }
}

/// One entry in a team sync request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamMember {
    /// User identifier; created when unknown.
    pub id: UserId,
    /// Display name to store.
    pub display_name: DisplayName,
    /// Activity flag to store.
    pub is_active: bool,
}

/// A team with its members in display-name order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamRoster {
    /// The team.
    pub team: Team,
    /// Members sorted by display name, then identifier.
    pub members: Vec<User>,
}

/// First identifier that appears more than once in `members`.
#[must_use]
pub fn first_duplicate_member(members: &[TeamMember]) -> Option<&UserId> {
    let mut seen = HashSet::with_capacity(members.len());
    members
        .iter()
        .map(|member| &member.id)
        .find(|id| !seen.insert(*id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn member(id: &str) -> TeamMember {
        TeamMember {
            id: UserId::new(id).expect("valid id"),
            display_name: DisplayName::new(format!("name-{id}")).expect("valid name"),
            is_active: true,
        }
    }

    #[rstest]
    fn no_duplicate_in_distinct_roster() {
        let members = [member("a"), member("b"), member("c")];
        assert!(first_duplicate_member(&members).is_none());
    }

    #[rstest]
    fn reports_first_repeated_id() {
        let members = [member("a"), member("b"), member("a"), member("b")];
        let duplicate = first_duplicate_member(&members).expect("duplicate present");
        assert_eq!(duplicate.as_str(), "a");
    }

    #[rstest]
    fn team_name_rejects_blank() {
        assert!(TeamName::new("  ").is_err());
    }
}
