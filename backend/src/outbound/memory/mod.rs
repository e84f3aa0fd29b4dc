//! In-process review store.
//!
//! Implements every driven port over a single mutex-guarded state so that
//! each repository call observes and mutates a consistent snapshot. Used when
//! no database is configured and by the integration tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    PullRequestRepository, PullRequestRepositoryError, StatsRepository, StatsRepositoryError,
    TeamRepository, TeamRepositoryError, UserRepository, UserRepositoryError,
};
use crate::domain::{
    AuthorStat, DisplayName, PullRequest, PullRequestId, PullRequestStatus, PullRequestTotals,
    ReviewerStat, Team, TeamId, TeamMember, TeamName, User, UserDraft, UserId,
};

#[derive(Debug, Clone)]
struct StoredUser {
    display_name: DisplayName,
    team_id: TeamId,
    is_active: bool,
}

#[derive(Debug, Default)]
struct StoreState {
    teams: HashMap<TeamId, TeamName>,
    team_ids: HashMap<TeamName, TeamId>,
    users: HashMap<UserId, StoredUser>,
    pull_requests: HashMap<PullRequestId, PullRequest>,
}

impl StoreState {
    fn user(&self, id: &UserId) -> Option<User> {
        let stored = self.users.get(id)?;
        let team_name = self.teams.get(&stored.team_id)?;
        Some(User::new(UserDraft {
            id: id.clone(),
            display_name: stored.display_name.clone(),
            team_id: stored.team_id,
            team_name: team_name.clone(),
            is_active: stored.is_active,
        }))
    }

    fn upsert_members(&mut self, team_id: TeamId, members: &[TeamMember]) {
        for member in members {
            self.users.insert(
                member.id.clone(),
                StoredUser {
                    display_name: member.display_name.clone(),
                    team_id,
                    is_active: member.is_active,
                },
            );
        }
    }
}

/// Mutex-guarded store implementing the team, user, pull request, and
/// statistics repositories.
#[derive(Debug, Default)]
pub struct InMemoryReviewStore {
    state: Mutex<StoreState>,
}

impl InMemoryReviewStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreState>, String> {
        self.state
            .lock()
            .map_err(|_| "review store lock poisoned".to_owned())
    }
}

#[async_trait]
impl TeamRepository for InMemoryReviewStore {
    async fn find_by_name(&self, name: &TeamName) -> Result<Option<Team>, TeamRepositoryError> {
        let state = self.lock().map_err(TeamRepositoryError::query)?;
        Ok(state
            .team_ids
            .get(name)
            .map(|id| Team::new(*id, name.clone())))
    }

    async fn create_with_members(
        &self,
        name: &TeamName,
        members: &[TeamMember],
    ) -> Result<Team, TeamRepositoryError> {
        let mut state = self.lock().map_err(TeamRepositoryError::query)?;
        if state.team_ids.contains_key(name) {
            return Err(TeamRepositoryError::duplicate(name.as_str()));
        }
        let id = TeamId::random();
        state.teams.insert(id, name.clone());
        state.team_ids.insert(name.clone(), id);
        state.upsert_members(id, members);
        Ok(Team::new(id, name.clone()))
    }

    async fn upsert_members(
        &self,
        team: &Team,
        members: &[TeamMember],
    ) -> Result<(), TeamRepositoryError> {
        let mut state = self.lock().map_err(TeamRepositoryError::query)?;
        if !state.teams.contains_key(&team.id()) {
            return Err(TeamRepositoryError::query(format!(
                "team {} does not exist",
                team.name()
            )));
        }
        state.upsert_members(team.id(), members);
        Ok(())
    }

    async fn list_members(&self, team_id: &TeamId) -> Result<Vec<User>, TeamRepositoryError> {
        let state = self.lock().map_err(TeamRepositoryError::query)?;
        Ok(state
            .users
            .iter()
            .filter(|(_, stored)| stored.team_id == *team_id)
            .filter_map(|(id, _)| state.user(id))
            .collect())
    }
}

#[async_trait]
impl UserRepository for InMemoryReviewStore {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let state = self.lock().map_err(UserRepositoryError::query)?;
        Ok(state.user(id))
    }

    async fn set_activity(
        &self,
        id: &UserId,
        is_active: bool,
    ) -> Result<Option<User>, UserRepositoryError> {
        let mut state = self.lock().map_err(UserRepositoryError::query)?;
        let Some(stored) = state.users.get_mut(id) else {
            return Ok(None);
        };
        stored.is_active = is_active;
        Ok(state.user(id))
    }
}

#[async_trait]
impl PullRequestRepository for InMemoryReviewStore {
    async fn create(&self, pull_request: &PullRequest) -> Result<(), PullRequestRepositoryError> {
        let mut state = self.lock().map_err(PullRequestRepositoryError::query)?;
        if state.pull_requests.contains_key(pull_request.id()) {
            return Err(PullRequestRepositoryError::duplicate(
                pull_request.id().as_str(),
            ));
        }
        let unknown = std::iter::once(pull_request.author_id())
            .chain(pull_request.reviewers())
            .find(|id| !state.users.contains_key(*id));
        if let Some(id) = unknown {
            return Err(PullRequestRepositoryError::query(format!(
                "user {id} does not exist"
            )));
        }
        state
            .pull_requests
            .insert(pull_request.id().clone(), pull_request.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &PullRequestId,
    ) -> Result<Option<PullRequest>, PullRequestRepositoryError> {
        let state = self.lock().map_err(PullRequestRepositoryError::query)?;
        Ok(state.pull_requests.get(id).cloned())
    }

    async fn update_status(
        &self,
        id: &PullRequestId,
        status: PullRequestStatus,
        merged_at: Option<DateTime<Utc>>,
    ) -> Result<Option<PullRequest>, PullRequestRepositoryError> {
        let mut state = self.lock().map_err(PullRequestRepositoryError::query)?;
        let Some(current) = state.pull_requests.get(id) else {
            return Ok(None);
        };
        if current.status() == status {
            return Ok(Some(current.clone()));
        }
        let mut draft = current.clone().into_draft();
        draft.status = status;
        draft.merged_at = merged_at;
        let updated = PullRequest::new(draft)
            .map_err(|err| PullRequestRepositoryError::query(err.to_string()))?;
        state.pull_requests.insert(id.clone(), updated.clone());
        Ok(Some(updated))
    }

    async fn list_by_reviewer(
        &self,
        reviewer: &UserId,
    ) -> Result<Vec<PullRequest>, PullRequestRepositoryError> {
        let state = self.lock().map_err(PullRequestRepositoryError::query)?;
        let mut assigned: Vec<PullRequest> = state
            .pull_requests
            .values()
            .filter(|pr| pr.has_reviewer(reviewer))
            .cloned()
            .collect();
        assigned.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.id().cmp(b.id()))
        });
        Ok(assigned)
    }

    async fn replace_reviewer(
        &self,
        id: &PullRequestId,
        old: &UserId,
        new: &UserId,
    ) -> Result<PullRequest, PullRequestRepositoryError> {
        let mut state = self.lock().map_err(PullRequestRepositoryError::query)?;
        let current = state
            .pull_requests
            .get(id)
            .ok_or_else(|| PullRequestRepositoryError::query(format!("pull request {id} missing")))?;
        if current.is_merged() {
            return Err(PullRequestRepositoryError::slot_conflict(format!(
                "pull request {id} was merged"
            )));
        }
        let updated = current
            .with_replaced_reviewer(old, new.clone())
            .ok_or_else(|| {
                PullRequestRepositoryError::slot_conflict(format!("{old} is no longer assigned"))
            })?
            .map_err(|err| PullRequestRepositoryError::slot_conflict(err.to_string()))?;
        state.pull_requests.insert(id.clone(), updated.clone());
        Ok(updated)
    }
}

#[async_trait]
impl StatsRepository for InMemoryReviewStore {
    async fn reviewer_stats(&self) -> Result<Vec<ReviewerStat>, StatsRepositoryError> {
        let state = self.lock().map_err(StatsRepositoryError::query)?;
        let mut counts: BTreeMap<&UserId, (u64, u64)> = BTreeMap::new();
        for pr in state.pull_requests.values() {
            for reviewer in pr.reviewers() {
                let entry = counts.entry(reviewer).or_default();
                entry.0 += 1;
                if !pr.is_merged() {
                    entry.1 += 1;
                }
            }
        }
        Ok(counts
            .into_iter()
            .filter_map(|(id, (total, open))| {
                let user = state.user(id)?;
                Some(ReviewerStat {
                    user_id: id.clone(),
                    display_name: user.display_name().clone(),
                    team_name: user.team_name().clone(),
                    total_assigned: total,
                    open_assigned: open,
                })
            })
            .collect())
    }

    async fn pull_request_totals(&self) -> Result<PullRequestTotals, StatsRepositoryError> {
        let state = self.lock().map_err(StatsRepositoryError::query)?;
        let mut totals = PullRequestTotals::default();
        let mut by_author: BTreeMap<&UserId, u64> = BTreeMap::new();
        for pr in state.pull_requests.values() {
            totals.total += 1;
            if pr.is_merged() {
                totals.merged += 1;
            } else {
                totals.open += 1;
            }
            totals.reviewer_assignments += pr.reviewers().len() as u64;
            *by_author.entry(pr.author_id()).or_default() += 1;
        }
        totals.by_author = by_author
            .into_iter()
            .map(|(author_id, count)| AuthorStat {
                author_id: author_id.clone(),
                count,
            })
            .collect();
        Ok(totals)
    }
}
