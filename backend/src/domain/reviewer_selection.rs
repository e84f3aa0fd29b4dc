//! Reviewer selection policy.
//!
//! Both functions expect members already sorted with
//! [`sort_members`](super::sort_members) and pick candidates in that order, so
//! identical rosters always produce identical picks.

use super::pull_request::{MAX_REVIEWERS, PullRequest};
use super::user::{User, UserId};

/// Number of reviewers assigned when a pull request is opened.
pub const MAX_INITIAL_REVIEWERS: usize = MAX_REVIEWERS;

/// First active members other than the author, up to
/// [`MAX_INITIAL_REVIEWERS`].
#[must_use]
pub fn select_initial_reviewers(members: &[User], author: &UserId) -> Vec<UserId> {
    members
        .iter()
        .filter(|member| member.is_active() && member.id() != author)
        .take(MAX_INITIAL_REVIEWERS)
        .map(|member| member.id().clone())
        .collect()
}

/// Active members able to take over `outgoing`'s slot on `pull_request`.
///
/// Excludes the author, the outgoing reviewer, and anyone already reviewing.
pub fn replacement_candidates<'a>(
    members: &'a [User],
    pull_request: &'a PullRequest,
    outgoing: &'a UserId,
) -> impl Iterator<Item = &'a User> + 'a {
    members.iter().filter(move |member| {
        member.is_active()
            && member.id() != pull_request.author_id()
            && member.id() != outgoing
            && !pull_request.has_reviewer(member.id())
    })
}

/// First replacement candidate, if any.
#[must_use]
pub fn pick_replacement(
    members: &[User],
    pull_request: &PullRequest,
    outgoing: &UserId,
) -> Option<UserId> {
    replacement_candidates(members, pull_request, outgoing)
        .next()
        .map(|member| member.id().clone())
}
